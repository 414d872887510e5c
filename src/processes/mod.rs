//! Process implementations grouped by family.
//!
//! Every module exposes a `PROCESSES` table that the registry assembles.

pub mod arrays;
pub mod comparison;
pub mod cubes;
pub mod logic;
pub mod math;
pub mod texts;

use crate::core::value::{ProcessRef, Scalar, Value};
use crate::engine::args::Arguments;
use crate::engine::error::ProcessError;
use crate::engine::kernels;

/// Applies `f` to every element of the argument `name`.
pub(crate) fn map_param<F>(args: &Arguments, name: &str, f: F) -> Result<Value, ProcessError>
where
    F: Fn(&Scalar) -> Result<Scalar, ProcessError>,
{
    Ok(kernels::map(&args.tensor(name)?, f)?.into_value())
}

/// Combines the arguments `a` and `b` element by element with broadcasting.
pub(crate) fn zip_params<F>(args: &Arguments, a: &str, b: &str, f: F) -> Result<Value, ProcessError>
where
    F: Fn(&Scalar, &Scalar) -> Result<Scalar, ProcessError>,
{
    let (x, y) = (args.tensor(a)?, args.tensor(b)?);
    Ok(kernels::zip(&x, &y, f)?.into_value())
}

/// Reduces `data` along `dimension`. Rank-0 data is a single lane.
pub(crate) fn reduce_data<F>(args: &Arguments, f: F) -> Result<Value, ProcessError>
where
    F: Fn(&[Scalar]) -> Result<Scalar, ProcessError>,
{
    let data = args.tensor("data")?;
    if data.rank() == 0 {
        return Ok(f(&data.data)?.into());
    }
    let axis = args.axis(data.rank())?;
    Ok(kernels::reduce_lanes(&data, axis, f)?.into_value())
}

/// Numbers of a lane with no-data removed when `ignore_nodata`;
/// `None` when no-data is present and not ignored.
pub(crate) fn valid_numbers(
    lane: &[Scalar],
    ignore_nodata: bool,
) -> Result<Option<Vec<f64>>, ProcessError> {
    let values = kernels::numbers(lane, "data")?;
    if !values.iter().any(|v| v.is_nan()) {
        return Ok(Some(values));
    }
    if ignore_nodata {
        Ok(Some(values.into_iter().filter(|v| !v.is_nan()).collect()))
    } else {
        Ok(None)
    }
}

/// The process reference passed as argument `name`.
pub(crate) fn callback<'a>(args: &'a Arguments, name: &str) -> Result<&'a ProcessRef, ProcessError> {
    match args.required(name)? {
        Value::Callback(cb) => Ok(cb),
        other => Err(ProcessError::invalid(
            name,
            format!("expected a process, found a {}", other.type_name()),
        )),
    }
}

/// A callback result that must be a single element.
pub(crate) fn scalar_result(value: Value, process: &str) -> Result<Scalar, ProcessError> {
    match value {
        Value::Scalar(s) => Ok(s),
        other => Err(ProcessError::invalid(
            "process",
            format!("'{}' returned a {} for a single element", process, other.type_name()),
        )),
    }
}

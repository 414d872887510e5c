// src/processes/arrays.rs

use crate::core::labelled::LabelledArray;
use crate::core::tensor::{Shape, Tensor};
use crate::core::value::{Scalar, Value};
use crate::engine::args::Arguments;
use crate::engine::dispatch::ProcessDef;
use crate::engine::dispatch::ProcessKind::{Elementwise, Other, Reducer};
use crate::engine::error::ProcessError;
use crate::engine::kernels;
use crate::engine::registry::call_callback;
use crate::processes::{callback, reduce_data, scalar_result};
use std::cmp::Ordering;

const ORDERING: &[&str] = &["data", "asc", "nodata", "dimension"];
const REDUCER: &[&str] = &["data", "ignore_nodata", "dimension"];

pub static PROCESSES: &[ProcessDef] = &[
    ProcessDef::new("array_contains", "Check whether the array contains a given value", &["data", "value"], Other)
        .np(array_contains),
    ProcessDef::new(
        "array_element",
        "Get an element from an array",
        &["data", "index", "label", "labels", "dimension", "return_nodata"],
        Reducer,
    )
    .np(array_element)
    .xar(array_element_labelled),
    ProcessDef::new(
        "count",
        "Count the number of elements",
        &["data", "condition", "context", "dimension"],
        Reducer,
    )
    .np(count),
    ProcessDef::new("array_apply", "Apply a process to each array element", &["data", "process", "context"], Elementwise)
        .np(array_apply),
    ProcessDef::new("array_filter", "Filter an array based on a condition", &["data", "condition", "context"], Other)
        .np(array_filter),
    ProcessDef::new("array_find", "Get the index for a value in an array", &["data", "value", "dimension"], Reducer)
        .np(array_find),
    ProcessDef::new("array_labels", "Get the labels for an array", &["data", "dimension"], Other)
        .np(array_labels)
        .xar(array_labels_labelled),
    ProcessDef::new("first", "First element", REDUCER, Reducer).np(first),
    ProcessDef::new("last", "Last element", REDUCER, Reducer).np(last),
    ProcessDef::new("order", "Create a permutation", ORDERING, Other).np(order),
    ProcessDef::new("rearrange", "Rearrange an array based on a permutation", &["data", "order"], Other)
        .np(rearrange),
    ProcessDef::new("sort", "Sort data", ORDERING, Other).np(sort),
    ProcessDef::new("mask", "Replace values where a mask is set", &["data", "mask", "replacement"], Elementwise)
        .np(mask),
];

/// Element match used by `array_contains` and `array_find`: no-data matches no-data.
fn matches(elem: &Scalar, value: &Scalar) -> bool {
    (elem.is_nodata() && value.is_nodata()) || elem == value
}

fn array_contains(args: &Arguments) -> Result<Value, ProcessError> {
    let data = args.tensor("data")?;
    let value = args.tensor("value")?;
    if data.rank() <= 1 {
        let Some(needle) = value.data.first().filter(|_| value.rank() == 0) else {
            return Ok(Value::from(false));
        };
        return Ok(Value::from(data.iter().any(|elem| matches(elem, needle))));
    }

    // N-d data: compare sub-arrays along the first axis
    for k in 0..data.axis_len(0) {
        let row = kernels::select(&data, 0, k)?;
        let found = if value.rank() == 0 {
            row.iter().all(|elem| matches(elem, &value.data[0]))
        } else {
            row.shape == value.shape && row.iter().zip(value.iter()).all(|(a, b)| matches(a, b))
        };
        if found {
            return Ok(Value::from(true));
        }
    }
    Ok(Value::from(false))
}

fn check_element_params(args: &Arguments) -> Result<(), ProcessError> {
    match (args.is_set("index"), args.is_set("label")) {
        (true, true) => Err(ProcessError::ArrayElementParameterConflict),
        (false, false) => Err(ProcessError::ArrayElementParameterMissing),
        _ => Ok(()),
    }
}

/// Position along an axis of length `len`, or `None` if unavailable.
fn element_position(
    args: &Arguments,
    len: usize,
    labels: impl FnOnce() -> Result<Vec<Scalar>, ProcessError>,
) -> Result<Option<usize>, ProcessError> {
    if let Some(index) = args.opt_i64("index")? {
        return Ok((index >= 0 && (index as usize) < len).then_some(index as usize));
    }
    let label = args.scalar("label")?;
    Ok(labels()?.iter().position(|l| l == label))
}

fn unavailable(args: &Arguments, shape: Shape) -> Result<Tensor, ProcessError> {
    if !args.flag("return_nodata", false)? {
        return Err(ProcessError::ArrayElementNotAvailable);
    }
    let len = shape.num_elements();
    Tensor::new(shape, vec![Scalar::nan(); len])
}

fn array_element(args: &Arguments) -> Result<Value, ProcessError> {
    check_element_params(args)?;
    let data = args.tensor("data")?;
    let axis = args.axis(data.rank())?;
    let position = element_position(args, data.axis_len(axis), || match args.get("labels") {
        Some(v) if !v.is_null() => Ok(v.to_tensor()?.data),
        _ => Ok(Vec::new()),
    })?;
    let picked = match position {
        Some(pos) => kernels::select(&data, axis, pos)?,
        None => unavailable(args, data.shape.without_axis(axis))?,
    };
    Ok(picked.into_value())
}

fn array_element_labelled(args: &Arguments) -> Result<Value, ProcessError> {
    check_element_params(args)?;
    let data = labelled_data(args)?;
    let axis = match args.get("dimension") {
        Some(d) if !d.is_null() => data.resolve_dimension(d)?,
        _ => data.tensor.check_axis(0)?,
    };
    let position = element_position(args, data.tensor.axis_len(axis), || Ok(data.labels(axis)))?;
    match position {
        Some(pos) => data.select(axis, pos),
        None => {
            let filler = unavailable(args, data.shape().without_axis(axis))?;
            data.without_axis(axis, filler)
        }
    }
}

fn labelled_data(args: &Arguments) -> Result<&LabelledArray, ProcessError> {
    let data = args.required("data")?;
    data.as_labelled().ok_or_else(|| {
        ProcessError::invalid("data", format!("expected a labelled array, found a {}", data.type_name()))
    })
}

/// Valid means not no-data and, for numbers, finite.
fn is_valid(s: &Scalar) -> bool {
    match s {
        Scalar::Float(f) => f.is_finite(),
        other => !other.is_null(),
    }
}

fn count_where<F>(lane: &[Scalar], keep: F) -> Result<Scalar, ProcessError>
where
    F: Fn(&Scalar) -> Result<bool, ProcessError>,
{
    let mut n = 0i64;
    for s in lane {
        if keep(s)? {
            n += 1;
        }
    }
    Ok(Scalar::Int(n))
}

fn count(args: &Arguments) -> Result<Value, ProcessError> {
    let context = args.context()?;
    match args.get("condition") {
        None => reduce_data(args, |lane| count_where(lane, |s| Ok(is_valid(s)))),
        Some(v) if v.is_null() => reduce_data(args, |lane| count_where(lane, |s| Ok(is_valid(s)))),
        Some(Value::Scalar(Scalar::Bool(true))) => {
            reduce_data(args, |lane| Ok(Scalar::Int(lane.len() as i64)))
        }
        Some(Value::Callback(cb)) => reduce_data(args, |lane| {
            count_where(lane, |s| {
                let verdict = call_callback(cb, Value::Scalar(s.clone()), Vec::new(), &context)?;
                Ok(verdict.as_bool() == Some(true))
            })
        }),
        Some(other) => Err(ProcessError::invalid(
            "condition",
            format!("expected null, true or a process, found {}", other),
        )),
    }
}

fn array_apply(args: &Arguments) -> Result<Value, ProcessError> {
    let process = callback(args, "process")?;
    let context = args.context()?;
    let data = args.tensor("data")?;
    let out = kernels::map(&data, |s| {
        let result = call_callback(process, Value::Scalar(s.clone()), Vec::new(), &context)?;
        scalar_result(result, &process.process_id)
    })?;
    Ok(Value::Array(out))
}

fn array_filter(args: &Arguments) -> Result<Value, ProcessError> {
    let condition = callback(args, "condition")?;
    let context = args.context()?;
    let data = args.tensor("data")?;
    let mut kept = Vec::new();
    for s in data.iter() {
        let verdict = call_callback(condition, Value::Scalar(s.clone()), Vec::new(), &context)?;
        if verdict.as_bool() == Some(true) {
            kept.push(s.clone());
        }
    }
    Ok(Value::Array(Tensor::vector(kept)))
}

fn array_find(args: &Arguments) -> Result<Value, ProcessError> {
    let value = args.scalar("value")?.clone();
    let data = args.tensor("data")?;
    if value.is_nodata() || data.is_empty() {
        return Ok(Value::nan());
    }
    reduce_data(args, |lane| {
        Ok(match lane.iter().position(|elem| elem == &value) {
            Some(k) => Scalar::Int(k as i64),
            None => Scalar::nan(),
        })
    })
}

fn positions(len: usize) -> Vec<Scalar> {
    (0..len).map(|i| Scalar::Int(i as i64)).collect()
}

fn array_labels(args: &Arguments) -> Result<Value, ProcessError> {
    let data = args.tensor("data")?;
    let axis = args.axis(data.rank())?;
    Ok(Value::Array(Tensor::vector(positions(data.axis_len(axis)))))
}

fn array_labels_labelled(args: &Arguments) -> Result<Value, ProcessError> {
    let data = labelled_data(args)?;
    let axis = match args.get("dimension") {
        Some(d) if !d.is_null() => data.resolve_dimension(d)?,
        _ => 0,
    };
    Ok(Value::Array(Tensor::vector(data.labels(axis))))
}

fn pick<'a>(mut iter: impl Iterator<Item = &'a Scalar>, ignore_nodata: bool) -> Option<&'a Scalar> {
    if ignore_nodata {
        iter.find(|s| !s.is_nodata())
    } else {
        iter.next()
    }
}

fn edge(args: &Arguments, from_end: bool) -> Result<Value, ProcessError> {
    let ignore_nodata = args.flag("ignore_nodata", true)?;
    if args.tensor("data")?.is_empty() {
        return Ok(Value::nan());
    }
    reduce_data(args, |lane| {
        let picked = if from_end {
            pick(lane.iter().rev(), ignore_nodata)
        } else {
            pick(lane.iter(), ignore_nodata)
        };
        Ok(picked.cloned().unwrap_or_else(Scalar::nan))
    })
}

fn first(args: &Arguments) -> Result<Value, ProcessError> {
    edge(args, false)
}

fn last(args: &Arguments) -> Result<Value, ProcessError> {
    edge(args, true)
}

/// Where no-data entries go in an ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodataPlacement {
    Drop,
    First,
    Last,
}

fn nodata_placement(args: &Arguments) -> Result<NodataPlacement, ProcessError> {
    match args.get("nodata") {
        None => Ok(NodataPlacement::Drop),
        Some(v) if v.is_null() => Ok(NodataPlacement::Drop),
        Some(v) => match v.as_bool() {
            Some(true) => Ok(NodataPlacement::Last),
            Some(false) => Ok(NodataPlacement::First),
            None => Err(ProcessError::invalid(
                "nodata",
                format!("expected null or a boolean, found {}", v),
            )),
        },
    }
}

/// Stable permutation of a lane. No-data entries keep their original order.
fn permutation(lane: &[Scalar], asc: bool, placement: NodataPlacement) -> Vec<usize> {
    let (mut valid, missing): (Vec<usize>, Vec<usize>) =
        (0..lane.len()).partition(|&i| !lane[i].is_nodata());
    valid.sort_by(|&a, &b| {
        let ord: Ordering = lane[a].compare(&lane[b]);
        if asc {
            ord
        } else {
            ord.reverse()
        }
    });
    match placement {
        NodataPlacement::Drop => valid,
        NodataPlacement::Last => valid.into_iter().chain(missing).collect(),
        NodataPlacement::First => missing.into_iter().chain(valid).collect(),
    }
}

fn ordered(args: &Arguments, values: bool) -> Result<Value, ProcessError> {
    let asc = args.flag("asc", true)?;
    let placement = nodata_placement(args)?;
    let data = args.tensor("data")?;
    let lane_fn = |lane: &[Scalar]| -> Result<Vec<Scalar>, ProcessError> {
        let perm = permutation(lane, asc, placement).into_iter();
        Ok(if values {
            perm.map(|i| lane[i].clone()).collect()
        } else {
            perm.map(|i| Scalar::Int(i as i64)).collect()
        })
    };
    if data.rank() == 0 {
        return Ok(Value::Array(Tensor::vector(lane_fn(&data.data)?)));
    }
    let axis = args.axis(data.rank())?;
    let sorted = kernels::map_lanes(&data, axis, lane_fn).map_err(|e| match (placement, e) {
        (NodataPlacement::Drop, ProcessError::ShapeMismatch(_)) => ProcessError::invalid(
            "nodata",
            "dropping no-data values leaves lanes of different lengths, set it to true or false to keep them",
        ),
        (_, e) => e,
    })?;
    Ok(Value::Array(sorted))
}

fn order(args: &Arguments) -> Result<Value, ProcessError> {
    ordered(args, false)
}

fn sort(args: &Arguments) -> Result<Value, ProcessError> {
    ordered(args, true)
}

fn rearrange(args: &Arguments) -> Result<Value, ProcessError> {
    let data = args.tensor("data")?;
    let order = args.tensor("order")?;
    let len = data.axis_len(0);
    let indices = order
        .iter()
        .map(|s| match s.as_i64() {
            Some(i) if i >= 0 && (i as usize) < len => Ok(i as usize),
            Some(i) => Err(ProcessError::IndexOutOfBounds { index: i, len }),
            None => Err(ProcessError::invalid("order", format!("{} is not an index", s))),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Array(kernels::take(&data, 0, &indices)?))
}

/// Mask values count as set when true or a non-zero number.
fn is_masked(s: &Scalar) -> bool {
    match s {
        Scalar::Bool(b) => *b,
        Scalar::Int(i) => *i != 0,
        Scalar::Float(f) => !f.is_nan() && *f != 0.0,
        _ => false,
    }
}

fn mask(args: &Arguments) -> Result<Value, ProcessError> {
    let replacement = match args.get("replacement") {
        None => Scalar::nan(),
        Some(Value::Scalar(s)) => s.clone(),
        Some(other) => {
            return Err(ProcessError::invalid(
                "replacement",
                format!("expected a single value, found a {}", other.type_name()),
            ))
        }
    };
    let data = args.tensor("data")?;
    let mask = args.tensor("mask")?;
    let out = kernels::zip(&data, &mask, |value, m| {
        Ok(if is_masked(m) {
            replacement.clone()
        } else {
            value.clone()
        })
    })?;
    Ok(out.into_value())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lane(values: &[f64]) -> Vec<Scalar> {
        values.iter().copied().map(Scalar::Float).collect()
    }

    #[test]
    fn test_permutation_nodata_placement() {
        let data = lane(&[6.0, -1.0, f64::NAN, 2.0, f64::NAN]);
        assert_eq!(permutation(&data, true, NodataPlacement::Drop), vec![1, 3, 0]);
        assert_eq!(permutation(&data, true, NodataPlacement::Last), vec![1, 3, 0, 2, 4]);
        assert_eq!(permutation(&data, false, NodataPlacement::First), vec![2, 4, 0, 3, 1]);
    }

    #[test]
    fn test_permutation_is_stable() {
        let data = lane(&[9.0, 1.0, 9.0, 1.0]);
        assert_eq!(permutation(&data, true, NodataPlacement::Drop), vec![1, 3, 0, 2]);
        assert_eq!(permutation(&data, false, NodataPlacement::Drop), vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_validity_and_mask_truthiness() {
        assert!(is_valid(&Scalar::from("a")));
        assert!(!is_valid(&Scalar::Float(f64::INFINITY)));
        assert!(!is_valid(&Scalar::Null));
        assert!(is_masked(&Scalar::Int(2)));
        assert!(!is_masked(&Scalar::Float(f64::NAN)));
    }
}

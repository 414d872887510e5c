// src/processes/cubes.rs

//! Data cube processes that hand whole arrays or elements to a callback.

use crate::core::value::Value;
use crate::engine::args::Arguments;
use crate::engine::dispatch::ProcessDef;
use crate::engine::dispatch::ProcessKind::{Elementwise, Other};
use crate::engine::error::ProcessError;
use crate::engine::kernels;
use crate::engine::registry::{call_callback, get_process};
use crate::processes::{callback, scalar_result};

pub static PROCESSES: &[ProcessDef] = &[
    ProcessDef::new(
        "reduce_dimension",
        "Reduce dimensions",
        &["data", "reducer", "dimension", "context"],
        Other,
    )
    .np(reduce_dimension)
    .xar(reduce_dimension),
    ProcessDef::new("apply", "Apply a process to each pixel", &["data", "process", "context"], Elementwise)
        .both(apply),
];

/// Runs the reducer over the whole array with the resolved axis as `dimension`.
fn reduce_dimension(args: &Arguments) -> Result<Value, ProcessError> {
    let reducer = callback(args, "reducer")?;
    let context = args.context()?;
    let data = args.required("data")?;

    let axis = match data {
        Value::Labelled(l) => match args.get("dimension") {
            Some(d) if !d.is_null() => l.resolve_dimension(d)?,
            _ => 0,
        },
        other => args.axis(other.to_tensor()?.rank())?,
    };

    let def = get_process(&reducer.process_id)
        .ok_or_else(|| ProcessError::ProcessNotFound(reducer.process_id.clone()))?;
    let mut extra = Vec::new();
    if def.params.contains(&"dimension") {
        extra.push(("dimension".to_string(), Value::from(axis as i64)));
    }

    let reduced = call_callback(reducer, data.clone(), extra, &context)?;
    match (data, reduced) {
        (Value::Labelled(l), Value::Array(t)) if t.shape == l.shape().without_axis(axis) => {
            l.without_axis(axis, t)
        }
        (_, reduced) => Ok(reduced),
    }
}

/// Calls the process once per element; the shape is preserved.
fn apply(args: &Arguments) -> Result<Value, ProcessError> {
    let process = callback(args, "process")?;
    let context = args.context()?;
    let data = args.tensor("data")?;
    let out = kernels::map(&data, |s| {
        let result = call_callback(process, Value::Scalar(s.clone()), Vec::new(), &context)?;
        scalar_result(result, &process.process_id)
    })?;
    Ok(out.into_value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::labelled::LabelledArray;
    use crate::core::tensor::{Shape, Tensor};
    use crate::engine::registry::call;

    /// Bands `s` (8, 4, 2) over two timesteps, the second one ten times larger.
    fn cube() -> LabelledArray {
        let bands = [8.0, 4.0, 2.0];
        let mut data = Vec::with_capacity(3 * 2 * 5 * 3);
        for band in bands {
            for t in 0..2 {
                let factor = if t == 1 { 10.0 } else { 1.0 };
                data.extend(std::iter::repeat(band * factor).take(15));
            }
        }
        let tensor = Tensor::from_f64_shaped(Shape::new(vec![3, 2, 5, 3]), data).unwrap();
        LabelledArray::new(tensor, vec!["s".into(), "t".into(), "x".into(), "y".into()])
            .unwrap()
            .with_coords("s", vec!["B08".into(), "B04".into(), "B02".into()])
            .unwrap()
    }

    fn named(entries: Vec<(&str, Value)>) -> Vec<(String, Value)> {
        entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_reduce_dimension_sum_over_bands() {
        let result = call(
            "reduce_dimension",
            vec![Value::Labelled(cube())],
            named(vec![("reducer", Value::callback("sum")), ("dimension", Value::from("s"))]),
        )
        .unwrap();
        let reduced = result.as_labelled().unwrap();
        assert_eq!(reduced.dims, vec!["t".to_string(), "x".to_string(), "y".to_string()]);
        assert_eq!(reduced.shape().dims, vec![2, 5, 3]);
        assert!(reduced.coords.is_empty());
        let values = reduced.tensor.to_f64_vec();
        assert_eq!(values[0], 14.0);
        assert_eq!(values[15], 140.0);
    }

    #[test]
    fn test_reduce_dimension_dense_axis() {
        let data = Tensor::from_f64_shaped(Shape::new(vec![2, 2]), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let result = call(
            "reduce_dimension",
            vec![Value::Array(data), Value::callback("max"), Value::from(1)],
            Vec::new(),
        )
        .unwrap();
        assert_eq!(result, Value::from(vec![2.0, 4.0]));
    }

    #[test]
    fn test_apply_keeps_labels() {
        let result = call(
            "apply",
            vec![Value::Labelled(cube()), Value::callback("absolute")],
            Vec::new(),
        )
        .unwrap();
        let applied = result.as_labelled().unwrap();
        assert_eq!(applied.dims.len(), 4);
        assert_eq!(applied.coords.len(), 1);
    }

    #[test]
    fn test_apply_with_context() {
        let result = call(
            "apply",
            vec![Value::from(vec![1, 2, 3])],
            named(vec![
                ("process", Value::callback("gt")),
                ("context", Value::object([("y", Value::from(1))])),
            ]),
        )
        .unwrap();
        assert_eq!(result, Value::from(vec![false, true, true]));
    }
}

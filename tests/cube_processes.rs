// tests/cube_processes.rs

use openeo_processes::{Call, LabelledArray, LazyArray, Shape, Tensor, Value};

/// Bands `s` (8, 4, 2) over two timesteps; the second timestep is ten times larger.
fn cube() -> LabelledArray {
    let mut data = Vec::new();
    for band in [8.0, 4.0, 2.0] {
        for factor in [1.0, 10.0] {
            data.extend(std::iter::repeat(band * factor).take(5 * 3));
        }
    }
    let tensor = Tensor::from_f64_shaped(Shape::new(vec![3, 2, 5, 3]), data).unwrap();
    LabelledArray::new(tensor, vec!["s".into(), "t".into(), "x".into(), "y".into()])
        .unwrap()
        .with_coords("s", vec!["B08".into(), "B04".into(), "B02".into()])
        .unwrap()
}

#[test]
fn reduce_bands_with_sum() {
    let reduced = Call::new("reduce_dimension")
        .arg(cube())
        .kwarg("reducer", Value::callback("sum"))
        .kwarg("dimension", "s")
        .invoke()
        .unwrap();
    let reduced = reduced.as_labelled().unwrap();
    assert_eq!(reduced.shape().dims, vec![2, 5, 3]);
    let values = reduced.tensor.to_f64_vec();
    assert_eq!((values[0], values[15]), (14.0, 140.0));
}

#[test]
fn reduce_time_with_mean() {
    let reduced = Call::new("reduce_dimension")
        .arg(cube())
        .kwarg("reducer", Value::callback("mean"))
        .kwarg("dimension", "t")
        .invoke()
        .unwrap();
    let reduced = reduced.as_labelled().unwrap();
    assert_eq!(reduced.dims, vec!["s".to_string(), "x".to_string(), "y".to_string()]);
    assert_eq!(reduced.coords.len(), 1);
    assert_eq!(reduced.tensor.to_f64_vec()[0], 44.0);
}

#[test]
fn reduce_lazy_data() {
    let data = LazyArray::from_tensor(Tensor::from_f64(vec![3.0, 1.0, 2.0]), 2).unwrap();
    let reduced = Call::new("reduce_dimension")
        .arg(data)
        .arg(Value::callback("min"))
        .invoke()
        .unwrap();
    assert_eq!(reduced, Value::from(1.0));
}

#[test]
fn apply_per_element_with_context() {
    let scaled = Call::new("apply")
        .arg(cube())
        .arg(Value::callback("multiply"))
        .kwarg("context", Value::object([("y", Value::from(2))]))
        .invoke()
        .unwrap();
    let scaled = scaled.as_labelled().unwrap();
    assert_eq!(scaled.shape().dims, vec![3, 2, 5, 3]);
    assert_eq!(scaled.tensor.to_f64_vec()[0], 16.0);
}

#[test]
fn unknown_callback_fails() {
    let result = Call::new("apply").arg(vec![1, 2]).arg(Value::callback("nope")).invoke();
    assert!(result.is_err());
}

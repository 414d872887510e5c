// tests/logic_processes.rs

use openeo_processes::{Call, ProcessError, Shape, Tensor, Value};

fn logic(id: &str, x: Value, y: Value) -> Value {
    Call::new(id).arg(x).arg(y).invoke().unwrap()
}

#[test]
fn kleene_truth_tables() {
    let (t, f, n) = (Value::from(true), Value::from(false), Value::null());

    assert_eq!(logic("and", f.clone(), n.clone()), f);
    assert!(logic("and", t.clone(), n.clone()).is_null());
    assert_eq!(logic("and", t.clone(), t.clone()), t);

    assert_eq!(logic("or", t.clone(), n.clone()), t);
    assert!(logic("or", f.clone(), n.clone()).is_null());
    assert_eq!(logic("or", f.clone(), f.clone()), f);

    assert_eq!(logic("xor", t.clone(), f.clone()), t);
    assert!(logic("xor", t.clone(), n.clone()).is_null());

    assert_eq!(Call::new("not").arg(true).invoke().unwrap(), f);
    assert!(Call::new("not").arg(n).invoke().unwrap().is_null());
}

#[test]
fn elementwise_logic_over_lists() {
    let x = Value::from(vec![Value::from(true), Value::from(false), Value::null()]);
    let result = logic("or", x, Value::from(false));
    assert_eq!(result, Value::from(vec![Value::from(true), Value::from(false), Value::null()]));
}

#[test]
fn if_selects_accept_or_reject() {
    assert_eq!(Call::new("if").arg(true).arg("A").arg("B").invoke().unwrap(), Value::from("A"));
    assert_eq!(Call::new("if").arg(false).arg("A").arg("B").invoke().unwrap(), Value::from("B"));
    assert!(Call::new("if").arg(Value::null()).arg(1).invoke().unwrap().is_null());

    let picked = Call::new("if")
        .arg(vec![Value::from(true), Value::null(), Value::from(false)])
        .arg(vec![1, 2, 3])
        .arg(0)
        .invoke()
        .unwrap();
    assert_eq!(picked, Value::from(vec![1, 0, 0]));
}

#[test]
fn any_and_all() {
    let with_null = Value::from(vec![Value::from(false), Value::null()]);
    assert_eq!(Call::new("any").arg(with_null.clone()).invoke().unwrap(), Value::from(false));
    let strict = Call::new("any").arg(with_null.clone()).kwarg("ignore_nodata", false).invoke().unwrap();
    assert!(strict.is_null());
    assert_eq!(Call::new("all").arg(with_null).invoke().unwrap(), Value::from(false));

    let trues = Value::from(vec![Value::from(true), Value::null()]);
    assert_eq!(Call::new("all").arg(trues.clone()).invoke().unwrap(), Value::from(true));
    assert!(Call::new("all").arg(trues).kwarg("ignore_nodata", false).invoke().unwrap().is_null());

    let empty: Vec<bool> = Vec::new();
    assert!(Call::new("any").arg(empty).invoke().unwrap().is_null());
}

#[test]
fn all_along_a_dimension() {
    let data = Tensor::new(
        Shape::new(vec![2, 2]),
        vec![true.into(), true.into(), false.into(), true.into()],
    )
    .unwrap();
    let result = Call::new("all").arg(data).kwarg("dimension", 1).invoke().unwrap();
    assert_eq!(result, Value::from(vec![true, false]));
}

#[test]
fn strings_are_not_booleans() {
    let err = Call::new("and").arg("yes").arg(true).invoke().unwrap_err();
    assert!(matches!(err, ProcessError::InvalidArgument { .. }));
}

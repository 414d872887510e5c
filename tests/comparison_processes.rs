// tests/comparison_processes.rs

use openeo_processes::{Call, Value};

fn call2(id: &str, x: impl Into<Value>, y: impl Into<Value>) -> Value {
    Call::new(id).arg(x).arg(y).invoke().unwrap()
}

#[test]
fn between_temporal_strings() {
    let inside = Call::new("between")
        .arg("00:59:59Z")
        .kwarg("min", "01:00:00+01:00")
        .kwarg("max", "01:00:00Z")
        .invoke()
        .unwrap();
    assert_eq!(inside, Value::from(true));

    let reversed = Call::new("between").arg(0.5).arg(1).arg(0).invoke().unwrap();
    assert_eq!(reversed, Value::from(false));

    let excluded = Call::new("between")
        .arg(1)
        .arg(0)
        .arg(1)
        .kwarg("exclude_max", true)
        .invoke()
        .unwrap();
    assert_eq!(excluded, Value::from(false));
}

#[test]
fn equality_rules() {
    assert_eq!(call2("eq", 1, 1.0), Value::from(true));
    assert_eq!(call2("eq", "Test", "test"), Value::from(false));
    assert_eq!(call2("eq", "2018-01-01T00:00:00Z", "2018-01-01T01:00:00+01:00"), Value::from(true));
    assert_eq!(call2("eq", true, true), Value::from(true));
    assert!(call2("eq", Value::null(), 1).is_null());
    assert!(call2("neq", 1, Value::nan()).is_null());

    let relaxed = Call::new("eq")
        .arg("Test")
        .arg("test")
        .kwarg("case_sensitive", false)
        .invoke()
        .unwrap();
    assert_eq!(relaxed, Value::from(true));

    let close = Call::new("eq").arg(1.0).arg(1.1).kwarg("delta", 0.2).invoke().unwrap();
    assert_eq!(close, Value::from(true));
}

#[test]
fn relations_and_reduce() {
    assert_eq!(call2("gt", 3, 2), Value::from(true));
    assert_eq!(call2("lte", 2, 2), Value::from(true));
    assert_eq!(call2("lt", "2018-01-01T00:00:00Z", "2019-01-01"), Value::from(true));
    assert_eq!(call2("gte", "b", "a"), Value::from(false));

    let elementwise = call2("gt", vec![1, 2, 3], 1);
    assert_eq!(elementwise, Value::from(vec![false, true, true]));

    let reduced = Call::new("gt").arg(vec![2, 3]).arg(1).kwarg("reduce", true).invoke().unwrap();
    assert_eq!(reduced, Value::from(true));
}

#[test]
fn hour_24_is_an_error() {
    assert!(Call::new("gt").arg("2018-01-01T24:00:00Z").arg("2018-01-01T00:00:00Z").invoke().is_err());
}

#[test]
fn nodata_checks() {
    let data = Value::from(vec![Value::from(1), Value::null(), Value::nan(), Value::from("a")]);
    let nodata = Call::new("is_nodata").arg(data.clone()).invoke().unwrap();
    assert_eq!(nodata, Value::from(vec![false, true, true, false]));

    let nan = Call::new("is_nan").arg(data.clone()).invoke().unwrap();
    assert_eq!(nan, Value::from(vec![false, true, true, true]));

    let valid = Call::new("is_valid").arg(data).invoke().unwrap();
    assert_eq!(valid, Value::from(vec![true, false, false, true]));

    assert_eq!(Call::new("is_valid").arg(f64::INFINITY).invoke().unwrap(), Value::from(false));
}

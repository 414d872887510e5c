// tests/text_processes.rs

use openeo_processes::{Call, Value};

#[test]
fn text_matching() {
    let begins = Call::new("text_begins").arg("Lorem ipsum").arg("Lorem").invoke().unwrap();
    assert_eq!(begins, Value::from(true));

    let ends = Call::new("text_ends").arg("Lorem ipsum").arg("IPSUM").invoke().unwrap();
    assert_eq!(ends, Value::from(false));

    let relaxed = Call::new("text_ends")
        .arg("Lorem ipsum")
        .arg("IPSUM")
        .kwarg("case_sensitive", false)
        .invoke()
        .unwrap();
    assert_eq!(relaxed, Value::from(true));

    let contains = Call::new("text_contains").arg("Lorem ipsum").arg("m i").invoke().unwrap();
    assert_eq!(contains, Value::from(true));

    assert!(Call::new("text_contains").arg(Value::null()).arg("a").invoke().unwrap().is_null());
}

#[test]
fn case_insensitive_matching_is_unicode_aware() {
    let umlaut = Call::new("text_begins")
        .arg("Ä")
        .arg("ä")
        .kwarg("case_sensitive", false)
        .invoke()
        .unwrap();
    assert_eq!(umlaut, Value::from(true));
}

#[test]
fn text_merge_stringifies_elements() {
    let words = Call::new("text_merge").arg(vec!["Hello", "World"]).arg(" ").invoke().unwrap();
    assert_eq!(words, Value::from("Hello World"));

    let digits = Call::new("text_merge").arg(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 0]).invoke().unwrap();
    assert_eq!(digits, Value::from("1234567890"));

    let mixed = Value::from(vec![
        Value::nan(),
        Value::from(true),
        Value::from(false),
        Value::from(1),
        Value::from(-1.5),
        Value::from("ß"),
    ]);
    let merged = Call::new("text_merge").arg(mixed).arg("\n").invoke().unwrap();
    assert_eq!(merged, Value::from("nan\ntrue\nfalse\n1\n-1.5\nß"));

    let numeric_separator = Call::new("text_merge").arg(vec![2, 0]).arg(1).invoke().unwrap();
    assert_eq!(numeric_separator, Value::from("210"));

    let empty: Vec<String> = Vec::new();
    assert_eq!(Call::new("text_merge").arg(empty).invoke().unwrap(), Value::from(""));
}

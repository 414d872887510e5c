// src/core/value.rs

use crate::core::labelled::LabelledArray;
use crate::core::lazy::LazyArray;
use crate::core::tensor::Tensor;
use crate::engine::error::ProcessError;
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::ser::{Error as SerError, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// A single element of process data.
///
/// `Null` and a NaN `Float` are both treated as no-data.
#[derive(Debug, Clone)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    DateTime(DateTime<FixedOffset>),
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => true,
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            (Scalar::Float(a), Scalar::Float(b)) => (a.is_nan() && b.is_nan()) || a == b,
            (Scalar::Int(a), Scalar::Float(b)) | (Scalar::Float(b), Scalar::Int(a)) => {
                *a as f64 == *b
            }
            (Scalar::String(a), Scalar::String(b)) => a == b,
            (Scalar::DateTime(a), Scalar::DateTime(b)) => a == b,
            _ => false,
        }
    }
}

impl Scalar {
    pub fn nan() -> Self {
        Scalar::Float(f64::NAN)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Scalar::Float(v) if v.is_nan())
    }

    /// Null or NaN
    pub fn is_nodata(&self) -> bool {
        self.is_null() || self.is_nan()
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Scalar::Int(_) | Scalar::Float(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Integers, and floats without a fractional part.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            Scalar::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "boolean",
            Scalar::Int(_) => "integer",
            Scalar::Float(_) => "number",
            Scalar::String(_) => "string",
            Scalar::DateTime(_) => "datetime",
        }
    }

    /// Lowercase textual form used when merging heterogeneous values into text.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Null => "null".to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) if f.is_nan() => "nan".to_string(),
            Scalar::Float(f) if f.is_infinite() => {
                if *f > 0.0 {
                    "inf".to_string()
                } else {
                    "-inf".to_string()
                }
            }
            Scalar::Float(f) => f.to_string(),
            Scalar::String(s) => s.clone(),
            Scalar::DateTime(d) => d.to_rfc3339(),
        }
    }

    /// Total order used by sorting processes; no-data is handled by the caller.
    /// Values of different kinds order by kind: booleans, numbers, datetimes, strings.
    pub fn compare(&self, other: &Scalar) -> Ordering {
        fn rank(s: &Scalar) -> u8 {
            match s {
                Scalar::Null => 0,
                Scalar::Bool(_) => 1,
                Scalar::Int(_) | Scalar::Float(_) => 2,
                Scalar::DateTime(_) => 3,
                Scalar::String(_) => 4,
            }
        }

        match (self, other) {
            (Scalar::Bool(a), Scalar::Bool(b)) => a.cmp(b),
            (Scalar::Int(a), Scalar::Int(b)) => a.cmp(b),
            (Scalar::String(a), Scalar::String(b)) => a.cmp(b),
            (Scalar::DateTime(a), Scalar::DateTime(b)) => a.cmp(b),
            (a, b) if a.is_numeric() && b.is_numeric() => {
                let (x, y) = (a.as_f64().unwrap_or(f64::NAN), b.as_f64().unwrap_or(f64::NAN));
                x.partial_cmp(&y).unwrap_or_else(|| x.total_cmp(&y))
            }
            (a, b) => rank(a).cmp(&rank(b)),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(v) if v.is_nan() => write!(f, "NaN"),
            Scalar::Float(v) => match f.precision() {
                Some(p) => write!(f, "{:.*}", p, v),
                None => write!(f, "{}", v),
            },
            Scalar::String(s) => write!(f, "\"{}\"", s),
            Scalar::DateTime(d) => write!(f, "{}", d.to_rfc3339()),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_none(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Int(i) => serializer.serialize_i64(*i),
            Scalar::Float(v) if !v.is_finite() => serializer.serialize_none(),
            Scalar::Float(v) => serializer.serialize_f64(*v),
            Scalar::String(s) => serializer.serialize_str(s),
            Scalar::DateTime(d) => serializer.serialize_str(&d.to_rfc3339()),
        }
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::String(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::String(v)
    }
}

impl From<DateTime<FixedOffset>> for Scalar {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Scalar::DateTime(v)
    }
}

/// Reference to a registered process passed as an argument (`reducer`, `condition`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProcessRef {
    pub process_id: String,
}

/// Any argument or result of a process call.
#[derive(Debug, Clone)]
pub enum Value {
    Scalar(Scalar),
    List(Vec<Value>),
    Array(Tensor),
    Labelled(LabelledArray),
    Lazy(LazyArray),
    Object(IndexMap<String, Value>),
    Callback(ProcessRef),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::List(l), Value::Array(t)) | (Value::Array(t), Value::List(l)) => {
                Tensor::from_list(l).map(|lt| &lt == t).unwrap_or(false)
            }
            (Value::Labelled(a), Value::Labelled(b)) => a == b,
            (Value::Lazy(a), Value::Lazy(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Callback(a), Value::Callback(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    pub fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }

    pub fn nan() -> Self {
        Value::Scalar(Scalar::nan())
    }

    pub fn callback(process_id: impl Into<String>) -> Self {
        Value::Callback(ProcessRef {
            process_id: process_id.into(),
        })
    }

    pub fn object<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Scalar(s) => s.type_name(),
            Value::List(_) => "list",
            Value::Array(_) => "array",
            Value::Labelled(_) => "labelled array",
            Value::Lazy(_) => "lazy array",
            Value::Object(_) => "object",
            Value::Callback(_) => "process",
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tensor(&self) -> Option<&Tensor> {
        match self {
            Value::Array(t) => Some(t),
            Value::Labelled(l) => Some(&l.tensor),
            _ => None,
        }
    }

    pub fn as_labelled(&self) -> Option<&LabelledArray> {
        match self {
            Value::Labelled(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_scalar().and_then(Scalar::as_f64)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_scalar().and_then(Scalar::as_i64)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_scalar().and_then(Scalar::as_bool)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Scalar(Scalar::Null))
    }

    pub fn is_nodata(&self) -> bool {
        matches!(self, Value::Scalar(s) if s.is_nodata())
    }

    pub fn is_array_like(&self) -> bool {
        matches!(
            self,
            Value::List(_) | Value::Array(_) | Value::Labelled(_) | Value::Lazy(_)
        )
    }

    /// Materializes the value as a dense tensor. Scalars become rank-0 tensors.
    pub fn into_tensor(self) -> Result<Tensor, ProcessError> {
        match self {
            Value::Scalar(s) => Ok(Tensor::scalar(s)),
            Value::List(items) => Tensor::from_list(&items),
            Value::Array(t) => Ok(t),
            Value::Labelled(l) => Ok(l.tensor),
            Value::Lazy(l) => l.compute(),
            other => Err(ProcessError::invalid(
                "data",
                format!("a {} cannot be used as an array", other.type_name()),
            )),
        }
    }

    pub fn to_tensor(&self) -> Result<Tensor, ProcessError> {
        match self {
            Value::Array(t) => Ok(t.clone()),
            Value::Labelled(l) => Ok(l.tensor.clone()),
            Value::Lazy(l) => l.compute(),
            Value::List(items) => Tensor::from_list(items),
            Value::Scalar(s) => Ok(Tensor::scalar(s.clone())),
            other => Err(ProcessError::invalid(
                "data",
                format!("a {} cannot be used as an array", other.type_name()),
            )),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(s) => fmt::Display::fmt(s, f),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    fmt::Display::fmt(item, f)?;
                }
                write!(f, "]")
            }
            Value::Array(t) => fmt::Display::fmt(t, f),
            Value::Labelled(l) => fmt::Display::fmt(l, f),
            Value::Lazy(l) => write!(f, "lazy{:?} in {} chunks", l.shape().dims, l.num_chunks()),
            Value::Object(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "\"{}\": ", k)?;
                    fmt::Display::fmt(v, f)?;
                }
                write!(f, "}}")
            }
            Value::Callback(p) => write!(f, "process({})", p.process_id),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Scalar(s) => s.serialize(serializer),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Array(t) => t.serialize(serializer),
            Value::Labelled(l) => l.serialize(serializer),
            Value::Lazy(l) => l
                .compute()
                .map_err(<S::Error as SerError>::custom)?
                .serialize(serializer),
            Value::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Callback(p) => p.serialize(serializer),
        }
    }
}

impl From<Scalar> for Value {
    fn from(v: Scalar) -> Self {
        Value::Scalar(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(Scalar::Float(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Scalar(Scalar::Int(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Scalar(Scalar::Int(v as i64))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Scalar(Scalar::Bool(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Scalar(Scalar::String(v.to_string()))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Scalar(Scalar::String(v))
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Value::Scalar(Scalar::DateTime(v))
    }
}

impl From<Tensor> for Value {
    fn from(v: Tensor) -> Self {
        Value::Array(v)
    }
}

impl From<LabelledArray> for Value {
    fn from(v: LabelledArray) -> Self {
        Value::Labelled(v)
    }
}

impl From<LazyArray> for Value {
    fn from(v: LazyArray) -> Self {
        Value::Lazy(v)
    }
}

impl From<ProcessRef> for Value {
    fn from(v: ProcessRef) -> Self {
        Value::Callback(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or_else(Value::null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodata_detection() {
        assert!(Scalar::Null.is_nodata());
        assert!(Scalar::nan().is_nodata());
        assert!(!Scalar::Float(0.0).is_nodata());
        assert!(!Scalar::from("nan").is_nodata());
    }

    #[test]
    fn test_numeric_equality_across_types() {
        assert_eq!(Scalar::Int(3), Scalar::Float(3.0));
        assert_eq!(Scalar::nan(), Scalar::nan());
        assert_ne!(Scalar::Int(1), Scalar::from("1"));
        assert_ne!(Scalar::Bool(true), Scalar::Int(1));
    }

    #[test]
    fn test_text_form_is_lowercase() {
        assert_eq!(Scalar::Bool(true).to_text(), "true");
        assert_eq!(Scalar::nan().to_text(), "nan");
        assert_eq!(Scalar::Float(-1.5).to_text(), "-1.5");
        assert_eq!(Scalar::Float(1.0).to_text(), "1");
        assert_eq!(Scalar::Null.to_text(), "null");
    }

    #[test]
    fn test_list_equals_normalized_array() {
        let list = Value::from(vec![1, 2, 3]);
        let array = Value::Array(Tensor::from_f64(vec![1.0, 2.0, 3.0]));
        assert_eq!(list, array);
    }

    #[test]
    fn test_serialize_nodata_as_null() {
        let value = Value::from(vec![Value::from(1.5), Value::nan(), Value::null()]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "[1.5,null,null]");
    }

    #[test]
    fn test_display_honours_precision() {
        let value = Value::from(vec![1.23456, 2.0]);
        assert_eq!(format!("{:.2}", value), "[1.23, 2.00]");
        assert_eq!(format!("{}", Value::from("abc")), "\"abc\"");
    }
}

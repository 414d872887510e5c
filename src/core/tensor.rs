// src/core/tensor.rs

use crate::core::value::{Scalar, Value};
use crate::engine::error::ProcessError;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Shape of a tensor.
/// []        -> scalar (rank 0)
/// [3]       -> vector (rank 1)
/// [2, 3]    -> 2x3 matrix (rank 2)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub dims: Vec<usize>,
}

impl Shape {
    pub fn new<D: Into<Vec<usize>>>(dims: D) -> Self {
        Self { dims: dims.into() }
    }

    pub fn scalar() -> Self {
        Self { dims: Vec::new() }
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn num_elements(&self) -> usize {
        self.dims.iter().product()
    }

    /// Splits the shape around `axis` into `(outer, len, inner)` so that the
    /// element at lane position `k` is `data[(o * len + k) * inner + i]`.
    pub fn lanes(&self, axis: usize) -> (usize, usize, usize) {
        let outer = self.dims[..axis].iter().product();
        let inner = self.dims[axis + 1..].iter().product();
        (outer, self.dims[axis], inner)
    }

    pub fn without_axis(&self, axis: usize) -> Shape {
        let mut dims = self.dims.clone();
        dims.remove(axis);
        Shape { dims }
    }

    pub fn with_axis_len(&self, axis: usize, len: usize) -> Shape {
        let mut dims = self.dims.clone();
        dims[axis] = len;
        Shape { dims }
    }
}

/// Dense row-major tensor of scalars.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    pub shape: Shape,
    pub data: Vec<Scalar>,
}

impl Tensor {
    /// Creates a tensor, checking that `data.len()` matches `shape.num_elements()`.
    pub fn new(shape: Shape, data: Vec<Scalar>) -> Result<Self, ProcessError> {
        let expected = shape.num_elements();
        if data.len() != expected {
            return Err(ProcessError::ShapeMismatch(format!(
                "data length {} does not match shape {:?} (expected {})",
                data.len(),
                shape.dims,
                expected
            )));
        }
        Ok(Self { shape, data })
    }

    pub fn scalar(value: Scalar) -> Self {
        Self {
            shape: Shape::scalar(),
            data: vec![value],
        }
    }

    pub fn vector(data: Vec<Scalar>) -> Self {
        Self {
            shape: Shape::new(vec![data.len()]),
            data,
        }
    }

    pub fn from_f64(data: Vec<f64>) -> Self {
        Self::vector(data.into_iter().map(Scalar::Float).collect())
    }

    pub fn from_f64_shaped(shape: Shape, data: Vec<f64>) -> Result<Self, ProcessError> {
        Self::new(shape, data.into_iter().map(Scalar::Float).collect())
    }

    /// Builds a tensor from nested lists.
    ///
    /// Lists must be rectangular and hold scalars at the leaves. When every
    /// leaf is numeric (or null) and at least one is a float, integers are
    /// promoted to floats; mixed lists keep their element types.
    pub fn from_list(items: &[Value]) -> Result<Self, ProcessError> {
        let mut dims = vec![items.len()];
        let mut cursor = items.first();
        while let Some(item) = cursor {
            match item {
                Value::List(inner) => {
                    dims.push(inner.len());
                    cursor = inner.first();
                }
                Value::Array(t) => {
                    dims.extend_from_slice(&t.shape.dims);
                    break;
                }
                _ => break,
            }
        }

        let mut data = Vec::with_capacity(dims.iter().product());
        flatten_into(items, &dims, 0, &mut data)?;

        let all_numeric = data
            .iter()
            .all(|s| matches!(s, Scalar::Int(_) | Scalar::Float(_) | Scalar::Null));
        let any_float = data.iter().any(|s| matches!(s, Scalar::Float(_)));
        if all_numeric && any_float {
            for s in data.iter_mut() {
                if let Scalar::Int(i) = *s {
                    *s = Scalar::Float(i as f64);
                }
            }
        }

        Tensor::new(Shape::new(dims), data)
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn axis_len(&self, axis: usize) -> usize {
        self.shape.dims.get(axis).copied().unwrap_or(0)
    }

    pub fn check_axis(&self, axis: usize) -> Result<usize, ProcessError> {
        if axis < self.rank() {
            Ok(axis)
        } else {
            Err(ProcessError::invalid(
                "dimension",
                format!("axis {} does not exist for data of rank {}", axis, self.rank()),
            ))
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scalar> {
        self.data.iter()
    }

    /// Numeric view of the data; anything that is not a number becomes NaN.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.data
            .iter()
            .map(|s| s.as_f64().unwrap_or(f64::NAN))
            .collect()
    }

    /// Rank-0 tensors collapse into scalars.
    pub fn into_value(mut self) -> Value {
        if self.rank() == 0 {
            match self.data.pop() {
                Some(s) => Value::Scalar(s),
                None => Value::null(),
            }
        } else {
            Value::Array(self)
        }
    }
}

fn flatten_into(
    items: &[Value],
    dims: &[usize],
    depth: usize,
    out: &mut Vec<Scalar>,
) -> Result<(), ProcessError> {
    if items.len() != dims[depth] {
        return Err(ProcessError::invalid(
            "data",
            "nested lists must be rectangular",
        ));
    }
    let leaf = depth + 1 == dims.len();
    for item in items {
        match item {
            Value::Scalar(s) if leaf => out.push(s.clone()),
            Value::List(inner) if !leaf => flatten_into(inner, dims, depth + 1, out)?,
            Value::Array(t) if !leaf && t.shape.dims[..] == dims[depth + 1..] => {
                out.extend(t.data.iter().cloned())
            }
            other => {
                return Err(ProcessError::invalid(
                    "data",
                    format!(
                        "nested lists must be rectangular and hold scalars, found a {}",
                        other.type_name()
                    ),
                ))
            }
        }
    }
    Ok(())
}

fn fmt_nested(f: &mut fmt::Formatter<'_>, dims: &[usize], data: &[Scalar]) -> fmt::Result {
    match dims.split_first() {
        None => match data.first() {
            Some(s) => fmt::Display::fmt(s, f),
            None => write!(f, "null"),
        },
        Some((&len, rest)) => {
            let step: usize = rest.iter().product();
            write!(f, "[")?;
            for i in 0..len {
                if i > 0 {
                    write!(f, ", ")?;
                }
                fmt_nested(f, rest, &data[i * step..(i + 1) * step])?;
            }
            write!(f, "]")
        }
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_nested(f, &self.shape.dims, &self.data)
    }
}

struct Nested<'a> {
    dims: &'a [usize],
    data: &'a [Scalar],
}

impl Serialize for Nested<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.dims.split_first() {
            None => match self.data.first() {
                Some(s) => s.serialize(serializer),
                None => serializer.serialize_none(),
            },
            Some((&len, rest)) => {
                let step: usize = rest.iter().product();
                let mut seq = serializer.serialize_seq(Some(len))?;
                for i in 0..len {
                    seq.serialize_element(&Nested {
                        dims: rest,
                        data: &self.data[i * step..(i + 1) * step],
                    })?;
                }
                seq.end()
            }
        }
    }
}

impl Serialize for Tensor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Nested {
            dims: &self.shape.dims,
            data: &self.data,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_length() {
        let ok = Tensor::from_f64_shaped(Shape::new(vec![2, 2]), vec![1.0, 2.0, 3.0, 4.0]);
        assert!(ok.is_ok());
        let bad = Tensor::from_f64_shaped(Shape::new(vec![2, 3]), vec![1.0, 2.0]);
        assert!(matches!(bad, Err(ProcessError::ShapeMismatch(_))));
    }

    #[test]
    fn test_from_nested_list() {
        let list = vec![Value::from(vec![1, 2]), Value::from(vec![3, 4]), Value::from(vec![5, 6])];
        let t = Tensor::from_list(&list).unwrap();
        assert_eq!(t.shape.dims, vec![3, 2]);
        assert_eq!(t.data[5], Scalar::Int(6));
    }

    #[test]
    fn test_ragged_list_rejected() {
        let list = vec![Value::from(vec![1, 2]), Value::from(vec![3])];
        assert!(Tensor::from_list(&list).is_err());
    }

    #[test]
    fn test_int_promotion_only_for_numeric_lists() {
        let numeric = Tensor::from_list(&[Value::from(1), Value::from(2.5)]).unwrap();
        assert!(matches!(numeric.data[0], Scalar::Float(_)));

        let mixed = Tensor::from_list(&[Value::from(1), Value::from("a")]).unwrap();
        assert!(matches!(mixed.data[0], Scalar::Int(1)));
    }

    #[test]
    fn test_lanes() {
        let shape = Shape::new(vec![2, 3, 4]);
        assert_eq!(shape.lanes(0), (1, 2, 12));
        assert_eq!(shape.lanes(1), (2, 3, 4));
        assert_eq!(shape.lanes(2), (6, 4, 1));
        assert_eq!(shape.without_axis(1).dims, vec![2, 4]);
    }

    #[test]
    fn test_display_and_json_are_nested() {
        let t = Tensor::from_f64_shaped(Shape::new(vec![2, 2]), vec![1.0, 2.0, 3.5, f64::NAN]).unwrap();
        assert_eq!(t.to_string(), "[[1, 2], [3.5, NaN]]");
        assert_eq!(serde_json::to_string(&t).unwrap(), "[[1.0,2.0],[3.5,null]]");
    }

    #[test]
    fn test_rank_zero_collapses() {
        let v = Tensor::scalar(Scalar::Int(3)).into_value();
        assert_eq!(v, Value::from(3));
    }
}

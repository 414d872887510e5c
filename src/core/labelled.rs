// src/core/labelled.rs

use crate::core::tensor::{Shape, Tensor};
use crate::core::value::{Scalar, Value};
use crate::engine::error::ProcessError;
use crate::engine::kernels;
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Tensor with a name per axis and optional coordinate labels per dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledArray {
    pub tensor: Tensor,
    pub dims: Vec<String>,
    pub coords: IndexMap<String, Vec<Scalar>>,
}

impl LabelledArray {
    pub fn new(tensor: Tensor, dims: Vec<String>) -> Result<Self, ProcessError> {
        if dims.len() != tensor.rank() {
            return Err(ProcessError::ShapeMismatch(format!(
                "{} dimension names given for data of rank {}",
                dims.len(),
                tensor.rank()
            )));
        }
        for (i, name) in dims.iter().enumerate() {
            if dims[..i].contains(name) {
                return Err(ProcessError::invalid(
                    "dims",
                    format!("dimension '{}' is given more than once", name),
                ));
            }
        }
        Ok(Self {
            tensor,
            dims,
            coords: IndexMap::new(),
        })
    }

    /// Attaches coordinate labels to the dimension `dim`.
    pub fn with_coords(
        mut self,
        dim: impl Into<String>,
        labels: Vec<Scalar>,
    ) -> Result<Self, ProcessError> {
        let dim = dim.into();
        let axis = self
            .axis_of(&dim)
            .ok_or_else(|| ProcessError::invalid("coords", format!("unknown dimension '{}'", dim)))?;
        let expected = self.tensor.shape.dims[axis];
        if labels.len() != expected {
            return Err(ProcessError::ShapeMismatch(format!(
                "dimension '{}' has {} elements but {} labels were given",
                dim,
                expected,
                labels.len()
            )));
        }
        self.coords.insert(dim, labels);
        Ok(self)
    }

    pub fn shape(&self) -> &Shape {
        &self.tensor.shape
    }

    pub fn rank(&self) -> usize {
        self.tensor.rank()
    }

    pub fn axis_of(&self, name: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == name)
    }

    /// Resolves a dimension given either by name or by axis index.
    pub fn resolve_dimension(&self, dimension: &Value) -> Result<usize, ProcessError> {
        if let Some(name) = dimension.as_str() {
            return self.axis_of(name).ok_or_else(|| {
                ProcessError::invalid(
                    "dimension",
                    format!("no dimension named '{}' in {:?}", name, self.dims),
                )
            });
        }
        match dimension.as_i64() {
            Some(i) if i >= 0 && (i as usize) < self.rank() => Ok(i as usize),
            _ => Err(ProcessError::invalid(
                "dimension",
                format!("{} is not a dimension of {:?}", dimension, self.dims),
            )),
        }
    }

    /// Labels along `axis`; positions when no coordinates are attached.
    pub fn labels(&self, axis: usize) -> Vec<Scalar> {
        match self.dims.get(axis).and_then(|d| self.coords.get(d)) {
            Some(labels) => labels.clone(),
            None => (0..self.tensor.axis_len(axis))
                .map(|i| Scalar::Int(i as i64))
                .collect(),
        }
    }

    /// Same labels around a tensor of identical shape.
    pub fn replace_tensor(&self, tensor: Tensor) -> Result<Self, ProcessError> {
        if tensor.shape != self.tensor.shape {
            return Err(ProcessError::ShapeMismatch(format!(
                "expected shape {:?}, got {:?}",
                self.tensor.shape.dims, tensor.shape.dims
            )));
        }
        Ok(Self {
            tensor,
            dims: self.dims.clone(),
            coords: self.coords.clone(),
        })
    }

    /// Wraps a tensor that lost `axis` (e.g. by reduction) with the remaining labels.
    pub fn without_axis(&self, axis: usize, tensor: Tensor) -> Result<Value, ProcessError> {
        let removed = &self.dims[axis];
        let dims: Vec<String> = self
            .dims
            .iter()
            .filter(|d| *d != removed)
            .cloned()
            .collect();
        if dims.is_empty() {
            return Ok(tensor.into_value());
        }
        let mut out = LabelledArray::new(tensor, dims)?;
        out.coords = self
            .coords
            .iter()
            .filter(|(k, _)| *k != removed)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(Value::Labelled(out))
    }

    /// Picks position `index` along `axis`, dropping that axis.
    pub fn select(&self, axis: usize, index: usize) -> Result<Value, ProcessError> {
        let picked = kernels::select(&self.tensor, axis, index)?;
        self.without_axis(axis, picked)
    }
}

impl Serialize for LabelledArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("dims", &self.dims)?;
        map.serialize_entry("coords", &self.coords)?;
        map.serialize_entry("data", &self.tensor)?;
        map.end()
    }
}

impl fmt::Display for LabelledArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for (i, (name, len)) in self.dims.iter().zip(&self.tensor.shape.dims).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, len)?;
        }
        write!(f, "> ")?;
        fmt::Display::fmt(&self.tensor, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bands() -> LabelledArray {
        let t = Tensor::from_f64_shaped(Shape::new(vec![3, 2]), vec![8.0, 80.0, 4.0, 40.0, 2.0, 20.0])
            .unwrap();
        LabelledArray::new(t, vec!["s".into(), "t".into()])
            .unwrap()
            .with_coords("s", vec!["B08".into(), "B04".into(), "B02".into()])
            .unwrap()
    }

    #[test]
    fn test_dimension_resolution() {
        let arr = bands();
        assert_eq!(arr.resolve_dimension(&Value::from("t")).unwrap(), 1);
        assert_eq!(arr.resolve_dimension(&Value::from(0)).unwrap(), 0);
        assert!(arr.resolve_dimension(&Value::from("x")).is_err());
        assert!(arr.resolve_dimension(&Value::from(2)).is_err());
    }

    #[test]
    fn test_labels_default_to_positions() {
        let arr = bands();
        assert_eq!(arr.labels(1), vec![Scalar::Int(0), Scalar::Int(1)]);
        assert_eq!(arr.labels(0)[1], Scalar::from("B04"));
    }

    #[test]
    fn test_select_drops_axis_and_coords() {
        let arr = bands();
        let picked = arr.select(0, 2).unwrap();
        let picked = picked.as_labelled().unwrap();
        assert_eq!(picked.dims, vec!["t".to_string()]);
        assert!(picked.coords.is_empty());
        assert_eq!(picked.tensor.to_f64_vec(), vec![2.0, 20.0]);
    }

    #[test]
    fn test_coords_length_checked() {
        let t = Tensor::from_f64(vec![1.0, 2.0]);
        let arr = LabelledArray::new(t, vec!["x".into()]).unwrap();
        assert!(arr.with_coords("x", vec![Scalar::Int(1)]).is_err());
    }
}

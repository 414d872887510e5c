// src/engine/args.rs

use crate::core::tensor::Tensor;
use crate::core::value::{Scalar, Value};
use crate::engine::dispatch::ProcessDef;
use crate::engine::error::ProcessError;
use indexmap::IndexMap;

/// Arguments of one process call, bound to parameter names.
#[derive(Debug, Clone)]
pub struct Arguments {
    process: &'static str,
    values: IndexMap<String, Value>,
}

impl Arguments {
    /// Binds positional values in parameter order, then named values by name.
    /// Lists are normalised into dense tensors.
    pub fn bind(
        def: &ProcessDef,
        positional: Vec<Value>,
        named: Vec<(String, Value)>,
    ) -> Result<Self, ProcessError> {
        if positional.len() > def.params.len() {
            return Err(ProcessError::TooManyArguments {
                process: def.id.to_string(),
                expected: def.params.len(),
                given: positional.len(),
            });
        }

        let mut values = IndexMap::with_capacity(positional.len() + named.len());
        for (name, value) in def.params.iter().zip(positional) {
            values.insert(name.to_string(), normalize(value)?);
        }
        for (name, value) in named {
            if !def.params.contains(&name.as_str()) {
                return Err(ProcessError::UnknownParameter {
                    process: def.id.to_string(),
                    parameter: name,
                });
            }
            if values.contains_key(&name) {
                return Err(ProcessError::DuplicateArgument {
                    process: def.id.to_string(),
                    parameter: name,
                });
            }
            let value = normalize(value)?;
            values.insert(name, value);
        }

        Ok(Self {
            process: def.id,
            values,
        })
    }

    pub fn process(&self) -> &'static str {
        self.process
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Present and not null.
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_null())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.values.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn set(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Copy with `name` replaced.
    pub fn with(&self, name: &str, value: Value) -> Self {
        let mut out = self.clone();
        out.set(name, value);
        out
    }

    pub fn required(&self, name: &str) -> Result<&Value, ProcessError> {
        self.get(name).ok_or_else(|| ProcessError::MissingParameter {
            process: self.process.to_string(),
            parameter: name.to_string(),
        })
    }

    pub fn tensor(&self, name: &str) -> Result<Tensor, ProcessError> {
        self.required(name)?.to_tensor().map_err(|e| match e {
            ProcessError::InvalidArgument { message, .. } => ProcessError::invalid(name, message),
            other => other,
        })
    }

    pub fn scalar(&self, name: &str) -> Result<&Scalar, ProcessError> {
        let value = self.required(name)?;
        value.as_scalar().ok_or_else(|| {
            ProcessError::invalid(name, format!("expected a single value, found a {}", value.type_name()))
        })
    }

    /// Boolean flag; absent or null means `default`.
    pub fn flag(&self, name: &str, default: bool) -> Result<bool, ProcessError> {
        match self.get(name) {
            None => Ok(default),
            Some(v) if v.is_null() => Ok(default),
            Some(v) => v.as_bool().ok_or_else(|| {
                ProcessError::invalid(name, format!("expected a boolean, found {}", v))
            }),
        }
    }

    pub fn opt_f64(&self, name: &str) -> Result<Option<f64>, ProcessError> {
        match self.get(name) {
            None => Ok(None),
            Some(v) if v.is_null() => Ok(None),
            Some(v) => v
                .as_f64()
                .map(Some)
                .ok_or_else(|| ProcessError::invalid(name, format!("expected a number, found {}", v))),
        }
    }

    pub fn f64_or(&self, name: &str, default: f64) -> Result<f64, ProcessError> {
        Ok(self.opt_f64(name)?.unwrap_or(default))
    }

    pub fn opt_i64(&self, name: &str) -> Result<Option<i64>, ProcessError> {
        match self.get(name) {
            None => Ok(None),
            Some(v) if v.is_null() => Ok(None),
            Some(v) => v
                .as_i64()
                .map(Some)
                .ok_or_else(|| ProcessError::invalid(name, format!("expected an integer, found {}", v))),
        }
    }

    /// Axis given by `dimension` (default 0) for data of the given rank.
    pub fn axis(&self, rank: usize) -> Result<usize, ProcessError> {
        let axis = self.opt_i64("dimension")?.unwrap_or(0);
        if axis < 0 || axis as usize >= rank {
            return Err(ProcessError::invalid(
                "dimension",
                format!("axis {} does not exist for data of rank {}", axis, rank),
            ));
        }
        Ok(axis as usize)
    }

    /// Entries of the `context` object, empty when no context is given.
    pub fn context(&self) -> Result<Vec<(String, Value)>, ProcessError> {
        match self.get("context") {
            None => Ok(Vec::new()),
            Some(Value::Object(entries)) => Ok(entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()),
            Some(v) if v.is_null() => Ok(Vec::new()),
            Some(v) => Err(ProcessError::invalid(
                "context",
                format!("expected an object, found a {}", v.type_name()),
            )),
        }
    }

    /// Labelled and lazy arguments replaced by their dense tensors.
    pub fn densified(&self) -> Result<Self, ProcessError> {
        let mut out = self.clone();
        for value in out.values.values_mut() {
            match value {
                Value::Labelled(l) => *value = Value::Array(l.tensor.clone()),
                Value::Lazy(l) => *value = Value::Array(l.compute()?),
                _ => {}
            }
        }
        Ok(out)
    }
}

fn normalize(value: Value) -> Result<Value, ProcessError> {
    match value {
        Value::List(items) => Ok(Value::Array(Tensor::from_list(&items)?)),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::dispatch::ProcessKind;

    const DEMO: ProcessDef =
        ProcessDef::new("demo", "demo process", &["x", "y", "dimension"], ProcessKind::Elementwise);

    fn named(name: &str, value: Value) -> Vec<(String, Value)> {
        vec![(name.to_string(), value)]
    }

    #[test]
    fn test_positional_then_named() {
        let args = Arguments::bind(&DEMO, vec![Value::from(1)], named("y", Value::from(2))).unwrap();
        assert_eq!(args.get("x"), Some(&Value::from(1)));
        assert_eq!(args.get("y"), Some(&Value::from(2)));
        assert!(!args.is_set("dimension"));
    }

    #[test]
    fn test_binding_errors() {
        let too_many = Arguments::bind(&DEMO, vec![Value::null(); 4], Vec::new());
        assert!(matches!(too_many, Err(ProcessError::TooManyArguments { given: 4, .. })));

        let unknown = Arguments::bind(&DEMO, Vec::new(), named("z", Value::null()));
        assert!(matches!(unknown, Err(ProcessError::UnknownParameter { .. })));

        let duplicate = Arguments::bind(&DEMO, vec![Value::from(1)], named("x", Value::from(2)));
        assert!(matches!(duplicate, Err(ProcessError::DuplicateArgument { .. })));
    }

    #[test]
    fn test_lists_become_tensors() {
        let args = Arguments::bind(&DEMO, vec![Value::from(vec![1, 2, 3])], Vec::new()).unwrap();
        assert!(matches!(args.get("x"), Some(Value::Array(t)) if t.shape.dims == vec![3]));
    }

    #[test]
    fn test_axis_and_flags() {
        let args = Arguments::bind(&DEMO, vec![Value::null(), Value::null(), Value::from(1)], Vec::new())
            .unwrap();
        assert_eq!(args.axis(2).unwrap(), 1);
        assert!(args.axis(1).is_err());
        assert!(args.flag("y", true).unwrap());
        assert!(matches!(args.required("missing"), Err(ProcessError::MissingParameter { .. })));
    }
}

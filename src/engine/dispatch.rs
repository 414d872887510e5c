// src/engine/dispatch.rs

use crate::core::value::Value;
use crate::engine::args::Arguments;
use crate::engine::error::ProcessError;
use std::fmt;
use tracing::debug;

/// Implementation of a process for one data category.
pub type Handler = fn(&Arguments) -> Result<Value, ProcessError>;

/// How a process relates its output to its input shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessKind {
    /// Output has the broadcast shape of the inputs
    Elementwise,
    /// Output loses the axis named by `dimension`
    Reducer,
    Other,
}

/// Data category a call is routed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Scalar,
    Dense,
    Labelled,
    Lazy,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Scalar => "scalar",
            Category::Dense => "dense array",
            Category::Labelled => "labelled array",
            Category::Lazy => "lazy array",
        };
        write!(f, "{}", name)
    }
}

/// A registered process: its signature plus one optional handler per category.
#[derive(Clone, Copy)]
pub struct ProcessDef {
    pub id: &'static str,
    pub summary: &'static str,
    pub params: &'static [&'static str],
    pub kind: ProcessKind,
    pub exec_num: Option<Handler>,
    pub exec_np: Option<Handler>,
    pub exec_xar: Option<Handler>,
    pub exec_dar: Option<Handler>,
}

impl ProcessDef {
    pub const fn new(
        id: &'static str,
        summary: &'static str,
        params: &'static [&'static str],
        kind: ProcessKind,
    ) -> Self {
        Self {
            id,
            summary,
            params,
            kind,
            exec_num: None,
            exec_np: None,
            exec_xar: None,
            exec_dar: None,
        }
    }

    pub const fn num(self, handler: Handler) -> Self {
        Self {
            exec_num: Some(handler),
            ..self
        }
    }

    pub const fn np(self, handler: Handler) -> Self {
        Self {
            exec_np: Some(handler),
            ..self
        }
    }

    pub const fn xar(self, handler: Handler) -> Self {
        Self {
            exec_xar: Some(handler),
            ..self
        }
    }

    pub const fn dar(self, handler: Handler) -> Self {
        Self {
            exec_dar: Some(handler),
            ..self
        }
    }

    /// Same handler for scalars and dense arrays.
    pub const fn both(self, handler: Handler) -> Self {
        Self {
            exec_num: Some(handler),
            exec_np: Some(handler),
            ..self
        }
    }

    /// Categories this process can be called with.
    pub fn categories(&self) -> Vec<Category> {
        let mut out = Vec::with_capacity(4);
        if self.exec_num.is_some() {
            out.push(Category::Scalar);
        }
        if self.exec_np.is_some() {
            out.extend([Category::Dense, Category::Labelled, Category::Lazy]);
        } else {
            if self.exec_xar.is_some() {
                out.push(Category::Labelled);
            }
            if self.exec_dar.is_some() {
                out.push(Category::Lazy);
            }
        }
        out
    }

    /// Binds the arguments, classifies them and runs the matching handler.
    pub fn invoke(
        &self,
        positional: Vec<Value>,
        named: Vec<(String, Value)>,
    ) -> Result<Value, ProcessError> {
        let args = Arguments::bind(self, positional, named)?;
        let category = classify(&args)?;
        debug!(process = self.id, %category, "dispatching");

        match category {
            Category::Scalar => self.handler(self.exec_num, category)?(&args),
            Category::Dense => self.handler(self.exec_np, category)?(&args.densified()?),
            Category::Labelled => match self.exec_xar {
                Some(handler) => handler(&args),
                None => self.labelled_fallback(&args),
            },
            Category::Lazy => match self.exec_dar {
                Some(handler) => handler(&args),
                None => self.lazy_fallback(&args),
            },
        }
    }

    fn handler(&self, handler: Option<Handler>, category: Category) -> Result<Handler, ProcessError> {
        handler.ok_or_else(|| ProcessError::Unsupported {
            process: self.id.to_string(),
            category: category.to_string(),
        })
    }

    /// Runs the dense handler and puts the labels of the first labelled argument back on.
    fn labelled_fallback(&self, args: &Arguments) -> Result<Value, ProcessError> {
        let exec_np = self.handler(self.exec_np, Category::Labelled)?;
        let template = args
            .values()
            .find_map(Value::as_labelled)
            .cloned()
            .ok_or_else(|| ProcessError::UnknownDatatype("no labelled argument".to_string()))?;

        let mut dense = args.densified()?;
        let axis = if self.params.contains(&"dimension") {
            let axis = match args.get("dimension") {
                Some(dimension) if !dimension.is_null() => template.resolve_dimension(dimension)?,
                _ => 0,
            };
            dense.set("dimension", Value::from(axis as i64));
            Some(axis)
        } else {
            None
        };

        let result = exec_np(&dense)?;
        match (self.kind, axis, result) {
            (ProcessKind::Elementwise, _, Value::Array(t)) if t.shape == *template.shape() => {
                Ok(Value::Labelled(template.replace_tensor(t)?))
            }
            (ProcessKind::Reducer, Some(axis), Value::Array(t))
                if t.shape == template.shape().without_axis(axis) =>
            {
                template.without_axis(axis, t)
            }
            (_, _, result) => Ok(result),
        }
    }

    /// Elementwise work on a single lazy array stays lazy; everything else is computed.
    ///
    /// A lazy `data` argument of a process that also takes `dimension` is folded
    /// along that axis, so it is computed too.
    fn lazy_fallback(&self, args: &Arguments) -> Result<Value, ProcessError> {
        let exec_np = self.handler(self.exec_np, Category::Lazy)?;
        let arrays: Vec<(&str, &Value)> = args.iter().filter(|(_, v)| v.is_array_like()).collect();

        if self.kind == ProcessKind::Elementwise {
            if let [(name, Value::Lazy(lazy))] = arrays.as_slice() {
                if *name == "data" && self.params.contains(&"dimension") {
                    return exec_np(&args.densified()?);
                }
                let name = name.to_string();
                let template = args.clone();
                let mapped = lazy.map_blocks(move |block| {
                    exec_np(&template.with(&name, Value::Array(block)))?.into_tensor()
                });
                return Ok(Value::Lazy(mapped));
            }
        }

        exec_np(&args.densified()?)
    }
}

impl fmt::Debug for ProcessDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessDef")
            .field("id", &self.id)
            .field("params", &self.params)
            .field("kind", &self.kind)
            .field("categories", &self.categories())
            .finish()
    }
}

/// Picks the category of a call: dense > labelled > lazy > scalar.
///
/// Objects and callbacks are not data; a call made only of those is unknown.
pub fn classify(args: &Arguments) -> Result<Category, ProcessError> {
    let mut labelled = false;
    let mut lazy = false;
    let mut scalar = false;
    let mut opaque = Vec::new();

    for (name, value) in args.iter() {
        match value {
            Value::List(_) | Value::Array(_) => return Ok(Category::Dense),
            Value::Labelled(_) => labelled = true,
            Value::Lazy(_) => lazy = true,
            Value::Scalar(_) => scalar = true,
            Value::Object(_) | Value::Callback(_) => opaque.push(format!("{} ({})", name, value.type_name())),
        }
    }

    if labelled {
        Ok(Category::Labelled)
    } else if lazy {
        Ok(Category::Lazy)
    } else if scalar || opaque.is_empty() {
        Ok(Category::Scalar)
    } else {
        Err(ProcessError::UnknownDatatype(opaque.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::labelled::LabelledArray;
    use crate::core::lazy::LazyArray;
    use crate::core::tensor::Tensor;

    fn bind(values: Vec<Value>) -> Arguments {
        const ANY: ProcessDef = ProcessDef::new("any_args", "", &["a", "b", "c"], ProcessKind::Other);
        Arguments::bind(&ANY, values, Vec::new()).unwrap()
    }

    fn labelled() -> Value {
        Value::Labelled(LabelledArray::new(Tensor::from_f64(vec![1.0]), vec!["x".into()]).unwrap())
    }

    fn lazy() -> Value {
        Value::Lazy(LazyArray::from_tensor(Tensor::from_f64(vec![1.0, 2.0]), 1).unwrap())
    }

    #[test]
    fn test_dense_dominates() {
        let args = bind(vec![lazy(), labelled(), Value::from(vec![1, 2])]);
        assert_eq!(classify(&args).unwrap(), Category::Dense);
    }

    #[test]
    fn test_labelled_over_lazy_over_scalar() {
        assert_eq!(classify(&bind(vec![lazy(), labelled()])).unwrap(), Category::Labelled);
        assert_eq!(classify(&bind(vec![Value::from(1), lazy()])).unwrap(), Category::Lazy);
        assert_eq!(classify(&bind(vec![Value::from("a"), Value::null()])).unwrap(), Category::Scalar);
        assert_eq!(classify(&bind(Vec::new())).unwrap(), Category::Scalar);
    }

    #[test]
    fn test_only_opaque_values_are_unknown() {
        let args = bind(vec![Value::callback("sum"), Value::object([("y", Value::from(1))])]);
        assert!(matches!(classify(&args), Err(ProcessError::UnknownDatatype(_))));

        let mixed = bind(vec![Value::from(3), Value::callback("sum")]);
        assert_eq!(classify(&mixed).unwrap(), Category::Scalar);
    }

    fn echo(args: &Arguments) -> Result<Value, ProcessError> {
        Ok(args.required("x")?.clone())
    }

    #[test]
    fn test_missing_handler_is_unsupported() {
        const SCALAR_ONLY: ProcessDef =
            ProcessDef::new("scalar_only", "", &["x"], ProcessKind::Other).num(echo);
        assert_eq!(SCALAR_ONLY.invoke(vec![Value::from(2)], Vec::new()).unwrap(), Value::from(2));
        let err = SCALAR_ONLY.invoke(vec![Value::from(vec![1])], Vec::new()).unwrap_err();
        assert!(matches!(err, ProcessError::Unsupported { .. }));
    }
}

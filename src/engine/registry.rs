// src/engine/registry.rs

use crate::core::value::{ProcessRef, Value};
use crate::engine::dispatch::ProcessDef;
use crate::engine::error::ProcessError;
use crate::processes::{arrays, comparison, cubes, logic, math, texts};
use tracing::trace;

fn groups() -> [&'static [ProcessDef]; 6] {
    [
        math::PROCESSES,
        arrays::PROCESSES,
        comparison::PROCESSES,
        logic::PROCESSES,
        texts::PROCESSES,
        cubes::PROCESSES,
    ]
}

/// Every registered process.
pub fn processes() -> impl Iterator<Item = &'static ProcessDef> {
    groups().into_iter().flatten()
}

pub fn get_process(id: &str) -> Option<&'static ProcessDef> {
    processes().find(|p| p.id == id)
}

pub fn has_process(id: &str) -> bool {
    get_process(id).is_some()
}

/// Sorted process ids.
pub fn process_ids() -> Vec<&'static str> {
    let mut ids: Vec<&'static str> = processes().map(|p| p.id).collect();
    ids.sort_unstable();
    ids
}

pub fn call(
    id: &str,
    positional: Vec<Value>,
    named: Vec<(String, Value)>,
) -> Result<Value, ProcessError> {
    get_process(id)
        .ok_or_else(|| ProcessError::ProcessNotFound(id.to_string()))?
        .invoke(positional, named)
}

/// Calls a callback process with `value` bound to its first parameter,
/// followed by `extra` named arguments and the context entries.
pub fn call_callback(
    callback: &ProcessRef,
    value: Value,
    extra: Vec<(String, Value)>,
    context: &[(String, Value)],
) -> Result<Value, ProcessError> {
    let def = get_process(&callback.process_id)
        .ok_or_else(|| ProcessError::ProcessNotFound(callback.process_id.clone()))?;
    let first = def.params.first().ok_or_else(|| {
        ProcessError::invalid(
            "process",
            format!("'{}' takes no parameters and cannot be used as a callback", def.id),
        )
    })?;

    trace!(callback = def.id, bound = *first, "calling back");
    let mut named = Vec::with_capacity(1 + extra.len() + context.len());
    named.push((first.to_string(), value));
    named.extend(extra);
    named.extend(context.iter().cloned());
    def.invoke(Vec::new(), named)
}

/// Builder for a process call.
///
/// ```
/// use openeo_processes::{Call, Value};
///
/// let total = Call::new("sum")
///     .arg(vec![1, 2, 3])
///     .kwarg("ignore_nodata", false)
///     .invoke()
///     .unwrap();
/// assert_eq!(total, Value::from(6));
/// ```
#[derive(Debug, Clone)]
pub struct Call {
    id: String,
    positional: Vec<Value>,
    named: Vec<(String, Value)>,
}

impl Call {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            positional: Vec::new(),
            named: Vec::new(),
        }
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.push((name.into(), value.into()));
        self
    }

    pub fn invoke(self) -> Result<Value, ProcessError> {
        call(&self.id, self.positional, self.named)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids = process_ids();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(ids.len(), unique.len());
    }

    #[test]
    fn test_lookup() {
        assert!(has_process("sum"));
        assert!(has_process("text_merge"));
        assert!(!has_process("does_not_exist"));
        let err = call("does_not_exist", Vec::new(), Vec::new()).unwrap_err();
        assert_eq!(err, ProcessError::ProcessNotFound("does_not_exist".into()));
    }

    #[test]
    fn test_callback_binds_first_parameter_and_context() {
        let gt = ProcessRef { process_id: "gt".into() };
        let context = vec![("y".to_string(), Value::from(2))];
        assert_eq!(call_callback(&gt, Value::from(3), Vec::new(), &context).unwrap(), Value::from(true));
        assert_eq!(call_callback(&gt, Value::from(1), Vec::new(), &context).unwrap(), Value::from(false));
    }
}

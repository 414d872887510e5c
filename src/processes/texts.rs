// src/processes/texts.rs

use crate::core::value::{Scalar, Value};
use crate::engine::args::Arguments;
use crate::engine::dispatch::ProcessDef;
use crate::engine::dispatch::ProcessKind::{Elementwise, Other};
use crate::engine::error::ProcessError;
use crate::processes::map_param;

const MATCHING: &[&str] = &["text", "pattern", "case_sensitive"];

pub static PROCESSES: &[ProcessDef] = &[
    ProcessDef::new("text_begins", "Text begins with another text", MATCHING, Elementwise).both(text_begins),
    ProcessDef::new("text_ends", "Text ends with another text", MATCHING, Elementwise).both(text_ends),
    ProcessDef::new("text_contains", "Text contains another text", MATCHING, Elementwise).both(text_contains),
    ProcessDef::new("text_merge", "Concatenate elements to a single text", &["data", "separator"], Other)
        .both(text_merge),
];

fn text_match(args: &Arguments, test: fn(&str, &str) -> bool) -> Result<Value, ProcessError> {
    let pattern = match args.scalar("pattern")? {
        Scalar::String(p) => p.clone(),
        other => {
            return Err(ProcessError::invalid(
                "pattern",
                format!("expected a string, found a {}", other.type_name()),
            ))
        }
    };
    let case_sensitive = args.flag("case_sensitive", true)?;
    let pattern = if case_sensitive { pattern } else { pattern.to_lowercase() };

    map_param(args, "text", |s| match s {
        Scalar::Null => Ok(Scalar::Null),
        Scalar::String(text) if case_sensitive => Ok(Scalar::Bool(test(text, &pattern))),
        Scalar::String(text) => Ok(Scalar::Bool(test(&text.to_lowercase(), &pattern))),
        other => Err(ProcessError::invalid(
            "text",
            format!("expected a string, found a {}", other.type_name()),
        )),
    })
}

fn text_begins(args: &Arguments) -> Result<Value, ProcessError> {
    text_match(args, |text, pattern| text.starts_with(pattern))
}

fn text_ends(args: &Arguments) -> Result<Value, ProcessError> {
    text_match(args, |text, pattern| text.ends_with(pattern))
}

fn text_contains(args: &Arguments) -> Result<Value, ProcessError> {
    text_match(args, |text, pattern| text.contains(pattern))
}

fn text_merge(args: &Arguments) -> Result<Value, ProcessError> {
    if args.required("data")?.is_null() {
        return Ok(Value::null());
    }
    let separator = match args.get("separator") {
        Some(Value::Scalar(s)) if !s.is_null() => s.to_text(),
        Some(Value::Scalar(_)) | None => String::new(),
        Some(other) => {
            return Err(ProcessError::invalid(
                "separator",
                format!("expected a single value, found a {}", other.type_name()),
            ))
        }
    };
    let data = args.tensor("data")?;
    let parts: Vec<String> = data.iter().map(Scalar::to_text).collect();
    Ok(Value::from(parts.join(&separator)))
}

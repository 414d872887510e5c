// src/processes/logic.rs

//! Three-valued (Kleene) logic: null stands for "unknown".

use crate::core::value::{Scalar, Value};
use crate::engine::args::Arguments;
use crate::engine::dispatch::ProcessDef;
use crate::engine::dispatch::ProcessKind::{Elementwise, Reducer};
use crate::engine::error::ProcessError;
use crate::engine::kernels;
use crate::processes::{map_param, reduce_data, zip_params};

const XY: &[&str] = &["x", "y"];
const REDUCER: &[&str] = &["data", "ignore_nodata", "dimension"];

pub static PROCESSES: &[ProcessDef] = &[
    ProcessDef::new("and", "Logical AND", XY, Elementwise).both(and),
    ProcessDef::new("or", "Logical OR", XY, Elementwise).both(or),
    ProcessDef::new("xor", "Logical XOR (exclusive or)", XY, Elementwise).both(xor),
    ProcessDef::new("not", "Inverting a boolean", &["x"], Elementwise).both(not),
    ProcessDef::new("if", "If-Then-Else conditional", &["value", "accept", "reject"], Elementwise)
        .num(if_scalar)
        .np(if_dense),
    ProcessDef::new("any", "Is at least one value true?", REDUCER, Reducer).np(any),
    ProcessDef::new("all", "Are all of the values true?", REDUCER, Reducer).np(all),
];

/// Truth value of a scalar; `None` for no-data. Numbers are true when non-zero.
fn truth(s: &Scalar, parameter: &str) -> Result<Option<bool>, ProcessError> {
    match s {
        Scalar::Bool(b) => Ok(Some(*b)),
        s if s.is_nodata() => Ok(None),
        Scalar::Int(i) => Ok(Some(*i != 0)),
        Scalar::Float(f) => Ok(Some(*f != 0.0)),
        other => Err(ProcessError::invalid(
            parameter,
            format!("expected a boolean, found a {}", other.type_name()),
        )),
    }
}

fn kleene(value: Option<bool>) -> Scalar {
    value.map_or(Scalar::Null, Scalar::Bool)
}

fn and(args: &Arguments) -> Result<Value, ProcessError> {
    zip_params(args, "x", "y", |x, y| {
        Ok(kleene(match (truth(x, "x")?, truth(y, "y")?) {
            (Some(false), _) | (_, Some(false)) => Some(false),
            (Some(true), Some(true)) => Some(true),
            _ => None,
        }))
    })
}

fn or(args: &Arguments) -> Result<Value, ProcessError> {
    zip_params(args, "x", "y", |x, y| {
        Ok(kleene(match (truth(x, "x")?, truth(y, "y")?) {
            (Some(true), _) | (_, Some(true)) => Some(true),
            (Some(false), Some(false)) => Some(false),
            _ => None,
        }))
    })
}

fn xor(args: &Arguments) -> Result<Value, ProcessError> {
    zip_params(args, "x", "y", |x, y| {
        Ok(kleene(match (truth(x, "x")?, truth(y, "y")?) {
            (Some(a), Some(b)) => Some(a != b),
            _ => None,
        }))
    })
}

fn not(args: &Arguments) -> Result<Value, ProcessError> {
    map_param(args, "x", |x| Ok(kleene(truth(x, "x")?.map(|b| !b))))
}

fn if_scalar(args: &Arguments) -> Result<Value, ProcessError> {
    let value = truth(args.scalar("value")?, "value")?;
    let accept = args.required("accept")?;
    match value {
        Some(true) => Ok(accept.clone()),
        _ => Ok(args.get("reject").cloned().unwrap_or_else(Value::null)),
    }
}

fn if_dense(args: &Arguments) -> Result<Value, ProcessError> {
    let value = args.tensor("value")?;
    let accept = args.tensor("accept")?;
    let reject = match args.get("reject") {
        Some(r) => r.to_tensor()?,
        None => kernels::map(&value, |_| Ok(Scalar::Null))?,
    };
    let out = kernels::zip_n(&[&value, &accept, &reject], |s| {
        Ok(match truth(s[0], "value")? {
            Some(true) => s[1].clone(),
            _ => s[2].clone(),
        })
    })?;
    Ok(out.into_value())
}

fn any(args: &Arguments) -> Result<Value, ProcessError> {
    let ignore_nodata = args.flag("ignore_nodata", true)?;
    reduce_data(args, |lane| {
        let values = lane
            .iter()
            .map(|s| truth(s, "data"))
            .collect::<Result<Vec<_>, _>>()?;
        let known: Vec<bool> = values.iter().flatten().copied().collect();
        Ok(kleene(if known.contains(&true) {
            Some(true)
        } else if known.is_empty() || (!ignore_nodata && known.len() < values.len()) {
            None
        } else {
            Some(false)
        }))
    })
}

fn all(args: &Arguments) -> Result<Value, ProcessError> {
    let ignore_nodata = args.flag("ignore_nodata", true)?;
    reduce_data(args, |lane| {
        let values = lane
            .iter()
            .map(|s| truth(s, "data"))
            .collect::<Result<Vec<_>, _>>()?;
        let known: Vec<bool> = values.iter().flatten().copied().collect();
        Ok(kleene(if known.contains(&false) {
            Some(false)
        } else if known.is_empty() || (!ignore_nodata && known.len() < values.len()) {
            None
        } else {
            Some(true)
        }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truth_values() {
        assert_eq!(truth(&Scalar::Bool(true), "x").unwrap(), Some(true));
        assert_eq!(truth(&Scalar::Null, "x").unwrap(), None);
        assert_eq!(truth(&Scalar::nan(), "x").unwrap(), None);
        assert_eq!(truth(&Scalar::Int(0), "x").unwrap(), Some(false));
        assert!(truth(&Scalar::from("yes"), "x").is_err());
    }
}

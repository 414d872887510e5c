// src/processes/comparison.rs

use crate::core::tensor::Tensor;
use crate::core::value::{Scalar, Value};
use crate::engine::args::Arguments;
use crate::engine::dispatch::ProcessDef;
use crate::engine::dispatch::ProcessKind::Elementwise;
use crate::engine::error::ProcessError;
use crate::engine::kernels;
use crate::processes::map_param;
use crate::utils::temporal::parse_rfc3339;
use chrono::{DateTime, FixedOffset};
use std::cmp::Ordering;

const X: &[&str] = &["x"];
const EQUALITY: &[&str] = &["x", "y", "delta", "case_sensitive", "reduce"];
const RELATION: &[&str] = &["x", "y", "reduce"];

pub static PROCESSES: &[ProcessDef] = &[
    ProcessDef::new("is_nodata", "Value is not a no-data value", X, Elementwise).both(is_nodata),
    ProcessDef::new("is_nan", "Value is not a number", X, Elementwise).both(is_nan),
    ProcessDef::new("is_valid", "Value is valid data", X, Elementwise).both(is_valid),
    ProcessDef::new("eq", "Equal to comparison", EQUALITY, Elementwise).both(eq),
    ProcessDef::new("neq", "Not equal to comparison", EQUALITY, Elementwise).both(neq),
    ProcessDef::new("gt", "Greater than comparison", RELATION, Elementwise).both(gt),
    ProcessDef::new("gte", "Greater than or equal to comparison", RELATION, Elementwise).both(gte),
    ProcessDef::new("lt", "Less than comparison", RELATION, Elementwise).both(lt),
    ProcessDef::new("lte", "Less than or equal to comparison", RELATION, Elementwise).both(lte),
    ProcessDef::new(
        "between",
        "Between comparison",
        &["x", "min", "max", "exclude_max", "reduce"],
        Elementwise,
    )
    .both(between),
];

fn is_nodata(args: &Arguments) -> Result<Value, ProcessError> {
    map_param(args, "x", |s| Ok(Scalar::Bool(s.is_nodata())))
}

fn is_nan(args: &Arguments) -> Result<Value, ProcessError> {
    map_param(args, "x", |s| {
        Ok(Scalar::Bool(match s {
            Scalar::Int(_) => false,
            Scalar::Float(f) => f.is_nan(),
            _ => true,
        }))
    })
}

fn is_valid(args: &Arguments) -> Result<Value, ProcessError> {
    map_param(args, "x", |s| {
        Ok(Scalar::Bool(match s {
            Scalar::Float(f) => f.is_finite(),
            other => !other.is_null(),
        }))
    })
}

/// The instant a scalar stands for: datetimes, and strings in RFC3339 form.
fn instant(s: &Scalar) -> Result<Option<DateTime<FixedOffset>>, ProcessError> {
    match s {
        Scalar::DateTime(d) => Ok(Some(*d)),
        Scalar::String(text) => parse_rfc3339(text, false),
        _ => Ok(None),
    }
}

/// Order of two non-missing scalars, `None` when they cannot be ordered.
fn ordering(x: &Scalar, y: &Scalar) -> Result<Option<Ordering>, ProcessError> {
    if let (Some(a), Some(b)) = (x.as_f64(), y.as_f64()) {
        return Ok(a.partial_cmp(&b));
    }
    match (instant(x)?, instant(y)?) {
        (Some(a), Some(b)) => Ok(Some(a.cmp(&b))),
        _ => Ok(None),
    }
}

fn equal(x: &Scalar, y: &Scalar, delta: Option<f64>, case_sensitive: bool) -> Result<bool, ProcessError> {
    if let (Some(a), Some(b)) = (x.as_f64(), y.as_f64()) {
        return Ok(match delta {
            Some(delta) => (a - b).abs() <= delta,
            None => a == b,
        });
    }
    if let (Some(a), Some(b)) = (instant(x)?, instant(y)?) {
        return Ok(a == b);
    }
    Ok(match (x, y) {
        (Scalar::String(a), Scalar::String(b)) if case_sensitive => a == b,
        (Scalar::String(a), Scalar::String(b)) => a.to_lowercase() == b.to_lowercase(),
        (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
        _ => false,
    })
}

/// Collapses an elementwise result into a single boolean when `reduce` is set.
fn finish(args: &Arguments, result: Tensor) -> Result<Value, ProcessError> {
    if args.flag("reduce", false)? && result.rank() > 0 {
        let all = result.iter().all(|s| s.as_bool() == Some(true));
        return Ok(Value::from(all));
    }
    Ok(result.into_value())
}

fn compare_with<F>(args: &Arguments, test: F) -> Result<Value, ProcessError>
where
    F: Fn(&Scalar, &Scalar) -> Result<bool, ProcessError>,
{
    let (x, y) = (args.tensor("x")?, args.tensor("y")?);
    let result = kernels::zip(&x, &y, |a, b| {
        if a.is_nodata() || b.is_nodata() {
            return Ok(Scalar::Null);
        }
        Ok(Scalar::Bool(test(a, b)?))
    })?;
    finish(args, result)
}

fn equality(args: &Arguments, negate: bool) -> Result<Value, ProcessError> {
    let delta = args.opt_f64("delta")?;
    let case_sensitive = args.flag("case_sensitive", true)?;
    compare_with(args, |a, b| Ok(equal(a, b, delta, case_sensitive)? != negate))
}

fn eq(args: &Arguments) -> Result<Value, ProcessError> {
    equality(args, false)
}

fn neq(args: &Arguments) -> Result<Value, ProcessError> {
    equality(args, true)
}

fn relation(args: &Arguments, accept: fn(Ordering) -> bool) -> Result<Value, ProcessError> {
    compare_with(args, |a, b| Ok(ordering(a, b)?.is_some_and(accept)))
}

fn gt(args: &Arguments) -> Result<Value, ProcessError> {
    relation(args, Ordering::is_gt)
}

fn gte(args: &Arguments) -> Result<Value, ProcessError> {
    relation(args, Ordering::is_ge)
}

fn lt(args: &Arguments) -> Result<Value, ProcessError> {
    relation(args, Ordering::is_lt)
}

fn lte(args: &Arguments) -> Result<Value, ProcessError> {
    relation(args, Ordering::is_le)
}

fn between(args: &Arguments) -> Result<Value, ProcessError> {
    let exclude_max = args.flag("exclude_max", false)?;
    let (x, min, max) = (args.tensor("x")?, args.tensor("min")?, args.tensor("max")?);
    let result = kernels::zip_n(&[&x, &min, &max], |s| {
        let (x, min, max) = (s[0], s[1], s[2]);
        if x.is_nodata() || min.is_nodata() || max.is_nodata() {
            return Ok(Scalar::Null);
        }
        if ordering(max, min)? == Some(Ordering::Less) {
            return Ok(Scalar::Bool(false));
        }
        let above_min = ordering(x, min)?.is_some_and(Ordering::is_ge);
        let below_max = ordering(x, max)?.is_some_and(|o| if exclude_max { o.is_lt() } else { o.is_le() });
        Ok(Scalar::Bool(above_min && below_max))
    })?;
    finish(args, result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_of_temporal_strings() {
        let a = Scalar::from("2018-01-01T00:00:00Z");
        let b = Scalar::from("2018-01-01T00:00:00+01:00");
        assert_eq!(ordering(&a, &b).unwrap(), Some(Ordering::Greater));
        assert_eq!(ordering(&Scalar::from("a"), &Scalar::from("b")).unwrap(), None);
        assert_eq!(ordering(&Scalar::Int(1), &Scalar::Float(0.5)).unwrap(), Some(Ordering::Greater));
    }

    #[test]
    fn test_equality_rules() {
        assert!(equal(&Scalar::Int(1), &Scalar::Float(1.0), None, true).unwrap());
        assert!(equal(&Scalar::Float(1.0), &Scalar::Float(1.1), Some(0.2), true).unwrap());
        assert!(!equal(&Scalar::from("Test"), &Scalar::from("test"), None, true).unwrap());
        assert!(equal(&Scalar::from("Test"), &Scalar::from("test"), None, false).unwrap());
        assert!(!equal(&Scalar::from("1"), &Scalar::Int(1), None, true).unwrap());
    }

    #[test]
    fn test_hour_24_is_rejected() {
        let a = Scalar::from("2018-01-01T24:00:00Z");
        assert!(ordering(&a, &Scalar::from("2018-01-02T00:00:00Z")).is_err());
    }
}

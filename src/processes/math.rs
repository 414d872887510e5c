// src/processes/math.rs

use crate::core::tensor::Tensor;
use crate::core::value::{Scalar, Value};
use crate::engine::args::Arguments;
use crate::engine::dispatch::ProcessDef;
use crate::engine::dispatch::ProcessKind::{Elementwise, Other, Reducer};
use crate::engine::error::ProcessError;
use crate::engine::kernels::{self, number};
use crate::processes::{map_param, reduce_data, valid_numbers, zip_params};

const X: &[&str] = &["x"];
const XY: &[&str] = &["x", "y"];
const NARY: &[&str] = &["x", "y", "data", "ignore_nodata", "dimension"];
const REDUCER: &[&str] = &["data", "ignore_nodata", "dimension"];

pub static PROCESSES: &[ProcessDef] = &[
    ProcessDef::new("e", "Euler's number", &[], Other).both(e),
    ProcessDef::new("pi", "Pi", &[], Other).both(pi),
    ProcessDef::new("floor", "Round down", X, Elementwise).both(floor),
    ProcessDef::new("ceil", "Round up", X, Elementwise).both(ceil),
    ProcessDef::new("int", "Integer part of a number", X, Elementwise).both(int),
    ProcessDef::new("round", "Round to a precision", &["x", "p"], Elementwise).both(round),
    ProcessDef::new("exp", "Exponentiation to the base e", &["p"], Elementwise).both(exp),
    ProcessDef::new("ln", "Natural logarithm", X, Elementwise).both(ln),
    ProcessDef::new("log", "Logarithm to a base", &["x", "base"], Elementwise).both(log),
    ProcessDef::new("cos", "Cosine", X, Elementwise).both(cos),
    ProcessDef::new("arccos", "Inverse cosine", X, Elementwise).both(arccos),
    ProcessDef::new("cosh", "Hyperbolic cosine", X, Elementwise).both(cosh),
    ProcessDef::new("arcosh", "Inverse hyperbolic cosine", X, Elementwise).both(arcosh),
    ProcessDef::new("sin", "Sine", X, Elementwise).both(sin),
    ProcessDef::new("arcsin", "Inverse sine", X, Elementwise).both(arcsin),
    ProcessDef::new("sinh", "Hyperbolic sine", X, Elementwise).both(sinh),
    ProcessDef::new("arsinh", "Inverse hyperbolic sine", X, Elementwise).both(arsinh),
    ProcessDef::new("tan", "Tangent", X, Elementwise).both(tan),
    ProcessDef::new("arctan", "Inverse tangent", X, Elementwise).both(arctan),
    ProcessDef::new("tanh", "Hyperbolic tangent", X, Elementwise).both(tanh),
    ProcessDef::new("artanh", "Inverse hyperbolic tangent", X, Elementwise).both(artanh),
    ProcessDef::new("absolute", "Absolute value", X, Elementwise).both(absolute),
    ProcessDef::new("sgn", "Signum", X, Elementwise).both(sgn),
    ProcessDef::new("sqrt", "Square root", X, Elementwise).both(sqrt),
    ProcessDef::new("arctan2", "Inverse tangent of two numbers", &["y", "x"], Elementwise).both(arctan2),
    ProcessDef::new("mod", "Modulo", XY, Elementwise).both(modulo),
    ProcessDef::new("power", "Exponentiation", &["base", "p"], Elementwise).both(power),
    ProcessDef::new("add", "Addition of two numbers", XY, Elementwise).both(add),
    ProcessDef::new("subtract", "Subtraction of two or more numbers", NARY, Elementwise).both(subtract),
    ProcessDef::new("multiply", "Multiplication of two or more numbers", NARY, Elementwise).both(multiply),
    ProcessDef::new("divide", "Division of two or more numbers", NARY, Elementwise).both(divide),
    ProcessDef::new("normalized_difference", "Normalized difference", XY, Elementwise)
        .both(normalized_difference),
    ProcessDef::new(
        "linear_scale_range",
        "Linear transformation between two ranges",
        &["x", "input_min", "input_max", "output_min", "output_max"],
        Elementwise,
    )
    .both(linear_scale_range),
    ProcessDef::new("scale", "Scale with a multiplier", &["x", "factor"], Elementwise).both(scale),
    ProcessDef::new("clip", "Clip a value between a minimum and a maximum", &["x", "min", "max"], Elementwise)
        .both(clip),
    ProcessDef::new("mean", "Arithmetic mean (average)", REDUCER, Reducer).np(mean),
    ProcessDef::new("min", "Minimum value", REDUCER, Reducer).np(min),
    ProcessDef::new("max", "Maximum value", REDUCER, Reducer).np(max),
    ProcessDef::new("median", "Statistical median", REDUCER, Reducer).np(median),
    ProcessDef::new("sd", "Standard deviation", REDUCER, Reducer).np(sd),
    ProcessDef::new("variance", "Variance", REDUCER, Reducer).np(variance),
    ProcessDef::new("extrema", "Minimum and maximum values", REDUCER, Other).np(extrema),
    ProcessDef::new(
        "quantiles",
        "Quantiles",
        &["data", "probabilities", "q", "ignore_nodata", "dimension"],
        Other,
    )
    .np(quantiles),
    ProcessDef::new("sum", "Compute the sum by adding up numbers", &["data", "ignore_nodata", "dimension", "extra_values"], Reducer)
        .np(sum),
    ProcessDef::new("product", "Compute the product by multiplying numbers", &["data", "ignore_nodata", "dimension", "extra_values"], Reducer)
        .np(product),
    ProcessDef::new("cummin", "Cumulative minima", REDUCER, Other).np(cummin),
    ProcessDef::new("cummax", "Cumulative maxima", REDUCER, Other).np(cummax),
    ProcessDef::new("cumproduct", "Cumulative products", REDUCER, Other).np(cumproduct),
    ProcessDef::new("cumsum", "Cumulative sums", REDUCER, Other).np(cumsum),
];

// ---- elementwise helpers ----

fn unary(args: &Arguments, name: &str, f: fn(f64) -> f64) -> Result<Value, ProcessError> {
    map_param(args, name, |s| match s {
        Scalar::Null => Ok(Scalar::Null),
        s => Ok(Scalar::Float(f(number(s, name)?))),
    })
}

fn binary(args: &Arguments, a: &str, b: &str, f: fn(f64, f64) -> f64) -> Result<Value, ProcessError> {
    zip_params(args, a, b, |x, y| {
        if x.is_null() || y.is_null() {
            return Ok(Scalar::Null);
        }
        Ok(Scalar::Float(f(number(x, a)?, number(y, b)?)))
    })
}

/// Integer arithmetic while both operands are integers and the result fits.
fn arithmetic(
    args: &Arguments,
    checked: fn(i64, i64) -> Option<i64>,
    f: fn(f64, f64) -> f64,
) -> Result<Value, ProcessError> {
    zip_params(args, "x", "y", |x, y| match (x, y) {
        (Scalar::Null, _) | (_, Scalar::Null) => Ok(Scalar::Null),
        (Scalar::Int(i), Scalar::Int(j)) => Ok(checked(*i, *j)
            .map(Scalar::Int)
            .unwrap_or_else(|| Scalar::Float(f(*i as f64, *j as f64)))),
        _ => Ok(Scalar::Float(f(number(x, "x")?, number(y, "y")?))),
    })
}

fn e(_: &Arguments) -> Result<Value, ProcessError> {
    Ok(Value::from(std::f64::consts::E))
}

fn pi(_: &Arguments) -> Result<Value, ProcessError> {
    Ok(Value::from(std::f64::consts::PI))
}

fn floor(args: &Arguments) -> Result<Value, ProcessError> {
    unary(args, "x", f64::floor)
}

fn ceil(args: &Arguments) -> Result<Value, ProcessError> {
    unary(args, "x", f64::ceil)
}

fn int(args: &Arguments) -> Result<Value, ProcessError> {
    map_param(args, "x", |s| match s {
        Scalar::Null | Scalar::Int(_) => Ok(s.clone()),
        s => {
            let v = number(s, "x")?.trunc();
            if v.is_finite() && v.abs() < i64::MAX as f64 {
                Ok(Scalar::Int(v as i64))
            } else {
                Ok(Scalar::Float(v))
            }
        }
    })
}

/// Half-to-even rounding at `p` decimals; negative `p` rounds left of the point.
fn round_to(x: f64, p: i64) -> f64 {
    let exp = p.unsigned_abs().min(308) as i32;
    let factor = 10f64.powi(exp);
    if p >= 0 {
        (x * factor).round_ties_even() / factor
    } else {
        (x / factor).round_ties_even() * factor
    }
}

fn round(args: &Arguments) -> Result<Value, ProcessError> {
    let p = args.opt_i64("p")?.unwrap_or(0);
    map_param(args, "x", |s| match s {
        Scalar::Null => Ok(Scalar::Null),
        Scalar::Int(i) if p >= 0 => Ok(Scalar::Int(*i)),
        s => Ok(Scalar::Float(round_to(number(s, "x")?, p))),
    })
}

fn exp(args: &Arguments) -> Result<Value, ProcessError> {
    unary(args, "p", f64::exp)
}

fn ln(args: &Arguments) -> Result<Value, ProcessError> {
    unary(args, "x", f64::ln)
}

fn log(args: &Arguments) -> Result<Value, ProcessError> {
    binary(args, "x", "base", |x, base| x.ln() / base.ln())
}

fn cos(args: &Arguments) -> Result<Value, ProcessError> {
    unary(args, "x", f64::cos)
}

fn arccos(args: &Arguments) -> Result<Value, ProcessError> {
    unary(args, "x", f64::acos)
}

fn cosh(args: &Arguments) -> Result<Value, ProcessError> {
    unary(args, "x", f64::cosh)
}

fn arcosh(args: &Arguments) -> Result<Value, ProcessError> {
    unary(args, "x", f64::acosh)
}

fn sin(args: &Arguments) -> Result<Value, ProcessError> {
    unary(args, "x", f64::sin)
}

fn arcsin(args: &Arguments) -> Result<Value, ProcessError> {
    unary(args, "x", f64::asin)
}

fn sinh(args: &Arguments) -> Result<Value, ProcessError> {
    unary(args, "x", f64::sinh)
}

fn arsinh(args: &Arguments) -> Result<Value, ProcessError> {
    unary(args, "x", f64::asinh)
}

fn tan(args: &Arguments) -> Result<Value, ProcessError> {
    unary(args, "x", f64::tan)
}

fn arctan(args: &Arguments) -> Result<Value, ProcessError> {
    unary(args, "x", f64::atan)
}

fn tanh(args: &Arguments) -> Result<Value, ProcessError> {
    unary(args, "x", f64::tanh)
}

fn artanh(args: &Arguments) -> Result<Value, ProcessError> {
    unary(args, "x", f64::atanh)
}

fn absolute(args: &Arguments) -> Result<Value, ProcessError> {
    map_param(args, "x", |s| match s {
        Scalar::Null => Ok(Scalar::Null),
        Scalar::Int(i) => Ok(i
            .checked_abs()
            .map(Scalar::Int)
            .unwrap_or_else(|| Scalar::Float((*i as f64).abs()))),
        s => Ok(Scalar::Float(number(s, "x")?.abs())),
    })
}

fn sgn(args: &Arguments) -> Result<Value, ProcessError> {
    unary(args, "x", |x| if x == 0.0 { 0.0 } else { x.signum() })
}

fn sqrt(args: &Arguments) -> Result<Value, ProcessError> {
    unary(args, "x", f64::sqrt)
}

fn arctan2(args: &Arguments) -> Result<Value, ProcessError> {
    binary(args, "y", "x", f64::atan2)
}

/// Remainder with the sign of the divisor.
fn floored_mod(x: f64, y: f64) -> f64 {
    let r = x % y;
    if r != 0.0 && (r < 0.0) != (y < 0.0) {
        r + y
    } else {
        r
    }
}

fn modulo(args: &Arguments) -> Result<Value, ProcessError> {
    binary(args, "x", "y", floored_mod)
}

fn power(args: &Arguments) -> Result<Value, ProcessError> {
    binary(args, "base", "p", f64::powf)
}

fn add(args: &Arguments) -> Result<Value, ProcessError> {
    arithmetic(args, i64::checked_add, |x, y| x + y)
}

/// Folds `data` along `dimension` with `op`; needs at least two operands per lane.
fn fold_data(
    args: &Arguments,
    missing: ProcessError,
    op: fn(f64, f64) -> f64,
) -> Result<Value, ProcessError> {
    let data = args.tensor("data")?;
    let operands = if data.rank() == 0 {
        1
    } else {
        data.axis_len(args.axis(data.rank())?)
    };
    if operands < 2 {
        return Err(missing);
    }
    let ignore_nodata = args.flag("ignore_nodata", true)?;
    reduce_data(args, |lane| {
        let folded = valid_numbers(lane, ignore_nodata)?.and_then(|v| v.into_iter().reduce(op));
        Ok(Scalar::Float(folded.unwrap_or(f64::NAN)))
    })
}

fn uses_data_form(args: &Arguments) -> bool {
    args.is_set("data") && !args.is_set("x") && !args.is_set("y")
}

fn subtract(args: &Arguments) -> Result<Value, ProcessError> {
    if uses_data_form(args) {
        return fold_data(args, ProcessError::SubtrahendMissing, |x, y| x - y);
    }
    arithmetic(args, i64::checked_sub, |x, y| x - y)
}

fn multiply(args: &Arguments) -> Result<Value, ProcessError> {
    if uses_data_form(args) {
        return fold_data(args, ProcessError::MultiplicandMissing, |x, y| x * y);
    }
    arithmetic(args, i64::checked_mul, |x, y| x * y)
}

fn divide(args: &Arguments) -> Result<Value, ProcessError> {
    if uses_data_form(args) {
        return fold_data(args, ProcessError::DivisorMissing, |x, y| x / y);
    }
    binary(args, "x", "y", |x, y| x / y)
}

fn normalized_difference(args: &Arguments) -> Result<Value, ProcessError> {
    binary(args, "x", "y", |x, y| (x - y) / (x + y))
}

fn linear_scale_range(args: &Arguments) -> Result<Value, ProcessError> {
    let input_min = scalar_number(args, "input_min")?;
    let input_max = scalar_number(args, "input_max")?;
    let output_min = args.f64_or("output_min", 0.0)?;
    let output_max = args.f64_or("output_max", 1.0)?;
    map_param(args, "x", |s| match s {
        Scalar::Null => Ok(Scalar::Null),
        s => {
            let x = number(s, "x")?;
            let scaled = (x - input_min) / (input_max - input_min) * (output_max - output_min) + output_min;
            Ok(Scalar::Float(scaled))
        }
    })
}

fn scalar_number(args: &Arguments, name: &str) -> Result<f64, ProcessError> {
    number(args.scalar(name)?, name)
}

fn scale(args: &Arguments) -> Result<Value, ProcessError> {
    let factor = args.f64_or("factor", 1.0)?;
    map_param(args, "x", |s| match s {
        Scalar::Null => Ok(Scalar::Null),
        s => Ok(Scalar::Float(number(s, "x")? * factor)),
    })
}

fn clip(args: &Arguments) -> Result<Value, ProcessError> {
    let min = scalar_number(args, "min")?;
    let max = scalar_number(args, "max")?;
    map_param(args, "x", |s| match s {
        Scalar::Null => Ok(Scalar::Null),
        s => {
            let x = number(s, "x")?;
            if x.is_nan() {
                Ok(Scalar::nan())
            } else {
                Ok(Scalar::Float(x.max(min).min(max)))
            }
        }
    })
}

// ---- reducers ----

/// Reduces each lane with `f` over its valid numbers.
/// Poisoned or empty lanes give NaN.
fn statistic(args: &Arguments, f: fn(&[f64]) -> f64) -> Result<Value, ProcessError> {
    let ignore_nodata = args.flag("ignore_nodata", true)?;
    reduce_data(args, |lane| {
        let value = match valid_numbers(lane, ignore_nodata)? {
            Some(values) if !values.is_empty() => f(&values),
            _ => f64::NAN,
        };
        Ok(Scalar::Float(value))
    })
}

fn mean_of(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (one degree of freedom).
fn variance_of(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let mean = mean_of(values);
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Linear interpolation between the closest ranks of sorted values.
fn quantile_of(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    let pos = p * (sorted.len() - 1) as f64;
    let (lo, hi) = (pos.floor() as usize, pos.ceil() as usize);
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

fn mean(args: &Arguments) -> Result<Value, ProcessError> {
    statistic(args, mean_of)
}

fn min(args: &Arguments) -> Result<Value, ProcessError> {
    statistic(args, |v| v.iter().copied().fold(f64::INFINITY, f64::min))
}

fn max(args: &Arguments) -> Result<Value, ProcessError> {
    statistic(args, |v| v.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

fn median(args: &Arguments) -> Result<Value, ProcessError> {
    statistic(args, |v| quantile_of(&sorted(v), 0.5))
}

fn sd(args: &Arguments) -> Result<Value, ProcessError> {
    statistic(args, |v| variance_of(v).sqrt())
}

fn variance(args: &Arguments) -> Result<Value, ProcessError> {
    statistic(args, variance_of)
}

/// Applies `f` to every lane and stacks its `width` results on a new leading axis.
fn stacked(
    args: &Arguments,
    width: usize,
    f: impl Fn(Option<Vec<f64>>) -> Vec<f64>,
) -> Result<Value, ProcessError> {
    let ignore_nodata = args.flag("ignore_nodata", true)?;
    let lane_fn = |lane: &[Scalar]| -> Result<Vec<Scalar>, ProcessError> {
        let values = valid_numbers(lane, ignore_nodata)?;
        Ok(f(values).into_iter().map(Scalar::Float).collect())
    };

    let data = args.tensor("data")?;
    if data.rank() == 0 {
        return Ok(Value::Array(Tensor::vector(lane_fn(&data.data)?)));
    }
    let axis = args.axis(data.rank())?;
    Ok(Value::Array(kernels::expand_lanes(&data, axis, width, lane_fn)?))
}

fn extrema(args: &Arguments) -> Result<Value, ProcessError> {
    stacked(args, 2, |values| match values {
        Some(v) if !v.is_empty() => vec![
            v.iter().copied().fold(f64::INFINITY, f64::min),
            v.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        ],
        _ => vec![f64::NAN, f64::NAN],
    })
}

fn quantiles(args: &Arguments) -> Result<Value, ProcessError> {
    let probabilities = match (args.is_set("probabilities"), args.opt_i64("q")?) {
        (true, Some(_)) => return Err(ProcessError::QuantilesParameterConflict),
        (false, None) => return Err(ProcessError::QuantilesParameterMissing),
        (true, None) => kernels::numbers(&args.tensor("probabilities")?.data, "probabilities")?,
        (false, Some(q)) if q >= 1 => (1..q).map(|k| k as f64 / q as f64).collect(),
        (false, Some(q)) => {
            return Err(ProcessError::invalid("q", format!("must be at least 1, got {}", q)))
        }
    };

    stacked(args, probabilities.len(), |values| {
        let ordered = values.map(|v| sorted(&v)).unwrap_or_default();
        probabilities.iter().map(|&p| quantile_of(&ordered, p)).collect()
    })
}

fn extra_values(args: &Arguments) -> Result<Vec<f64>, ProcessError> {
    match args.get("extra_values") {
        None => Ok(Vec::new()),
        Some(v) if v.is_null() => Ok(Vec::new()),
        Some(v) => kernels::numbers(&v.to_tensor()?.data, "extra_values"),
    }
}

fn lane_count(args: &Arguments, data: &Tensor) -> Result<usize, ProcessError> {
    if data.rank() == 0 {
        Ok(1)
    } else {
        Ok(data.axis_len(args.axis(data.rank())?))
    }
}

/// nan-aware accumulation of each lane plus the extra values.
fn accumulate(
    args: &Arguments,
    identity: f64,
    op: fn(f64, f64) -> f64,
) -> Result<Value, ProcessError> {
    let ignore_nodata = args.flag("ignore_nodata", true)?;
    let extra = extra_values(args)?;
    let extra = valid_numbers(
        &extra.iter().copied().map(Scalar::Float).collect::<Vec<_>>(),
        ignore_nodata,
    )?;
    reduce_data(args, |lane| {
        let total = match (valid_numbers(lane, ignore_nodata)?, &extra) {
            (Some(values), Some(extra)) => values.iter().chain(extra).copied().fold(identity, op),
            _ => f64::NAN,
        };
        Ok(Scalar::Float(total))
    })
}

fn sum(args: &Arguments) -> Result<Value, ProcessError> {
    let data = args.tensor("data")?;
    if lane_count(args, &data)? + extra_values(args)?.len() < 2 {
        return Err(ProcessError::SummandMissing);
    }
    accumulate(args, 0.0, |a, b| a + b)
}

fn product(args: &Arguments) -> Result<Value, ProcessError> {
    let data = args.tensor("data")?;
    if data.is_empty() && extra_values(args)?.is_empty() {
        return Ok(Value::nan());
    }
    accumulate(args, 1.0, |a, b| a * b)
}

// ---- cumulative ----

/// Running `op` along each lane. Skipped no-data positions stay NaN;
/// otherwise the first no-data value turns the rest of the lane into NaN.
fn cumulative(args: &Arguments, op: fn(f64, f64) -> f64) -> Result<Value, ProcessError> {
    let data = args.tensor("data")?;
    if data.is_empty() {
        return Ok(Value::nan());
    }
    let ignore_nodata = args.flag("ignore_nodata", true)?;
    let scan = |lane: &[Scalar]| -> Result<Vec<Scalar>, ProcessError> {
        let mut acc: Option<f64> = None;
        let mut poisoned = false;
        lane.iter()
            .map(|s| {
                let v = number(s, "data")?;
                if v.is_nan() {
                    poisoned |= !ignore_nodata;
                    return Ok(Scalar::nan());
                }
                if poisoned {
                    return Ok(Scalar::nan());
                }
                let next = acc.map_or(v, |a| op(a, v));
                acc = Some(next);
                Ok(Scalar::Float(next))
            })
            .collect()
    };

    if data.rank() == 0 {
        return Ok(Value::Array(Tensor::vector(scan(&data.data)?)));
    }
    let axis = args.axis(data.rank())?;
    Ok(kernels::map_lanes(&data, axis, scan)?.into_value())
}

fn cummin(args: &Arguments) -> Result<Value, ProcessError> {
    cumulative(args, f64::min)
}

fn cummax(args: &Arguments) -> Result<Value, ProcessError> {
    cumulative(args, f64::max)
}

fn cumproduct(args: &Arguments) -> Result<Value, ProcessError> {
    cumulative(args, |a, b| a * b)
}

fn cumsum(args: &Arguments) -> Result<Value, ProcessError> {
    cumulative(args, |a, b| a + b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_to_even() {
        assert_eq!(round_to(0.5, 0), 0.0);
        assert_eq!(round_to(1.5, 0), 2.0);
        assert_eq!(round_to(-1.5, 0), -2.0);
        assert_eq!(round_to(1.2345, 2), 1.23);
        assert_eq!(round_to(1234.5, -2), 1200.0);
    }

    #[test]
    fn test_floored_mod_follows_divisor() {
        assert_eq!(floored_mod(27.0, 5.0), 2.0);
        assert_eq!(floored_mod(-27.0, 5.0), 3.0);
        assert_eq!(floored_mod(27.0, -5.0), -3.0);
        assert!(floored_mod(1.0, 0.0).is_nan());
    }

    #[test]
    fn test_quantile_interpolation() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(quantile_of(&values, 0.25), 4.0);
        assert_eq!(quantile_of(&values, 0.5), 4.5);
        assert_eq!(quantile_of(&values, 0.75), 5.5);
        assert!(quantile_of(&[], 0.5).is_nan());
    }

    #[test]
    fn test_sample_variance() {
        assert_eq!(variance_of(&[1.0, 2.0, 3.0, 4.0]), 5.0 / 3.0);
        assert!(variance_of(&[1.0]).is_nan());
    }
}

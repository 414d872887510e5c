// src/engine/kernels.rs

use crate::core::tensor::{Shape, Tensor};
use crate::core::value::Scalar;
use crate::engine::error::ProcessError;

/// Numeric value of a scalar; null reads as NaN.
pub fn number(s: &Scalar, parameter: &str) -> Result<f64, ProcessError> {
    match s {
        Scalar::Int(i) => Ok(*i as f64),
        Scalar::Float(f) => Ok(*f),
        Scalar::Null => Ok(f64::NAN),
        other => Err(ProcessError::invalid(
            parameter,
            format!("expected a number, found a {}", other.type_name()),
        )),
    }
}

pub fn numbers(values: &[Scalar], parameter: &str) -> Result<Vec<f64>, ProcessError> {
    values.iter().map(|s| number(s, parameter)).collect()
}

/// Applies `f` to every element.
pub fn map<F>(t: &Tensor, f: F) -> Result<Tensor, ProcessError>
where
    F: Fn(&Scalar) -> Result<Scalar, ProcessError>,
{
    let data = t.data.iter().map(f).collect::<Result<Vec<_>, _>>()?;
    Tensor::new(t.shape.clone(), data)
}

fn aligned_dim(shape: &Shape, rank: usize, i: usize) -> usize {
    let offset = rank - shape.rank();
    if i < offset {
        1
    } else {
        shape.dims[i - offset]
    }
}

/// Broadcast shape following numpy rules (right-aligned, size-1 axes stretch).
pub fn broadcast_shape(a: &Shape, b: &Shape) -> Result<Shape, ProcessError> {
    let rank = a.rank().max(b.rank());
    let mut dims = Vec::with_capacity(rank);
    for i in 0..rank {
        let (da, db) = (aligned_dim(a, rank, i), aligned_dim(b, rank, i));
        let d = if da == db || db == 1 {
            da
        } else if da == 1 {
            db
        } else {
            return Err(ProcessError::ShapeMismatch(format!(
                "shapes {:?} and {:?} cannot be broadcast together",
                a.dims, b.dims
            )));
        };
        dims.push(d);
    }
    Ok(Shape::new(dims))
}

/// Strides of `shape` within the broadcast output `out`; stretched axes get stride 0.
fn broadcast_strides(shape: &Shape, out: &Shape) -> Vec<usize> {
    let offset = out.rank() - shape.rank();
    let mut strides = vec![0; out.rank()];
    let mut acc = 1;
    for i in (0..shape.rank()).rev() {
        let d = shape.dims[i];
        strides[i + offset] = if d == 1 { 0 } else { acc };
        acc *= d;
    }
    strides
}

/// Element-wise combination of any number of tensors with broadcasting.
pub fn zip_n<F>(inputs: &[&Tensor], f: F) -> Result<Tensor, ProcessError>
where
    F: Fn(&[&Scalar]) -> Result<Scalar, ProcessError>,
{
    let mut shape = Shape::scalar();
    for t in inputs {
        shape = broadcast_shape(&shape, &t.shape)?;
    }
    let strides: Vec<Vec<usize>> = inputs
        .iter()
        .map(|t| broadcast_strides(&t.shape, &shape))
        .collect();

    let rank = shape.rank();
    let total = shape.num_elements();
    let mut index = vec![0usize; rank];
    let mut data = Vec::with_capacity(total);
    let mut operands: Vec<&Scalar> = Vec::with_capacity(inputs.len());

    for _ in 0..total {
        operands.clear();
        for (t, st) in inputs.iter().zip(&strides) {
            let pos: usize = index.iter().zip(st).map(|(i, s)| i * s).sum();
            operands.push(&t.data[pos]);
        }
        data.push(f(&operands)?);

        for axis in (0..rank).rev() {
            index[axis] += 1;
            if index[axis] < shape.dims[axis] {
                break;
            }
            index[axis] = 0;
        }
    }

    Tensor::new(shape, data)
}

pub fn zip<F>(a: &Tensor, b: &Tensor, f: F) -> Result<Tensor, ProcessError>
where
    F: Fn(&Scalar, &Scalar) -> Result<Scalar, ProcessError>,
{
    zip_n(&[a, b], |s| f(s[0], s[1]))
}

fn collect_lanes<R, F>(t: &Tensor, axis: usize, f: F) -> Result<Vec<R>, ProcessError>
where
    F: Fn(&[Scalar]) -> Result<R, ProcessError>,
{
    t.check_axis(axis)?;
    let (outer, n, inner) = t.shape.lanes(axis);
    let mut lane = Vec::with_capacity(n);
    let mut out = Vec::with_capacity(outer * inner);
    for o in 0..outer {
        for i in 0..inner {
            lane.clear();
            lane.extend((0..n).map(|k| t.data[(o * n + k) * inner + i].clone()));
            out.push(f(&lane)?);
        }
    }
    Ok(out)
}

/// Collapses every lane along `axis` into one value; the axis is removed.
pub fn reduce_lanes<F>(t: &Tensor, axis: usize, f: F) -> Result<Tensor, ProcessError>
where
    F: Fn(&[Scalar]) -> Result<Scalar, ProcessError>,
{
    let data = collect_lanes(t, axis, f)?;
    Tensor::new(t.shape.without_axis(axis), data)
}

/// Replaces every lane along `axis`; all lanes must come back with the same length.
pub fn map_lanes<F>(t: &Tensor, axis: usize, f: F) -> Result<Tensor, ProcessError>
where
    F: Fn(&[Scalar]) -> Result<Vec<Scalar>, ProcessError>,
{
    let results = collect_lanes(t, axis, f)?;
    let (outer, n, inner) = t.shape.lanes(axis);
    let m = results.first().map_or(n, Vec::len);
    if results.iter().any(|r| r.len() != m) {
        return Err(ProcessError::ShapeMismatch(format!(
            "lanes along axis {} produced results of different lengths",
            axis
        )));
    }

    let mut data = vec![Scalar::Null; outer * m * inner];
    for (idx, lane) in results.into_iter().enumerate() {
        let (o, i) = (idx / inner, idx % inner);
        for (k, s) in lane.into_iter().enumerate() {
            data[(o * m + k) * inner + i] = s;
        }
    }
    Tensor::new(t.shape.with_axis_len(axis, m), data)
}

/// Turns every lane along `axis` into `width` values stacked on a new leading axis.
pub fn expand_lanes<F>(t: &Tensor, axis: usize, width: usize, f: F) -> Result<Tensor, ProcessError>
where
    F: Fn(&[Scalar]) -> Result<Vec<Scalar>, ProcessError>,
{
    let results = collect_lanes(t, axis, f)?;
    let rest = t.shape.without_axis(axis);
    let count = rest.num_elements();

    let mut data = vec![Scalar::Null; width * count];
    for (idx, lane) in results.into_iter().enumerate() {
        if lane.len() != width {
            return Err(ProcessError::ShapeMismatch(format!(
                "expected {} values per lane, got {}",
                width,
                lane.len()
            )));
        }
        for (k, s) in lane.into_iter().enumerate() {
            data[k * count + idx] = s;
        }
    }

    let mut dims = Vec::with_capacity(rest.rank() + 1);
    dims.push(width);
    dims.extend(rest.dims);
    Tensor::new(Shape::new(dims), data)
}

/// Element `index` along `axis`; the axis is removed.
pub fn select(t: &Tensor, axis: usize, index: usize) -> Result<Tensor, ProcessError> {
    t.check_axis(axis)?;
    let (outer, n, inner) = t.shape.lanes(axis);
    if index >= n {
        return Err(ProcessError::IndexOutOfBounds {
            index: index as i64,
            len: n,
        });
    }
    let mut data = Vec::with_capacity(outer * inner);
    for o in 0..outer {
        let base = (o * n + index) * inner;
        data.extend_from_slice(&t.data[base..base + inner]);
    }
    Tensor::new(t.shape.without_axis(axis), data)
}

/// Gathers the given positions along `axis`.
pub fn take(t: &Tensor, axis: usize, indices: &[usize]) -> Result<Tensor, ProcessError> {
    t.check_axis(axis)?;
    let (outer, n, inner) = t.shape.lanes(axis);
    if let Some(&bad) = indices.iter().find(|&&k| k >= n) {
        return Err(ProcessError::IndexOutOfBounds {
            index: bad as i64,
            len: n,
        });
    }
    let mut data = Vec::with_capacity(outer * indices.len() * inner);
    for o in 0..outer {
        for &k in indices {
            let base = (o * n + k) * inner;
            data.extend_from_slice(&t.data[base..base + inner]);
        }
    }
    Tensor::new(t.shape.with_axis_len(axis, indices.len()), data)
}

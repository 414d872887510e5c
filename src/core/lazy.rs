// src/core/lazy.rs

use crate::core::tensor::{Shape, Tensor};
use crate::engine::error::ProcessError;
use std::fmt;
use std::sync::Arc;

type BlockFn = Arc<dyn Fn() -> Result<Tensor, ProcessError> + Send + Sync>;

#[derive(Clone)]
struct Block {
    rows: usize,
    compute: BlockFn,
}

/// Array chunked along its first axis whose blocks are computed on demand.
#[derive(Clone)]
pub struct LazyArray {
    shape: Shape,
    blocks: Vec<Block>,
}

impl LazyArray {
    /// Splits `tensor` into blocks of at most `chunk_len` rows.
    pub fn from_tensor(tensor: Tensor, chunk_len: usize) -> Result<Self, ProcessError> {
        if tensor.rank() == 0 {
            return Err(ProcessError::invalid(
                "data",
                "lazy arrays need at least one dimension",
            ));
        }
        if chunk_len == 0 {
            return Err(ProcessError::invalid("chunk_len", "must be positive"));
        }

        let shape = tensor.shape.clone();
        let rows = shape.dims[0];
        let inner: usize = shape.dims[1..].iter().product();
        let source = Arc::new(tensor);

        let mut blocks = Vec::new();
        let mut start = 0;
        while start < rows {
            let end = (start + chunk_len).min(rows);
            let block_shape = shape.with_axis_len(0, end - start);
            let src = Arc::clone(&source);
            blocks.push(Block {
                rows: end - start,
                compute: Arc::new(move || {
                    Tensor::new(
                        block_shape.clone(),
                        src.data[start * inner..end * inner].to_vec(),
                    )
                }),
            });
            start = end;
        }

        Ok(Self { shape, blocks })
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    pub fn num_chunks(&self) -> usize {
        self.blocks.len()
    }

    /// Defers a shape-preserving transformation of every block.
    pub fn map_blocks<F>(&self, f: F) -> Self
    where
        F: Fn(Tensor) -> Result<Tensor, ProcessError> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let blocks = self
            .blocks
            .iter()
            .map(|block| {
                let prev = Arc::clone(&block.compute);
                let f = Arc::clone(&f);
                Block {
                    rows: block.rows,
                    compute: Arc::new(move || f(prev()?)),
                }
            })
            .collect();
        Self {
            shape: self.shape.clone(),
            blocks,
        }
    }

    /// Runs every block and concatenates the results along the first axis.
    pub fn compute(&self) -> Result<Tensor, ProcessError> {
        let mut data = Vec::with_capacity(self.shape.num_elements());
        for block in &self.blocks {
            let part = (block.compute)()?;
            if part.shape != self.shape.with_axis_len(0, block.rows) {
                return Err(ProcessError::ShapeMismatch(format!(
                    "lazy block produced shape {:?}, expected {} rows of {:?}",
                    part.shape.dims,
                    block.rows,
                    &self.shape.dims[1..]
                )));
            }
            data.extend(part.data);
        }
        Tensor::new(self.shape.clone(), data)
    }

    /// Identity comparison; two lazy arrays are equal only if they share their blocks.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.shape == other.shape
            && self.blocks.len() == other.blocks.len()
            && self
                .blocks
                .iter()
                .zip(&other.blocks)
                .all(|(a, b)| Arc::ptr_eq(&a.compute, &b.compute))
    }
}

impl fmt::Debug for LazyArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyArray")
            .field("shape", &self.shape.dims)
            .field("chunks", &self.blocks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Scalar;

    fn sample() -> Tensor {
        Tensor::from_f64_shaped(Shape::new(vec![5, 2]), (0..10).map(|v| v as f64).collect()).unwrap()
    }

    #[test]
    fn test_chunking_and_compute() {
        let lazy = LazyArray::from_tensor(sample(), 2).unwrap();
        assert_eq!(lazy.num_chunks(), 3);
        assert_eq!(lazy.compute().unwrap(), sample());
    }

    #[test]
    fn test_map_blocks_is_deferred_and_composes() {
        let lazy = LazyArray::from_tensor(sample(), 3).unwrap();
        let doubled = lazy.map_blocks(|t| {
            let data = t.data.iter().map(|s| Scalar::Float(s.as_f64().unwrap_or(f64::NAN) * 2.0)).collect();
            Tensor::new(t.shape.clone(), data)
        });
        let out = doubled.compute().unwrap();
        assert_eq!(out.to_f64_vec()[9], 18.0);
        assert!(!doubled.ptr_eq(&lazy));
        assert!(lazy.ptr_eq(&lazy.clone()));
    }

    #[test]
    fn test_rank_zero_rejected() {
        assert!(LazyArray::from_tensor(Tensor::scalar(Scalar::Int(1)), 1).is_err());
    }
}

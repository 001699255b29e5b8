use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::dataset::Dataset;
use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DatasetError {
    #[error("x has {x_rows} rows but y has {y_len} values")]
    LengthMismatch { x_rows: usize, y_len: usize },
    #[error("dataset is empty")]
    Empty,
    #[error("row {row} has {got} features, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("range {start}..{end} out of bounds for {len} samples")]
    OutOfBounds { start: usize, end: usize, len: usize },
}

/// Rectangular `(x, y)` training data held in memory.
#[derive(Clone, Debug)]
pub struct InMemoryDataset {
    x: Vec<Vec<f32>>,
    y: Vec<f32>,
    n_features: usize,
}

impl InMemoryDataset {
    pub fn new(x: Vec<Vec<f32>>, y: Vec<f32>) -> Result<Self, DatasetError> {
        if x.len() != y.len() {
            return Err(DatasetError::LengthMismatch {
                x_rows: x.len(),
                y_len: y.len(),
            });
        }
        let Some(first) = x.first() else {
            return Err(DatasetError::Empty);
        };
        let n_features = first.len();
        if let Some((row, r)) = x.iter().enumerate().find(|(_, r)| r.len() != n_features) {
            return Err(DatasetError::RaggedRow {
                row,
                expected: n_features,
                got: r.len(),
            });
        }
        Ok(Self { x, y, n_features })
    }

    pub fn targets(&self) -> &[f32] {
        &self.y
    }

    pub fn rows(&self) -> &[Vec<f32>] {
        &self.x
    }
}

impl Dataset for InMemoryDataset {
    type Error = DatasetError;

    fn len(&self) -> usize {
        self.x.len()
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn get_batch<B: Backend>(
        &self,
        range: Range<usize>,
    ) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error> {
        if range.start > range.end || range.end > self.x.len() {
            return Err(DatasetError::OutOfBounds {
                start: range.start,
                end: range.end,
                len: self.x.len(),
            });
        }
        let batch_x = &self.x[range.clone()];
        let batch_y = &self.y[range];

        let data = batch_x.iter().flat_map(|row| row.iter()).copied().collect();
        let x_tensor = Tensor2D::<B>::new(data, batch_x.len(), self.n_features);
        let y_tensor = Tensor1D::<B>::new(batch_y.to_vec());

        Ok((x_tensor, y_tensor))
    }
}

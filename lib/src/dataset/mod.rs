//! Dataset abstractions for training data.
//!
//! - **Dataset**: a source of `(X, y)` pairs where `X` is a feature matrix of
//!   shape `(n_samples, n_features)` and `y` a target vector of shape `(n_samples,)`.
//! - **InMemoryDataset**: validated rows held in host memory.
//!
//! # Example
//!
//! ```rust
//! use porter_fare::backend::CpuBackend;
//! use porter_fare::dataset::{Dataset, InMemoryDataset};
//!
//! let x = vec![vec![1.0, 0.0], vec![2.0, 1.0]];
//! let y = vec![0.0, 1.0];
//! let dataset = InMemoryDataset::new(x, y).unwrap();
//!
//! let (x, y) = dataset.to_tensors::<CpuBackend>().unwrap();
//! assert_eq!(x.shape(), (2, 2));
//! assert_eq!(y.len(), 2);
//! ```

use crate::backend::{Backend, Tensor1D, Tensor2D};
use std::fmt::Debug;
use std::ops::Range;

pub mod memory;
pub use self::memory::{DatasetError, InMemoryDataset};

/// Abstract interface for a machine learning dataset.
pub trait Dataset {
    /// Error type returned when accessing data.
    type Error: Debug + 'static;

    /// Total number of samples.
    fn len(&self) -> usize;

    /// Number of features per sample.
    fn n_features(&self) -> usize;

    /// Checks whether the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Loads the samples in `range` as tensors.
    fn get_batch<B: Backend>(
        &self,
        range: Range<usize>,
    ) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error>;

    /// Loads every sample as tensors.
    fn to_tensors<B: Backend>(&self) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error> {
        self.get_batch(0..self.len())
    }
}

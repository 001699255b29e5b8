//! Regression models.
//!
//! Models follow the same unfitted/fitted split as the preprocessing
//! transformers: an unfitted model only carries hyperparameters, [`Regressor::fit`]
//! consumes training data and returns a separate fitted type that carries only
//! what is needed for inference.
//!
//! - [`tree::RegressionTree`]: variance-reduction CART regressor.
//! - [`forest::RandomForestRegressor`]: seeded ensemble of regression trees.

pub mod error;
pub mod forest;
pub mod tree;

pub use error::ModelError;
pub use forest::{FittedRandomForest, RandomForestRegressor};
pub use tree::{FittedRegressionTree, MaxFeatures, RegressionTree};

use crate::backend::{Backend, Tensor1D, Tensor2D};

/// An unfitted regression model holding hyperparameters.
pub trait Regressor<B: Backend>: Clone {
    /// The inference-only model produced by fitting.
    type Fitted: InferenceModel<B>;

    /// Learns a mapping from the rows of `x` to the targets `y`.
    ///
    /// # Errors
    /// Returns [`ModelError`] if `x` is empty, if `x` and `y` disagree on the
    /// number of samples, if a target is not finite, or if a hyperparameter
    /// is invalid.
    fn fit(&self, x: &Tensor2D<B>, y: &Tensor1D<B>) -> Result<Self::Fitted, ModelError>;
}

/// A fitted model ready for prediction.
///
/// Fitted models are immutable and `Send + Sync`, so a single instance can
/// serve concurrent callers without locking.
pub trait InferenceModel<B: Backend>: Clone + Send + Sync {
    /// Number of features each input row must have.
    fn n_features_in(&self) -> usize;

    /// Predicts the target for a single feature row.
    fn predict(&self, row: &[f32]) -> Result<f32, ModelError>;

    /// Predicts the target for every row of `x`.
    fn predict_batch(&self, x: &Tensor2D<B>) -> Result<Tensor1D<B>, ModelError> {
        let (rows, cols) = x.shape();
        if cols != self.n_features_in() {
            return Err(ModelError::FeatureMismatch {
                expected_features: self.n_features_in(),
                got_features: cols,
            });
        }
        let predictions = (0..rows)
            .map(|i| self.predict(&x.row(i)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Tensor1D::new(predictions))
    }
}

/// Training data validated and copied to host memory.
pub(crate) struct TrainingData {
    /// Row-major features.
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub rows: usize,
    pub cols: usize,
}

impl TrainingData {
    pub(crate) fn from_tensors<B: Backend>(
        x: &Tensor2D<B>,
        y: &Tensor1D<B>,
    ) -> Result<Self, ModelError> {
        let (rows, cols) = x.shape();
        if rows == 0 || cols == 0 {
            return Err(ModelError::EmptyData(format!(
                "cannot fit on a ({}, {}) feature matrix",
                rows, cols
            )));
        }
        if y.len() != rows {
            return Err(ModelError::LengthMismatch {
                samples: rows,
                targets: y.len(),
            });
        }
        let y = y.to_vec();
        if let Some(index) = y.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::NonFiniteTarget { index });
        }
        Ok(Self {
            x: x.ravel().to_vec(),
            y,
            rows,
            cols,
        })
    }

    #[inline]
    pub(crate) fn value(&self, row: usize, feature: usize) -> f32 {
        self.x[row * self.cols + feature]
    }
}

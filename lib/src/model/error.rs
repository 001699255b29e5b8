//! Error types for model fitting and inference.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// No samples or no features to learn from.
    #[error("Empty data: {0}")]
    EmptyData(String),
    /// Invalid hyperparameter value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Feature matrix and target vector disagree on the number of samples.
    #[error("Length mismatch: {samples} samples but {targets} targets")]
    LengthMismatch { samples: usize, targets: usize },
    /// A target value is NaN or infinite.
    #[error("Target at index {index} is not finite")]
    NonFiniteTarget { index: usize },
    /// Input row width differs from the width seen during fit.
    #[error("Feature mismatch: expected {expected_features} features, got {got_features}")]
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },
}

//! Core traits for preprocessing transformers.
//!
//! This module defines the two central traits:
//! - [`Transformer`]: used during fitting; holds hyperparameters and learns from data.
//! - [`FittedTransformer`]: after fitting; immutable and ready for inference.

use crate::backend::Backend;
use crate::preprocessing::error::PreprocessingError;

/// Trait for unfitted transformers with hyperparameters.
///
/// A transformer learns parameters from training data and can then transform
/// new data using those learned parameters. This trait represents the
/// configurable, unfitted state.
///
/// # Type Parameters
/// - `B`: The backend (e.g., `CpuBackend`) used for computation.
///
/// # Example
/// ```ignore
/// use porter_fare::preprocessing::{OneHotEncoder, Transformer};
/// use porter_fare::backend::CpuBackend;
///
/// let encoder = OneHotEncoder::<CpuBackend>::new();
/// let fitted = encoder.fit(&data)?;
/// let transformed = fitted.transform(&new_data)?;
/// ```
pub trait Transformer<B: Backend>: Clone {
    /// Input data type for transformation.
    type Input;
    /// Output data type after transformation.
    type Output;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer<B, Input = Self::Input, Output = Self::Output>;

    /// Fit the transformer to the training data.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if:
    /// - Data is empty
    /// - Data contains values the transformer cannot learn from
    /// - Shape is incompatible with the transformer
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError>;

    /// Fit the transformer and transform the data in one step.
    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let fitted = self.fit(data)?;
        fitted.transform(data)
    }
}

/// Trait for fitted transformers ready for inference.
///
/// Fitted transformers are immutable; they are `Send + Sync` whenever the
/// backend is, so a single fitted instance can serve concurrent callers.
pub trait FittedTransformer<B: Backend>: Clone {
    /// Input data type for transformation.
    type Input;
    /// Output data type after transformation.
    type Output;

    /// Transform data using learned parameters.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if:
    /// - Input shape doesn't match expected number of features
    /// - Input contains values outside what was learned during fit
    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError>;

    /// Returns the number of features seen during fit.
    fn n_features_in(&self) -> usize;

    /// Returns the number of features produced by [`transform`](Self::transform).
    fn n_features_out(&self) -> usize;
}

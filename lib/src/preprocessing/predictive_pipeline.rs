//! Predictive pipeline combining preprocessing and model inference.
//!
//! A [`PredictivePipeline`] pairs an unfitted [`ColumnTransformer`] with an
//! unfitted [`Regressor`]. Fitting runs the transformer on the raw features,
//! fits the regressor on its output and returns a [`FittedPredictivePipeline`]
//! that applies both steps to new data.

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::model::{InferenceModel, ModelError, Regressor};
use crate::preprocessing::column_transformer::{ColumnTransformer, FittedColumnTransformer};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use std::marker::PhantomData;
use thiserror::Error;

/// Error raised by either stage of a pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error(transparent)]
    Preprocessing(#[from] PreprocessingError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Unfitted pipeline: preprocessor followed by a regressor.
#[derive(Clone)]
pub struct PredictivePipeline<B: Backend, R: Regressor<B>> {
    preprocessor: ColumnTransformer<B>,
    regressor: R,
}

impl<B: Backend, R: Regressor<B>> PredictivePipeline<B, R> {
    pub fn new(preprocessor: ColumnTransformer<B>, regressor: R) -> Self {
        Self {
            preprocessor,
            regressor,
        }
    }

    /// Fits the preprocessor on `x`, then the regressor on the transformed rows.
    pub fn fit(
        &self,
        x: &Tensor2D<B>,
        y: &Tensor1D<B>,
    ) -> Result<FittedPredictivePipeline<B, R::Fitted>, PipelineError> {
        let preprocessor = self.preprocessor.fit(x)?;
        let encoded = preprocessor.transform(x)?;
        let model = self.regressor.fit(&encoded, y)?;
        Ok(FittedPredictivePipeline::new(preprocessor, model))
    }
}

/// Fitted pipeline ready for inference.
///
/// Immutable; shareable across threads when the model is.
#[derive(Clone)]
pub struct FittedPredictivePipeline<B: Backend, M: InferenceModel<B>> {
    preprocessor: FittedColumnTransformer<B>,
    model: M,
    _backend: PhantomData<B>,
}

impl<B: Backend, M: InferenceModel<B>> FittedPredictivePipeline<B, M> {
    /// Joins an already fitted preprocessor and model.
    pub fn new(preprocessor: FittedColumnTransformer<B>, model: M) -> Self {
        Self {
            preprocessor,
            model,
            _backend: PhantomData,
        }
    }

    /// Number of raw input features.
    pub fn n_features_in(&self) -> usize {
        self.preprocessor.n_features_in()
    }

    pub fn preprocessor(&self) -> &FittedColumnTransformer<B> {
        &self.preprocessor
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Transforms raw features into the model's input space.
    pub fn preprocess(&self, data: &Tensor2D<B>) -> Result<Tensor2D<B>, PreprocessingError> {
        self.preprocessor.transform(data)
    }

    /// Makes predictions on raw features.
    pub fn predict(&self, data: &Tensor2D<B>) -> Result<Tensor1D<B>, PipelineError> {
        let processed = self.preprocess(data)?;
        Ok(self.model.predict_batch(&processed)?)
    }

    /// Prediction for a single raw feature row.
    pub fn predict_one(&self, row: &[f32]) -> Result<f32, PipelineError> {
        let data = Tensor2D::new(row.to_vec(), 1, row.len());
        let predictions = self.predict(&data)?.to_vec();
        predictions
            .first()
            .copied()
            .ok_or_else(|| PipelineError::Model(ModelError::EmptyData("no prediction".into())))
    }
}

//! Data preprocessing transformers for machine learning pipelines.
//!
//! Transformers follow the same unfitted/fitted split as the models in this
//! crate: an unfitted transformer carries hyperparameters, fitting returns a
//! separate immutable type ready for inference.
//!
//! # Core Traits
//!
//! - [`Transformer`]: Unfitted transformer with hyperparameters
//! - [`FittedTransformer`]: Fitted transformer ready for inference
//!
//! # Available Transformers
//!
//! - [`OneHotEncoder`]: categorical integer codes to dummy columns
//! - [`ColumnTransformer`]: per-column steps plus a [`Remainder`] policy
//! - [`PredictivePipeline`]: a column transformer followed by a regressor
//!
//! # Example
//!
//! ```ignore
//! use porter_fare::preprocessing::{ColumnSpec, ColumnTransformer, OneHotEncoder, Remainder};
//!
//! let ct = ColumnTransformer::<CpuBackend>::new()
//!     .add_one_hot_encoder(OneHotEncoder::new(), ColumnSpec::Indices(vec![0, 2]))
//!     .with_remainder(Remainder::Passthrough);
//! let fitted = ct.fit(&training_data)?;
//! let encoded = fitted.transform(&new_data)?;
//! ```

pub mod column_transformer;
pub mod encoding;
pub mod error;
pub mod predictive_pipeline;
pub mod traits;

// Re-export main types
pub use column_transformer::{
    ColumnSpec, ColumnTransformer, ColumnTransformerStep, FittedColumnTransformer, Remainder,
};
pub use encoding::{FittedOneHotEncoder, HandleUnknown, OneHotEncoder};
pub use error::PreprocessingError;
pub use predictive_pipeline::{FittedPredictivePipeline, PipelineError, PredictivePipeline};
pub use traits::{FittedTransformer, Transformer};

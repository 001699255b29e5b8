//! Porter fare estimation.
//!
//! - [`simulator`]: the closed-form tariff and the synthetic training corpus
//! - [`estimator`]: a one-hot + random forest pipeline fitted on that corpus
//! - [`booking`]: the scripted quote → accepted confirmation
//!
//! ```
//! use porter_fare::fare::{BagSize, Season, Station, TripRecord};
//! use porter_fare::fare::simulator::closed_form_price;
//!
//! let trip = TripRecord::new(Station::NewDelhi, 5, Season::Summer, 2, 30, BagSize::Medium, 100)
//!     .unwrap();
//! assert_eq!(closed_form_price(&trip), 58);
//! ```

pub mod booking;
pub mod estimator;
pub mod schema;
pub mod simulator;
pub mod trip;

pub use booking::{Accepted, Booking, Quote, Quoted};
pub use estimator::{EstimatorSettings, FareEstimator, LazyEstimator};
pub use schema::FeatureSchema;
pub use simulator::{closed_form_price, Corpus, Coverage};
pub use trip::{BagSize, Season, Station, TripRecord};

use crate::dataset::DatasetError;
use crate::model::ModelError;
use crate::preprocessing::PreprocessingError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FareError {
    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("unsupported {field}: {value:?}")]
    UnsupportedCategory { field: &'static str, value: String },
    #[error("cannot train on an empty corpus")]
    InsufficientTrainingData,
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Preprocessing(#[from] PreprocessingError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

//! Categorical feature encoding transformers.
//!
//! ## OneHotEncoder
//! Converts categorical integer codes to one-hot (dummy) encoding.
//!
//! ```ignore
//! // Input: [[0], [1], [2]]  (3 samples, 1 categorical feature)
//! // Output: [[1,0,0], [0,1,0], [0,0,1]]  (3 samples, 3 binary features)
//! ```
//!
//! # Design Notes
//!
//! Encoders work on `f32` tensors where categories are already mapped to
//! integer codes by the caller. Domain types (stations, seasons, ...) own
//! that mapping, so no string handling happens in here.

mod one_hot;

pub use one_hot::{FittedOneHotEncoder, OneHotEncoder};

use serde::Deserialize;

/// Strategy for handling unknown categories during transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleUnknown {
    /// Raise an error when unknown categories are encountered.
    #[default]
    Error,
    /// Ignore unknown categories (the one-hot block is all zeros).
    Ignore,
}

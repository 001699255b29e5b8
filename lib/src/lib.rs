//! # porter_fare
//!
//! Estimates the charge of a railway station porter from trip parameters.
//! A deterministic tariff labels a synthetic corpus, and a one-hot encoder
//! followed by a random forest is fitted on it once per process.
//!
//! ## Core Design Principles
//!
//! - **Stateful Type Safety**: transformers and models are split into unfitted
//!   and fitted types, so nothing predicts before it has been trained.
//! - **Exact Tariff**: the closed-form price is computed in integer hundredths
//!   and rounded half to even.
//! - **Backend Agnosticism**: the ML plumbing is generic over a `Backend` trait.
//!
//! ## Quick Start
//!
//! ```rust
//! use porter_fare::fare::{closed_form_price, estimator, BagSize, Season, Station, TripRecord};
//!
//! let trip = TripRecord::new(
//!     Station::NewDelhi,
//!     5,
//!     Season::Summer,
//!     2,
//!     30,
//!     BagSize::Medium,
//!     100,
//! )?;
//! assert_eq!(closed_form_price(&trip), 58);
//!
//! let estimate = estimator::shared().get()?.predict(&trip)?;
//! assert!(estimate > 0);
//! # Ok::<(), porter_fare::fare::FareError>(())
//! ```
//!
//! ## Module Structure
//!
//! - `backend`: tensor abstractions (`Tensor1D`, `Tensor2D`)
//! - `dataset`: in-memory training data
//! - `preprocessing`: one-hot encoding, column transformer, predictive pipeline
//! - `model`: regression trees and random forests
//! - `metrics`: regression fit metrics
//! - `fare`: tariff, corpus, estimator and booking
//! - `cli`: the `porter-fare` command line
//! - `settings`, `telemetry`: configuration and logging for the binary

pub mod backend;

pub mod cli;

/// Data loading utilities and dataset abstractions.
pub mod dataset;

/// Data preprocessing transformers for ML pipelines.
pub mod preprocessing;

/// Tree-based regressors with unfitted/fitted separation.
pub mod model;

pub mod metrics;

/// Porter fare domain.
pub mod fare;

pub mod settings;
pub mod telemetry;

pub use fare::{FareError, FareEstimator, TripRecord};
pub use settings::Settings;

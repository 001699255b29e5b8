//! The fitted fare model and its process-wide lazy instance.
//!
//! [`FareEstimator::fit`] encodes the corpus with [`FeatureSchema`], fits a
//! [`RandomForestRegressor`] behind a one-hot [`ColumnTransformer`] and keeps
//! the training-fit metrics. The result is immutable and `Send + Sync`.
//!
//! [`ColumnTransformer`]: crate::preprocessing::ColumnTransformer

use crate::backend::CpuBackend;
use crate::dataset::{Dataset, InMemoryDataset};
use crate::fare::booking::Quote;
use crate::fare::simulator::{Corpus, DEFAULT_CORPUS_SIZE};
use crate::fare::{FareError, FeatureSchema, TripRecord};
use crate::metrics::RegressionMetrics;
use crate::model::{FittedRandomForest, InferenceModel, MaxFeatures, RandomForestRegressor};
use crate::preprocessing::{
    FittedPredictivePipeline, HandleUnknown, PipelineError, PredictivePipeline,
};
use once_cell::sync::{Lazy, OnceCell};
use serde::Deserialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// `max_features` as written in configuration: `"sqrt"`, `"all"` or a fraction.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MaxFeaturesSetting {
    Named(MaxFeaturesName),
    Fraction(f32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaxFeaturesName {
    Sqrt,
    All,
}

impl Default for MaxFeaturesSetting {
    fn default() -> Self {
        MaxFeaturesSetting::Named(MaxFeaturesName::Sqrt)
    }
}

impl From<MaxFeaturesSetting> for MaxFeatures {
    fn from(setting: MaxFeaturesSetting) -> Self {
        match setting {
            MaxFeaturesSetting::Named(MaxFeaturesName::Sqrt) => MaxFeatures::Sqrt,
            MaxFeaturesSetting::Named(MaxFeaturesName::All) => MaxFeatures::All,
            MaxFeaturesSetting::Fraction(f) => MaxFeatures::Fraction(f),
        }
    }
}

/// Hyperparameters of the fare model.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EstimatorSettings {
    pub n_estimators: usize,
    pub seed: u64,
    pub max_features: MaxFeaturesSetting,
    pub bootstrap: bool,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub handle_unknown: HandleUnknown,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            seed: 42,
            max_features: MaxFeaturesSetting::default(),
            bootstrap: false,
            max_depth: None,
            min_samples_split: 2,
            handle_unknown: HandleUnknown::Error,
        }
    }
}

impl EstimatorSettings {
    pub fn regressor(&self) -> RandomForestRegressor<CpuBackend> {
        RandomForestRegressor::new()
            .with_n_estimators(self.n_estimators)
            .with_seed(self.seed)
            .with_max_features(self.max_features.into())
            .with_bootstrap(self.bootstrap)
            .with_max_depth(self.max_depth)
            .with_min_samples_split(self.min_samples_split)
    }
}

type FarePipeline = FittedPredictivePipeline<CpuBackend, FittedRandomForest<CpuBackend>>;

/// A fare model fitted once on a labelled corpus.
#[derive(Clone)]
pub struct FareEstimator {
    pipeline: FarePipeline,
    schema: FeatureSchema,
    report: RegressionMetrics,
}

impl std::fmt::Debug for FareEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FareEstimator")
            .field("n_features_in", &self.pipeline.n_features_in())
            .field("report", &self.report)
            .finish()
    }
}

impl FareEstimator {
    pub fn fit(corpus: &Corpus, settings: &EstimatorSettings) -> Result<Self, FareError> {
        if corpus.is_empty() {
            return Err(FareError::InsufficientTrainingData);
        }
        if settings.bootstrap {
            warn!("bootstrap enabled; training labels will not be reproduced exactly");
        }

        let schema = FeatureSchema;
        let rows = corpus.records().iter().map(|t| schema.row(t)).collect();
        let targets = corpus.labels().iter().map(|&p| p as f32).collect();
        let dataset = InMemoryDataset::new(rows, targets)?;
        let (x, y) = dataset.to_tensors::<CpuBackend>()?;

        let pipeline = PredictivePipeline::new(
            schema.column_transformer(settings.handle_unknown),
            settings.regressor(),
        )
        .fit(&x, &y)
        .map_err(|e| lift(&schema, e))?;

        let predictions = pipeline.predict(&x).map_err(|e| lift(&schema, e))?.to_vec();
        let report = RegressionMetrics::compute(dataset.targets(), &predictions);
        info!(
            samples = report.n_samples,
            trees = pipeline.model().n_trees(),
            encoded_width = pipeline.model().n_features_in(),
            mae = report.mae,
            max_abs_error = report.max_abs_error,
            r_squared = report.r_squared,
            "fare estimator trained"
        );

        Ok(Self {
            pipeline,
            schema,
            report,
        })
    }

    /// Unrounded model output.
    pub fn predict_raw(&self, trip: &TripRecord) -> Result<f32, FareError> {
        self.pipeline
            .predict_one(&self.schema.row(trip))
            .map_err(|e| lift(&self.schema, e))
    }

    /// Estimated price, rounded half to even and clamped at zero.
    pub fn predict(&self, trip: &TripRecord) -> Result<u32, FareError> {
        let raw = self.predict_raw(trip)?;
        let price = (raw.max(0.0) as f64).round_ties_even() as u32;
        debug!(station = %trip.station(), season = %trip.season(), raw, price, "predicted fare");
        Ok(price)
    }

    pub fn predict_corpus(&self, corpus: &Corpus) -> Result<Vec<u32>, FareError> {
        corpus.records().iter().map(|t| self.predict(t)).collect()
    }

    pub fn quote(&self, trip: &TripRecord) -> Result<Quote, FareError> {
        Ok(Quote {
            trip: *trip,
            price: self.predict(trip)?,
        })
    }

    /// Fit metrics on the training corpus.
    pub fn training_report(&self) -> RegressionMetrics {
        self.report
    }

    /// Width of the encoded feature vector the forest sees.
    pub fn encoded_width(&self) -> usize {
        self.pipeline.model().n_features_in()
    }
}

fn lift(schema: &FeatureSchema, err: PipelineError) -> FareError {
    match err {
        PipelineError::Preprocessing(e) => schema.domain_error(e),
        PipelineError::Model(e) => FareError::Model(e),
    }
}

/// Trains a [`FareEstimator`] on first use and hands out the same instance
/// afterwards.
///
/// Concurrent first callers block on the single initializer. A failed
/// initialization leaves the cell empty, so the next call retries.
pub struct LazyEstimator {
    corpus_size: usize,
    settings: EstimatorSettings,
    cell: OnceCell<Arc<FareEstimator>>,
    trainings: AtomicUsize,
}

impl LazyEstimator {
    pub fn new(corpus_size: usize, settings: EstimatorSettings) -> Self {
        Self {
            corpus_size,
            settings,
            cell: OnceCell::new(),
            trainings: AtomicUsize::new(0),
        }
    }

    pub fn get(&self) -> Result<Arc<FareEstimator>, FareError> {
        self.cell
            .get_or_try_init(|| {
                let corpus = Corpus::generate(self.corpus_size);
                let estimator = FareEstimator::fit(&corpus, &self.settings)?;
                self.trainings.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(estimator))
            })
            .cloned()
    }

    pub fn is_trained(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Completed trainings; at most one.
    pub fn trainings(&self) -> usize {
        self.trainings.load(Ordering::SeqCst)
    }
}

impl Default for LazyEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_CORPUS_SIZE, EstimatorSettings::default())
    }
}

static SHARED: Lazy<LazyEstimator> = Lazy::new(LazyEstimator::default);

/// Process-wide estimator built from default settings.
pub fn shared() -> &'static LazyEstimator {
    &SHARED
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fare::{BagSize, Season, Station};
    use crate::model::ModelError;

    fn quick() -> EstimatorSettings {
        EstimatorSettings {
            n_estimators: 10,
            ..EstimatorSettings::default()
        }
    }

    #[test]
    fn test_fit_reproduces_training_labels() {
        let corpus = Corpus::generate(200);
        let est = FareEstimator::fit(&corpus, &quick()).unwrap();

        assert_eq!(est.encoded_width(), 16);
        let predicted = est.predict_corpus(&corpus).unwrap();
        for ((trip, label), p) in corpus.iter().zip(predicted) {
            assert!(p.abs_diff(label) <= 1, "{:?}: {} vs {}", trip, p, label);
        }
        assert!(est.training_report().max_abs_error < 1e-3);
    }

    #[test]
    fn test_empty_corpus_rejected() {
        let err = FareEstimator::fit(&Corpus::generate(0), &quick()).unwrap_err();
        assert_eq!(err, FareError::InsufficientTrainingData);
    }

    #[test]
    fn test_station_missing_from_training_rejected() {
        // three records: New Delhi, Mumbai CST, Howrah
        let est = FareEstimator::fit(&Corpus::generate(3), &quick()).unwrap();
        let trip = TripRecord::new(
            Station::BengaluruCity,
            1,
            Season::Summer,
            1,
            10,
            BagSize::Small,
            50,
        )
        .unwrap();
        assert_eq!(
            est.predict(&trip).unwrap_err(),
            FareError::UnsupportedCategory {
                field: "station",
                value: "Bengaluru City".to_string()
            }
        );
    }

    #[test]
    fn test_ignore_policy_still_predicts() {
        let settings = EstimatorSettings {
            handle_unknown: HandleUnknown::Ignore,
            ..quick()
        };
        let est = FareEstimator::fit(&Corpus::generate(3), &settings).unwrap();
        let trip =
            TripRecord::new(Station::BengaluruCity, 1, Season::Summer, 1, 10, BagSize::Small, 50)
                .unwrap();
        assert!(est.predict(&trip).is_ok());
    }

    #[test]
    fn test_invalid_settings_surface_as_model_error() {
        let settings = EstimatorSettings {
            n_estimators: 0,
            ..quick()
        };
        assert!(matches!(
            FareEstimator::fit(&Corpus::generate(20), &settings),
            Err(FareError::Model(ModelError::InvalidParameter(_)))
        ));
    }

    #[test]
    fn test_quote_carries_trip() {
        let est = FareEstimator::fit(&Corpus::generate(40), &quick()).unwrap();
        let trip = Corpus::generate(40).records()[7];
        let quote = est.quote(&trip).unwrap();
        assert_eq!(quote.trip, trip);
        assert_eq!(quote.price, est.predict(&trip).unwrap());
    }

    #[test]
    fn test_max_features_setting_parses() {
        let named: MaxFeaturesSetting = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(MaxFeatures::from(named), MaxFeatures::All);
        let fraction: MaxFeaturesSetting = serde_json::from_str("0.5").unwrap();
        assert_eq!(MaxFeatures::from(fraction), MaxFeatures::Fraction(0.5));
    }

    #[test]
    fn test_lazy_trains_once_under_contention() {
        let lazy = LazyEstimator::new(60, quick());
        assert!(!lazy.is_trained());

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| lazy.get().unwrap());
            }
        });

        assert!(lazy.is_trained());
        assert_eq!(lazy.trainings(), 1);
        let a = lazy.get().unwrap();
        let b = lazy.get().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(lazy.trainings(), 1);
    }

    #[test]
    fn test_lazy_failure_is_retryable() {
        let lazy = LazyEstimator::new(0, quick());
        assert_eq!(lazy.get().unwrap_err(), FareError::InsufficientTrainingData);
        assert!(!lazy.is_trained());
        assert_eq!(lazy.trainings(), 0);
    }
}

//! Random forest regression.
//!
//! An ensemble of [`RegressionTree`]s whose predictions are averaged. Each tree
//! gets its own RNG stream derived from the forest seed, so fitting the same
//! data with the same seed always yields the same forest.
//!
//! Diversity comes from per-split feature sampling ([`MaxFeatures`]) and,
//! optionally, from bootstrap resampling of the training rows. Without
//! bootstrap every tree sees all rows and, grown to purity, reproduces the
//! training targets exactly.

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::model::tree::{FittedRegressionTree, MaxFeatures, RegressionTree};
use crate::model::{InferenceModel, ModelError, Regressor, TrainingData};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::marker::PhantomData;

/// Unfitted random forest regressor.
///
/// # Example
/// ```
/// use porter_fare::backend::{CpuBackend, Tensor1D, Tensor2D};
/// use porter_fare::model::{InferenceModel, RandomForestRegressor, Regressor};
///
/// let x = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0], 4, 1);
/// let y = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0]);
///
/// let forest = RandomForestRegressor::<CpuBackend>::new()
///     .with_n_estimators(10)
///     .fit(&x, &y)
///     .unwrap();
/// assert_eq!(forest.n_trees(), 10);
/// assert!((forest.predict(&[3.0]).unwrap() - 3.0).abs() < 1e-6);
/// ```
#[derive(Clone, Debug)]
pub struct RandomForestRegressor<B: Backend> {
    n_estimators: usize,
    bootstrap: bool,
    seed: u64,
    tree: RegressionTree<B>,
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for RandomForestRegressor<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> RandomForestRegressor<B> {
    /// 100 fully grown trees, `sqrt` feature sampling, no bootstrap, seed 42.
    pub fn new() -> Self {
        Self {
            n_estimators: 100,
            bootstrap: false,
            seed: 42,
            tree: RegressionTree::new().with_max_features(MaxFeatures::Sqrt),
            _backend: PhantomData,
        }
    }

    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    /// Resample training rows with replacement for each tree.
    pub fn with_bootstrap(mut self, bootstrap: bool) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.tree = self.tree.with_max_features(max_features);
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.tree = self.tree.with_max_depth(max_depth);
        self
    }

    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.tree = self.tree.with_min_samples_split(min_samples_split);
        self
    }

    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    pub fn bootstrap(&self) -> bool {
        self.bootstrap
    }
}

impl<B: Backend> Regressor<B> for RandomForestRegressor<B> {
    type Fitted = FittedRandomForest<B>;

    fn fit(&self, x: &Tensor2D<B>, y: &Tensor1D<B>) -> Result<Self::Fitted, ModelError> {
        if self.n_estimators == 0 {
            return Err(ModelError::InvalidParameter(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        self.tree.validate()?;
        let data = TrainingData::from_tensors(x, y)?;

        let trees = (0..self.n_estimators)
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(t as u64));
                let indices: Vec<usize> = if self.bootstrap {
                    (0..data.rows)
                        .map(|_| rng.gen_range(0..data.rows))
                        .collect()
                } else {
                    (0..data.rows).collect()
                };
                self.tree.grow(&data, indices, &mut rng)
            })
            .collect();

        Ok(FittedRandomForest {
            trees,
            n_features: data.cols,
            _backend: PhantomData,
        })
    }
}

/// Fitted random forest: the average of its trees.
#[derive(Clone, Debug)]
pub struct FittedRandomForest<B: Backend> {
    trees: Vec<FittedRegressionTree<B>>,
    n_features: usize,
    _backend: PhantomData<B>,
}

impl<B: Backend> FittedRandomForest<B> {
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn trees(&self) -> &[FittedRegressionTree<B>] {
        &self.trees
    }
}

impl<B: Backend> InferenceModel<B> for FittedRandomForest<B> {
    fn n_features_in(&self) -> usize {
        self.n_features
    }

    fn predict(&self, row: &[f32]) -> Result<f32, ModelError> {
        if row.len() != self.n_features {
            return Err(ModelError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: row.len(),
            });
        }
        let sum: f64 = self
            .trees
            .iter()
            .map(|t| t.predict_unchecked(row) as f64)
            .sum();
        Ok((sum / self.trees.len() as f64) as f32)
    }
}

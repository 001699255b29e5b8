//! Regression trees (CART with variance reduction).
//!
//! Trees are grown depth-first. A node becomes a leaf when its targets are
//! all equal, when it has fewer than `min_samples_split` samples, when
//! `max_depth` is reached, or when no feature varies inside it. With the
//! default hyperparameters a tree therefore reproduces every training target
//! whose feature row is unique.

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::model::{InferenceModel, ModelError, Regressor, TrainingData};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use std::marker::PhantomData;

/// Number of features considered when searching for the best split.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MaxFeatures {
    /// Every feature at every split.
    All,
    /// `ceil(sqrt(n_features))` features per split.
    Sqrt,
    /// A fraction in `(0, 1]` of the features, at least one.
    Fraction(f32),
}

impl MaxFeatures {
    pub(crate) fn resolve(&self, n_features: usize) -> usize {
        let k = match self {
            MaxFeatures::All => n_features,
            MaxFeatures::Sqrt => (n_features as f64).sqrt().ceil() as usize,
            MaxFeatures::Fraction(f) => (n_features as f64 * *f as f64).round() as usize,
        };
        k.clamp(1, n_features.max(1))
    }

    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        match self {
            MaxFeatures::Fraction(f) if !(*f > 0.0 && *f <= 1.0) => Err(
                ModelError::InvalidParameter(format!("max_features fraction {} not in (0, 1]", f)),
            ),
            _ => Ok(()),
        }
    }
}

/// A node of a fitted tree. Children are indices into the node arena.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Node {
    Leaf {
        value: f32,
    },
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
}

/// Unfitted regression tree.
///
/// # Example
/// ```
/// use porter_fare::backend::{CpuBackend, Tensor1D, Tensor2D};
/// use porter_fare::model::{InferenceModel, RegressionTree, Regressor};
///
/// let x = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0], 4, 1);
/// let y = Tensor1D::<CpuBackend>::new(vec![10.0, 10.0, 30.0, 30.0]);
///
/// let tree = RegressionTree::<CpuBackend>::new().fit(&x, &y).unwrap();
/// assert_eq!(tree.predict(&[2.4]).unwrap(), 10.0);
/// assert_eq!(tree.predict(&[3.6]).unwrap(), 30.0);
/// ```
#[derive(Clone, Debug)]
pub struct RegressionTree<B: Backend> {
    max_depth: Option<usize>,
    min_samples_split: usize,
    max_features: MaxFeatures,
    seed: u64,
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for RegressionTree<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> RegressionTree<B> {
    /// A fully grown tree that considers every feature at every split.
    pub fn new() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            max_features: MaxFeatures::All,
            seed: 0,
            _backend: PhantomData,
        }
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    /// Seed for the per-split feature sampling.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if self.min_samples_split < 2 {
            return Err(ModelError::InvalidParameter(format!(
                "min_samples_split must be at least 2, got {}",
                self.min_samples_split
            )));
        }
        if self.max_depth == Some(0) {
            return Err(ModelError::InvalidParameter(
                "max_depth must be at least 1".to_string(),
            ));
        }
        self.max_features.validate()
    }

    /// Grows a tree on the samples listed in `indices` (duplicates allowed).
    pub(crate) fn grow(
        &self,
        data: &TrainingData,
        mut indices: Vec<usize>,
        rng: &mut StdRng,
    ) -> FittedRegressionTree<B> {
        let mut grower = Grower {
            params: self,
            data,
            rng,
            n_candidates: self.max_features.resolve(data.cols),
            nodes: Vec::new(),
        };
        grower.build(&mut indices, 0);
        FittedRegressionTree {
            nodes: grower.nodes,
            n_features: data.cols,
            _backend: PhantomData,
        }
    }
}

impl<B: Backend> Regressor<B> for RegressionTree<B> {
    type Fitted = FittedRegressionTree<B>;

    fn fit(&self, x: &Tensor2D<B>, y: &Tensor1D<B>) -> Result<Self::Fitted, ModelError> {
        self.validate()?;
        let data = TrainingData::from_tensors(x, y)?;
        let mut rng = StdRng::seed_from_u64(self.seed);
        Ok(self.grow(&data, (0..data.rows).collect(), &mut rng))
    }
}

struct SplitCandidate {
    feature: usize,
    threshold: f32,
    /// Sum of squared errors of both children.
    sse: f64,
}

struct Grower<'a, B: Backend> {
    params: &'a RegressionTree<B>,
    data: &'a TrainingData,
    rng: &'a mut StdRng,
    n_candidates: usize,
    nodes: Vec<Node>,
}

impl<B: Backend> Grower<'_, B> {
    fn build(&mut self, indices: &mut [usize], depth: usize) -> usize {
        let id = self.nodes.len();
        let mean = mean_target(self.data, indices);
        self.nodes.push(Node::Leaf { value: mean });

        let too_small = indices.len() < self.params.min_samples_split;
        let too_deep = self.params.max_depth.is_some_and(|d| depth >= d);
        if too_small || too_deep || is_pure(self.data, indices) {
            return id;
        }

        let Some(split) = self.best_split(indices) else {
            return id;
        };

        let data = self.data;
        indices.sort_by_key(|&i| data.value(i, split.feature) > split.threshold);
        let n_left = indices
            .iter()
            .take_while(|&&i| data.value(i, split.feature) <= split.threshold)
            .count();
        let (left_idx, right_idx) = indices.split_at_mut(n_left);

        let left = self.build(left_idx, depth + 1);
        let right = self.build(right_idx, depth + 1);
        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }

    /// Visits features in random order; stops once `n_candidates` features were
    /// examined and at least one of them could split the node.
    fn best_split(&mut self, indices: &[usize]) -> Option<SplitCandidate> {
        let order = index::sample(&mut *self.rng, self.data.cols, self.data.cols);
        let mut best: Option<SplitCandidate> = None;

        for (visited, feature) in order.into_iter().enumerate() {
            if visited >= self.n_candidates && best.is_some() {
                break;
            }
            if let Some(candidate) = best_split_on(self.data, indices, feature) {
                if best.as_ref().map_or(true, |b| candidate.sse < b.sse) {
                    best = Some(candidate);
                }
            }
        }
        best
    }
}

fn mean_target(data: &TrainingData, indices: &[usize]) -> f32 {
    let sum: f64 = indices.iter().map(|&i| data.y[i] as f64).sum();
    (sum / indices.len().max(1) as f64) as f32
}

fn is_pure(data: &TrainingData, indices: &[usize]) -> bool {
    let first = data.y[indices[0]];
    indices.iter().all(|&i| data.y[i] == first)
}

/// Best threshold on one feature by exhaustive scan over sorted values.
fn best_split_on(data: &TrainingData, indices: &[usize], feature: usize) -> Option<SplitCandidate> {
    let mut sorted: Vec<(f32, f64)> = indices
        .iter()
        .map(|&i| (data.value(i, feature), data.y[i] as f64))
        .collect();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let n = sorted.len();
    let total_sum: f64 = sorted.iter().map(|p| p.1).sum();
    let total_sq: f64 = sorted.iter().map(|p| p.1 * p.1).sum();

    let mut left_sum = 0.0;
    let mut left_sq = 0.0;
    let mut best: Option<SplitCandidate> = None;

    for k in 1..n {
        let (prev_x, prev_y) = sorted[k - 1];
        left_sum += prev_y;
        left_sq += prev_y * prev_y;

        let next_x = sorted[k].0;
        if prev_x >= next_x {
            continue;
        }

        let n_left = k as f64;
        let n_right = (n - k) as f64;
        let right_sum = total_sum - left_sum;
        let right_sq = total_sq - left_sq;
        let sse = (left_sq - left_sum * left_sum / n_left)
            + (right_sq - right_sum * right_sum / n_right);

        if best.as_ref().map_or(true, |b| sse < b.sse) {
            let mut threshold = prev_x + (next_x - prev_x) / 2.0;
            if threshold >= next_x {
                threshold = prev_x;
            }
            best = Some(SplitCandidate {
                feature,
                threshold,
                sse,
            });
        }
    }
    best
}

/// Fitted regression tree.
#[derive(Clone, Debug)]
pub struct FittedRegressionTree<B: Backend> {
    nodes: Vec<Node>,
    n_features: usize,
    _backend: PhantomData<B>,
}

impl<B: Backend> FittedRegressionTree<B> {
    /// Number of nodes, leaves included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Feature and threshold of the first split; `None` for a single leaf.
    pub fn root_split(&self) -> Option<(usize, f32)> {
        match self.nodes.first()? {
            Node::Split {
                feature, threshold, ..
            } => Some((*feature, *threshold)),
            Node::Leaf { .. } => None,
        }
    }

    /// Length of the longest root-to-leaf path, in edges.
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], id: usize) -> usize {
            match nodes[id] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
            }
        }
        walk(&self.nodes, 0)
    }

    pub(crate) fn predict_unchecked(&self, row: &[f32]) -> f32 {
        let mut id = 0;
        loop {
            match self.nodes[id] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => id = if row[feature] <= threshold { left } else { right },
            }
        }
    }
}

impl<B: Backend> InferenceModel<B> for FittedRegressionTree<B> {
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
        Ok(self.predict_unchecked(row))
    }
}

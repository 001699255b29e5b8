//! ColumnTransformer implementation.
//!
//! Applies different transformers to different column subsets and concatenates
//! the results. Columns no step claims are dropped or passed through according
//! to the [`Remainder`] policy and always come last in the output.

use crate::backend::{Backend, Tensor2D};
use crate::preprocessing::encoding::{FittedOneHotEncoder, OneHotEncoder};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use std::collections::BTreeSet;
use std::marker::PhantomData;
use std::ops::Range;

/// Specifies which columns a transformer should be applied to.
#[derive(Clone, Debug)]
pub enum ColumnSpec {
    /// Apply to specific column indices.
    Indices(Vec<usize>),
    /// Apply to a range of columns.
    Range(Range<usize>),
    /// Apply to all columns.
    All,
}

impl ColumnSpec {
    /// Resolve the column spec to actual column indices.
    fn resolve(&self, n_features: usize) -> Vec<usize> {
        match self {
            ColumnSpec::Indices(indices) => indices.clone(),
            ColumnSpec::Range(range) => range.clone().collect(),
            ColumnSpec::All => (0..n_features).collect(),
        }
    }
}

/// What happens to columns that no step selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Remainder {
    /// Leave them out of the output.
    #[default]
    Drop,
    /// Copy them unchanged after all step outputs, in ascending column order.
    Passthrough,
}

/// Enum of unfitted transformers that can be used in a ColumnTransformer.
#[derive(Clone)]
pub enum ColumnTransformerStep<B: Backend> {
    OneHotEncoder(OneHotEncoder<B>),
    /// Copies the selected columns unchanged.
    Passthrough,
}

/// Enum of fitted transformers for ColumnTransformer.
#[derive(Clone)]
pub enum FittedColumnTransformerStep<B: Backend> {
    OneHotEncoder(FittedOneHotEncoder<B>),
    Passthrough { n_features: usize },
}

impl<B: Backend> FittedColumnTransformerStep<B> {
    /// Transform the data.
    fn transform(&self, data: &Tensor2D<B>) -> Result<Tensor2D<B>, PreprocessingError> {
        match self {
            FittedColumnTransformerStep::OneHotEncoder(t) => t.transform(data),
            FittedColumnTransformerStep::Passthrough { .. } => Ok(data.clone()),
        }
    }

    /// Get the step name.
    fn step_name(&self) -> &'static str {
        match self {
            FittedColumnTransformerStep::OneHotEncoder(_) => "OneHotEncoder",
            FittedColumnTransformerStep::Passthrough { .. } => "Passthrough",
        }
    }

    /// Get the number of output features.
    fn n_features_out(&self) -> usize {
        match self {
            FittedColumnTransformerStep::OneHotEncoder(t) => t.n_features_out(),
            FittedColumnTransformerStep::Passthrough { n_features } => *n_features,
        }
    }
}

/// Fit a column transformer step from an unfitted step.
fn fit_step<B: Backend>(
    step: &ColumnTransformerStep<B>,
    data: &Tensor2D<B>,
) -> Result<FittedColumnTransformerStep<B>, PreprocessingError> {
    match step {
        ColumnTransformerStep::OneHotEncoder(t) => {
            t.fit(data).map(FittedColumnTransformerStep::OneHotEncoder)
        }
        ColumnTransformerStep::Passthrough => Ok(FittedColumnTransformerStep::Passthrough {
            n_features: data.shape().1,
        }),
    }
}

/// ColumnTransformer applies different transformers to different columns.
///
/// # Example
/// ```
/// use porter_fare::backend::{CpuBackend, Tensor2D};
/// use porter_fare::preprocessing::{
///     ColumnSpec, ColumnTransformer, FittedTransformer, OneHotEncoder, Remainder, Transformer,
/// };
///
/// // Columns: [city_code, distance]
/// let data = Tensor2D::<CpuBackend>::new(vec![0.0, 120.0, 1.0, 80.0], 2, 2);
/// let ct = ColumnTransformer::<CpuBackend>::new()
///     .add_one_hot_encoder(OneHotEncoder::new(), ColumnSpec::Indices(vec![0]))
///     .with_remainder(Remainder::Passthrough);
///
/// let fitted = ct.fit(&data).unwrap();
/// let out = fitted.transform(&data).unwrap();
/// assert_eq!(out.row(0), vec![1.0, 0.0, 120.0]);
/// ```
#[derive(Clone)]
pub struct ColumnTransformer<B: Backend> {
    steps: Vec<(ColumnSpec, ColumnTransformerStep<B>)>,
    remainder: Remainder,
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for ColumnTransformer<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> ColumnTransformer<B> {
    /// Create a new empty ColumnTransformer.
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            remainder: Remainder::default(),
            _backend: PhantomData,
        }
    }

    /// Add a OneHotEncoder for specified columns.
    pub fn add_one_hot_encoder(mut self, encoder: OneHotEncoder<B>, spec: ColumnSpec) -> Self {
        self.steps
            .push((spec, ColumnTransformerStep::OneHotEncoder(encoder)));
        self
    }

    /// Passes the given columns through unchanged.
    pub fn add_passthrough(mut self, spec: ColumnSpec) -> Self {
        self.steps.push((spec, ColumnTransformerStep::Passthrough));
        self
    }

    /// Add a generic step.
    pub fn add(mut self, step: ColumnTransformerStep<B>, spec: ColumnSpec) -> Self {
        self.steps.push((spec, step));
        self
    }

    /// Set the policy for columns no step selected.
    pub fn with_remainder(mut self, remainder: Remainder) -> Self {
        self.remainder = remainder;
        self
    }

    /// Get the number of transformer steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Fitted ColumnTransformer ready for inference.
#[derive(Clone)]
pub struct FittedColumnTransformer<B: Backend> {
    /// Fitted steps with their column indices.
    fitted_steps: Vec<(Vec<usize>, FittedColumnTransformerStep<B>)>,
    n_features_in: usize,
    n_features_out: usize,
    _backend: PhantomData<B>,
}

impl<B: Backend> FittedColumnTransformer<B> {
    /// Get step names and the input columns each step reads.
    pub fn step_names(&self) -> Vec<(&'static str, &[usize])> {
        self.fitted_steps
            .iter()
            .map(|(cols, step)| (step.step_name(), cols.as_slice()))
            .collect()
    }
}

impl<B: Backend> Transformer<B> for ColumnTransformer<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Fitted = FittedColumnTransformer<B>;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let (rows, cols) = data.shape();

        if rows == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit ColumnTransformer on empty data".to_string(),
            ));
        }

        if self.steps.is_empty() && self.remainder == Remainder::Drop {
            return Err(PreprocessingError::InvalidParameter(
                "Cannot fit empty ColumnTransformer".to_string(),
            ));
        }

        let mut fitted_steps = Vec::with_capacity(self.steps.len() + 1);
        let mut claimed = BTreeSet::new();
        let mut n_features_out = 0;

        for (spec, step) in &self.steps {
            let columns = spec.resolve(cols);

            for &col in &columns {
                if col >= cols {
                    return Err(PreprocessingError::InvalidParameter(format!(
                        "Column index {} out of bounds for {} columns",
                        col, cols
                    )));
                }
                claimed.insert(col);
            }

            let fitted = fit_step(step, &data.select_columns(&columns))?;

            n_features_out += fitted.n_features_out();
            fitted_steps.push((columns, fitted));
        }

        if self.remainder == Remainder::Passthrough {
            let rest: Vec<usize> = (0..cols).filter(|c| !claimed.contains(c)).collect();
            if !rest.is_empty() {
                n_features_out += rest.len();
                fitted_steps.push((
                    rest.clone(),
                    FittedColumnTransformerStep::Passthrough {
                        n_features: rest.len(),
                    },
                ));
            }
        }

        Ok(FittedColumnTransformer {
            fitted_steps,
            n_features_in: cols,
            n_features_out,
            _backend: PhantomData,
        })
    }
}

impl<B: Backend> FittedTransformer<B> for FittedColumnTransformer<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let (rows, cols) = data.shape();

        if cols != self.n_features_in {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features_in,
                got_features: cols,
            });
        }

        if rows == 0 {
            return Ok(Tensor2D::zeros(0, self.n_features_out));
        }

        let mut outputs = Vec::with_capacity(self.fitted_steps.len());
        for (columns, step) in &self.fitted_steps {
            let out = step
                .transform(&data.select_columns(columns))
                .map_err(|e| match e {
                    // report the column of the caller's input, not the step's
                    PreprocessingError::UnknownCategory { column, value } => {
                        PreprocessingError::UnknownCategory {
                            column: columns.get(column).copied().unwrap_or(column),
                            value,
                        }
                    }
                    other => other,
                })?;
            outputs.push(out);
        }

        Ok(Tensor2D::hcat(&outputs))
    }

    fn n_features_in(&self) -> usize {
        self.n_features_in
    }

    fn n_features_out(&self) -> usize {
        self.n_features_out
    }
}

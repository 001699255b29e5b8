//! One-hot encoding for categorical features.
//!
//! Transforms categorical integer codes to one-hot (dummy) encoded vectors.

use crate::backend::{Backend, Tensor2D};
use crate::preprocessing::encoding::HandleUnknown;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use std::collections::BTreeSet;
use std::marker::PhantomData;

/// One-hot encoder for categorical features.
///
/// Each input column is treated as a categorical feature holding non-negative
/// integer codes. During fitting the encoder learns the codes present in each
/// column; each learned code becomes one output column.
///
/// # Example
/// ```
/// use porter_fare::backend::{CpuBackend, Tensor2D};
/// use porter_fare::preprocessing::{FittedTransformer, OneHotEncoder, Transformer};
///
/// let data = Tensor2D::<CpuBackend>::new(vec![0.0, 1.0, 2.0], 3, 1);
/// let fitted = OneHotEncoder::<CpuBackend>::new().fit(&data).unwrap();
///
/// let encoded = fitted.transform(&data).unwrap();
/// assert_eq!(encoded.shape(), (3, 3));
/// assert_eq!(encoded.row(1), vec![0.0, 1.0, 0.0]);
/// ```
#[derive(Clone, Debug)]
pub struct OneHotEncoder<B: Backend> {
    /// How to handle unknown categories during transform.
    handle_unknown: HandleUnknown,
    _backend: PhantomData<B>,
}

impl<B: Backend> OneHotEncoder<B> {
    /// Create a new OneHotEncoder with default settings.
    pub fn new() -> Self {
        Self {
            handle_unknown: HandleUnknown::default(),
            _backend: PhantomData,
        }
    }

    /// Set the strategy for handling unknown categories.
    pub fn with_handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.handle_unknown = strategy;
        self
    }
}

impl<B: Backend> Default for OneHotEncoder<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fitted OneHotEncoder ready for inference.
#[derive(Clone, Debug)]
pub struct FittedOneHotEncoder<B: Backend> {
    /// Categories (unique sorted codes) for each input column.
    categories_: Vec<Vec<u32>>,
    /// Total number of output features.
    n_features_out: usize,
    handle_unknown: HandleUnknown,
    _backend: PhantomData<B>,
}

impl<B: Backend> FittedOneHotEncoder<B> {
    /// Get the categories learned for each feature.
    pub fn categories(&self) -> &[Vec<u32>] {
        &self.categories_
    }

    /// Get the number of categories per input feature.
    pub fn n_values(&self) -> Vec<usize> {
        self.categories_.iter().map(Vec::len).collect()
    }

    pub fn handle_unknown(&self) -> HandleUnknown {
        self.handle_unknown
    }
}

/// Validates a raw cell and returns it as a category code.
fn category_code(val: f32, row: usize, col: usize) -> Result<u32, PreprocessingError> {
    if !val.is_finite() || val < 0.0 || val.fract() != 0.0 {
        return Err(PreprocessingError::InvalidParameter(format!(
            "OneHotEncoder expects non-negative integer values, got {} at ({}, {})",
            val, row, col
        )));
    }
    Ok(val as u32)
}

impl<B: Backend> Transformer<B> for OneHotEncoder<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Fitted = FittedOneHotEncoder<B>;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let (rows, cols) = data.shape();

        if rows == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit OneHotEncoder on empty data".to_string(),
            ));
        }

        let mut per_column: Vec<BTreeSet<u32>> = vec![BTreeSet::new(); cols];
        for row in 0..rows {
            for (col, seen) in per_column.iter_mut().enumerate() {
                seen.insert(category_code(data.get(row, col), row, col)?);
            }
        }

        let categories_: Vec<Vec<u32>> = per_column
            .into_iter()
            .map(|set| set.into_iter().collect())
            .collect();
        let n_features_out = categories_.iter().map(Vec::len).sum();

        Ok(FittedOneHotEncoder {
            categories_,
            n_features_out,
            handle_unknown: self.handle_unknown,
            _backend: PhantomData,
        })
    }
}

impl<B: Backend> FittedTransformer<B> for FittedOneHotEncoder<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let (rows, cols) = data.shape();

        if cols != self.categories_.len() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.categories_.len(),
                got_features: cols,
            });
        }

        let mut result = vec![0.0f32; rows * self.n_features_out];

        for row in 0..rows {
            let mut offset = 0;
            for (col, cats) in self.categories_.iter().enumerate() {
                let val = data.get(row, col);
                let code = category_code(val, row, col);
                match code.ok().and_then(|c| cats.binary_search(&c).ok()) {
                    Some(idx) => result[row * self.n_features_out + offset + idx] = 1.0,
                    None => {
                        if self.handle_unknown == HandleUnknown::Error {
                            return Err(PreprocessingError::UnknownCategory {
                                column: col,
                                value: val,
                            });
                        }
                        // Ignore: the block stays all zeros.
                    }
                }
                offset += cats.len();
            }
        }

        Ok(Tensor2D::new(result, rows, self.n_features_out))
    }

    fn n_features_in(&self) -> usize {
        self.categories_.len()
    }

    fn n_features_out(&self) -> usize {
        self.n_features_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_one_hot_encoder_single_column() {
        let data = Tensor2D::<CpuBackend>::new(vec![0.0, 1.0, 2.0], 3, 1);

        let fitted = OneHotEncoder::<CpuBackend>::new().fit(&data).unwrap();

        assert_eq!(fitted.n_features_in(), 1);
        assert_eq!(fitted.n_features_out(), 3);
        assert_eq!(fitted.categories()[0], vec![0, 1, 2]);

        let vals = fitted.transform(&data).unwrap().ravel().to_vec();
        assert_eq!(vals, vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_one_hot_encoder_missing_category() {
        // Category 1 never appears, so it gets no output column.
        let data = Tensor2D::<CpuBackend>::new(vec![0.0, 2.0], 2, 1);

        let fitted = OneHotEncoder::<CpuBackend>::new().fit(&data).unwrap();

        assert_eq!(fitted.n_features_out(), 2);
        assert_eq!(fitted.categories()[0], vec![0, 2]);
        let vals = fitted.transform(&data).unwrap().ravel().to_vec();
        assert_eq!(vals, vec![1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_one_hot_encoder_multiple_columns() {
        let data = Tensor2D::<CpuBackend>::new(vec![0.0, 1.0, 1.0, 0.0], 2, 2);

        let fitted = OneHotEncoder::<CpuBackend>::new().fit(&data).unwrap();
        assert_eq!(fitted.n_features_out(), 4);
        assert_eq!(fitted.n_values(), vec![2, 2]);

        let out = fitted.transform(&data).unwrap();
        assert_eq!(out.row(0), vec![1.0, 0.0, 0.0, 1.0]);
        assert_eq!(out.row(1), vec![0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_one_hot_encoder_unknown_error() {
        let train = Tensor2D::<CpuBackend>::new(vec![0.0, 1.0], 2, 1);
        let test = Tensor2D::<CpuBackend>::new(vec![2.0], 1, 1);

        let fitted = OneHotEncoder::<CpuBackend>::new().fit(&train).unwrap();

        assert!(matches!(
            fitted.transform(&test),
            Err(PreprocessingError::UnknownCategory { column: 0, value }) if value == 2.0
        ));
    }

    #[test]
    fn test_one_hot_encoder_unknown_ignore() {
        let train = Tensor2D::<CpuBackend>::new(vec![0.0, 1.0], 2, 1);
        let test = Tensor2D::<CpuBackend>::new(vec![2.0], 1, 1);

        let fitted = OneHotEncoder::<CpuBackend>::new()
            .with_handle_unknown(HandleUnknown::Ignore)
            .fit(&train)
            .unwrap();

        let vals = fitted.transform(&test).unwrap().ravel().to_vec();
        assert_eq!(vals, vec![0.0, 0.0]);
    }

    #[test]
    fn test_one_hot_encoder_empty_data() {
        let data = Tensor2D::<CpuBackend>::zeros(0, 2);
        let result = OneHotEncoder::<CpuBackend>::new().fit(&data);
        assert!(matches!(result, Err(PreprocessingError::EmptyData(_))));
    }

    #[test]
    fn test_one_hot_encoder_feature_mismatch() {
        let train = Tensor2D::<CpuBackend>::new(vec![0.0, 1.0, 2.0, 3.0], 2, 2);
        let test = Tensor2D::<CpuBackend>::new(vec![0.0, 1.0, 2.0], 1, 3);

        let fitted = OneHotEncoder::<CpuBackend>::new().fit(&train).unwrap();

        assert!(matches!(
            fitted.transform(&test),
            Err(PreprocessingError::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn test_one_hot_encoder_invalid_value() {
        let negative = Tensor2D::<CpuBackend>::new(vec![-1.0, 0.0, 1.0], 3, 1);
        assert!(OneHotEncoder::<CpuBackend>::new().fit(&negative).is_err());

        let fractional = Tensor2D::<CpuBackend>::new(vec![0.5, 1.0, 2.0], 3, 1);
        assert!(OneHotEncoder::<CpuBackend>::new().fit(&fractional).is_err());
    }

    #[test]
    fn test_one_hot_encoder_empty_transform() {
        let data = Tensor2D::<CpuBackend>::new(vec![0.0, 1.0], 2, 1);
        let fitted = OneHotEncoder::<CpuBackend>::new().fit(&data).unwrap();

        let empty = Tensor2D::<CpuBackend>::zeros(0, 1);
        assert_eq!(fitted.transform(&empty).unwrap().shape(), (0, 2));
    }

    #[test]
    fn test_one_hot_encoder_fit_transform() {
        let data = Tensor2D::<CpuBackend>::new(vec![0.0, 1.0, 2.0], 3, 1);
        let transformed = OneHotEncoder::<CpuBackend>::new()
            .fit_transform(&data)
            .unwrap();

        assert_eq!(transformed.shape(), (3, 3));
        assert_eq!(transformed.get(2, 2), 1.0);
    }
}

use super::tensor1d::Tensor1D;
use crate::backend::Backend;
use std::fmt;
use std::marker::PhantomData;

/// Backend-typed 2D tensor in row-major layout.
#[derive(Clone)]
pub struct Tensor2D<B: Backend> {
    pub(crate) data: B::Tensor2D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> fmt::Debug for Tensor2D<B>
where
    B::Tensor2D: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tensor2D").field(&self.data).finish()
    }
}

impl<B: Backend> Tensor2D<B> {
    /// Creates a tensor from row-major data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    pub fn new(data: Vec<f32>, rows: usize, cols: usize) -> Self {
        Self {
            data: B::from_vec_2d(data, rows, cols),
            backend: PhantomData,
        }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: B::zeros_2d(rows, cols),
            backend: PhantomData,
        }
    }

    /// Builds a tensor from equally sized rows.
    ///
    /// Returns `None` if the rows have different lengths.
    pub fn from_rows(rows: &[Vec<f32>]) -> Option<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        let flat: Vec<f32> = rows.iter().flatten().copied().collect();
        Some(Self::new(flat, rows.len(), cols))
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        B::shape_2d(&self.data)
    }

    pub fn get(&self, i: usize, j: usize) -> f32 {
        B::get_2d(&self.data, i, j)
    }

    pub fn row(&self, i: usize) -> Vec<f32> {
        B::row_2d(&self.data, i)
    }

    /// Flattens the tensor to 1D in row-major order.
    pub fn ravel(&self) -> Tensor1D<B> {
        Tensor1D::new(B::ravel_2d(&self.data))
    }

    /// Keeps only the given columns, in the given order.
    pub fn select_columns(&self, columns: &[usize]) -> Self {
        Self {
            data: B::select_columns_2d(&self.data, columns),
            backend: PhantomData,
        }
    }

    /// Concatenates tensors with equal row counts side by side.
    pub fn hcat(parts: &[Self]) -> Self {
        let inner: Vec<&B::Tensor2D> = parts.iter().map(|p| &p.data).collect();
        Self {
            data: B::hcat_2d(&inner),
            backend: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_from_rows() {
        let t = Tensor2D::<CpuBackend>::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(t.shape(), (2, 2));
        assert_eq!(t.get(1, 0), 3.0);
    }

    #[test]
    fn test_from_ragged_rows_is_none() {
        assert!(Tensor2D::<CpuBackend>::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_none());
    }

    #[test]
    fn test_debug_shows_storage() {
        let t = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0], 1, 2);
        let shown = format!("{:?}", t);
        assert!(shown.starts_with("Tensor2D("), "{}", shown);
        assert!(shown.contains("rows: 1"), "{}", shown);
    }

    #[test]
    fn test_hcat_and_select_roundtrip_shape() {
        let a = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        let b = Tensor2D::<CpuBackend>::new(vec![5.0, 6.0], 2, 1);
        let c = Tensor2D::hcat(&[a, b]);
        assert_eq!(c.shape(), (2, 3));
        assert_eq!(c.select_columns(&[2]).ravel().to_vec(), vec![5.0, 6.0]);
    }
}

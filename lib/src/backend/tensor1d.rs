use crate::backend::Backend;
use std::fmt;
use std::marker::PhantomData;

/// Backend-typed 1D tensor.
///
/// Wraps a backend's native 1D representation (`B::Tensor1D`) and carries the
/// backend as a phantom type, so tensors of different backends cannot be
/// mixed by accident.
///
/// # Example
/// ```
/// use porter_fare::backend::{CpuBackend, Tensor1D};
///
/// let t: Tensor1D<CpuBackend> = Tensor1D::new(vec![1.0, 2.5, 3.75]);
/// assert_eq!(t.len(), 3);
/// assert_eq!(t.to_vec(), vec![1.0, 2.5, 3.75]);
/// ```
#[derive(Clone)]
pub struct Tensor1D<B: Backend> {
    pub(crate) data: B::Tensor1D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> fmt::Debug for Tensor1D<B>
where
    B::Tensor1D: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tensor1D").field(&self.data).finish()
    }
}

impl<B: Backend> Tensor1D<B> {
    /// Creates a new 1D tensor from `f32` values.
    pub fn new(data: Vec<f32>) -> Self {
        Self {
            data: B::from_vec_1d(data),
            backend: PhantomData,
        }
    }

    /// Creates a 1D tensor filled with zeros.
    pub fn zeros(len: usize) -> Self {
        Self {
            data: B::zeros_1d(len),
            backend: PhantomData,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        B::len_1d(&self.data)
    }

    /// Whether the tensor has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the values to host memory.
    pub fn to_vec(&self) -> Vec<f32> {
        B::to_vec_1d(&self.data)
    }
}

//! # Backend Abstraction
//!
//! Trait-based abstraction over tensor storage, so that the preprocessing and
//! model code can be written once against `Tensor1D<B>` / `Tensor2D<B>` and
//! stay agnostic of how the numbers are laid out.
//!
//! ## Design Philosophy
//!
//! - **Minimal trait surface**: only the operations the encoders, the column
//!   transformer and the tree models actually need are exposed.
//! - **Zero-cost generics**: backend selection happens at compile time via type
//!   parameters, there is no runtime dispatch.
//! - **Type-safe tensor handling**: tensors carry their backend as a phantom
//!   type, so tensors of different backends cannot be mixed.
//!
//! ## Example
//!
//! ```rust
//! use porter_fare::backend::{CpuBackend, Tensor2D};
//!
//! let x: Tensor2D<CpuBackend> = Tensor2D::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
//! assert_eq!(x.shape(), (2, 2));
//! assert_eq!(x.row(1), vec![3.0, 4.0]);
//! ```

/// Pure-Rust CPU backend.
pub mod cpu;
/// One-dimensional tensor abstraction.
pub mod tensor1d;
/// Two-dimensional tensor abstraction.
pub mod tensor2d;

pub use cpu::{CpuBackend, CpuTensor2D};
pub use tensor1d::Tensor1D;
pub use tensor2d::Tensor2D;

/// Abstraction over tensor storage and the primitive operations on it.
///
/// All 2D tensors are addressed in row-major order: element `(i, j)` is row
/// `i`, column `j`.
///
/// # Safety Guarantees
///
/// - Constructors validate that the data length matches the requested shape
///   and panic on mismatch.
/// - Tensor types are `Clone + Send + Sync`, so fitted models built on top of
///   them can be shared between threads.
pub trait Backend: Clone + Copy + Send + Sync + 'static {
    /// One-dimensional tensor type.
    type Tensor1D: Clone + Send + Sync;

    /// Two-dimensional tensor type.
    type Tensor2D: Clone + Send + Sync;

    // --- Constructors ---

    /// Creates a 1D tensor filled with zeros of given length.
    fn zeros_1d(len: usize) -> Self::Tensor1D;

    /// Creates a 2D tensor filled with zeros of given dimensions.
    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D;

    /// Constructs a 1D tensor from owned data.
    fn from_vec_1d(data: Vec<f32>) -> Self::Tensor1D;

    /// Constructs a 2D tensor from row-major ordered data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    fn from_vec_2d(data: Vec<f32>, rows: usize, cols: usize) -> Self::Tensor2D;

    // --- Shape and element access ---

    /// Number of elements of a 1D tensor.
    fn len_1d(t: &Self::Tensor1D) -> usize;

    /// `(rows, cols)` of a 2D tensor.
    fn shape_2d(t: &Self::Tensor2D) -> (usize, usize);

    /// Reads element `(i, j)`.
    ///
    /// # Panics
    /// If the index is out of bounds.
    fn get_2d(t: &Self::Tensor2D, i: usize, j: usize) -> f32;

    /// Copies a 1D tensor to host memory.
    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f32>;

    /// Copies a 2D tensor to host memory in row-major order.
    fn ravel_2d(t: &Self::Tensor2D) -> Vec<f32>;

    /// Copies row `i` of a 2D tensor to host memory.
    ///
    /// # Panics
    /// If `i` is out of bounds.
    fn row_2d(t: &Self::Tensor2D, i: usize) -> Vec<f32>;

    // --- Structural operations ---

    /// Builds a new tensor holding only the given columns, in the given order.
    ///
    /// # Panics
    /// If a column index is out of bounds.
    fn select_columns_2d(t: &Self::Tensor2D, columns: &[usize]) -> Self::Tensor2D;

    /// Concatenates tensors with the same number of rows side by side.
    ///
    /// # Panics
    /// If the row counts differ.
    fn hcat_2d(parts: &[&Self::Tensor2D]) -> Self::Tensor2D;
}

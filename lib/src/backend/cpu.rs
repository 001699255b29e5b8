use super::Backend;

/// Pure-Rust CPU backend storing tensors in contiguous `Vec<f32>` buffers.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuBackend;

/// Row-major 2D storage used by [`CpuBackend`].
#[derive(Clone, Debug, PartialEq)]
pub struct CpuTensor2D {
    pub(crate) data: Vec<f32>,
    pub(crate) rows: usize,
    pub(crate) cols: usize,
}

impl Backend for CpuBackend {
    type Tensor1D = Vec<f32>;
    type Tensor2D = CpuTensor2D;

    // === Allocation ===
    fn zeros_1d(len: usize) -> Self::Tensor1D {
        vec![0.0; len]
    }

    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    fn from_vec_1d(data: Vec<f32>) -> Self::Tensor1D {
        data
    }

    fn from_vec_2d(data: Vec<f32>, rows: usize, cols: usize) -> Self::Tensor2D {
        assert_eq!(
            data.len(),
            rows * cols,
            "from_vec_2d: data length {} does not match shape ({}, {})",
            data.len(),
            rows,
            cols
        );
        CpuTensor2D { data, rows, cols }
    }

    // === Shape queries ===
    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }

    fn shape_2d(t: &Self::Tensor2D) -> (usize, usize) {
        (t.rows, t.cols)
    }

    // === Element access ===
    fn get_2d(t: &Self::Tensor2D, i: usize, j: usize) -> f32 {
        assert!(i < t.rows && j < t.cols, "get_2d: index out of bounds");
        t.data[i * t.cols + j]
    }

    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f32> {
        t.clone()
    }

    fn ravel_2d(t: &Self::Tensor2D) -> Vec<f32> {
        t.data.clone()
    }

    fn row_2d(t: &Self::Tensor2D, i: usize) -> Vec<f32> {
        assert!(i < t.rows, "row_2d: row {} out of bounds ({})", i, t.rows);
        t.data[i * t.cols..(i + 1) * t.cols].to_vec()
    }

    // === Structural ops ===
    fn select_columns_2d(t: &Self::Tensor2D, columns: &[usize]) -> Self::Tensor2D {
        for &c in columns {
            assert!(c < t.cols, "select_columns_2d: column {} out of bounds", c);
        }
        let mut data = Vec::with_capacity(t.rows * columns.len());
        for row in t.data.chunks(t.cols.max(1)).take(t.rows) {
            data.extend(columns.iter().map(|&c| row[c]));
        }
        CpuTensor2D {
            data,
            rows: t.rows,
            cols: columns.len(),
        }
    }

    fn hcat_2d(parts: &[&Self::Tensor2D]) -> Self::Tensor2D {
        let rows = parts.first().map(|p| p.rows).unwrap_or(0);
        assert!(
            parts.iter().all(|p| p.rows == rows),
            "hcat_2d: all parts must have the same number of rows"
        );
        let cols: usize = parts.iter().map(|p| p.cols).sum();
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for part in parts {
                data.extend_from_slice(&part.data[i * part.cols..(i + 1) * part.cols]);
            }
        }
        CpuTensor2D { data, rows, cols }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_columns_reorders() {
        let t = CpuBackend::from_vec_2d(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        let s = CpuBackend::select_columns_2d(&t, &[2, 0]);
        assert_eq!(CpuBackend::shape_2d(&s), (2, 2));
        assert_eq!(CpuBackend::ravel_2d(&s), vec![3.0, 1.0, 6.0, 4.0]);
    }

    #[test]
    fn test_select_no_columns_keeps_rows() {
        let t = CpuBackend::from_vec_2d(vec![1.0, 2.0], 2, 1);
        let s = CpuBackend::select_columns_2d(&t, &[]);
        assert_eq!(CpuBackend::shape_2d(&s), (2, 0));
    }

    #[test]
    fn test_hcat() {
        let a = CpuBackend::from_vec_2d(vec![1.0, 2.0], 2, 1);
        let b = CpuBackend::from_vec_2d(vec![3.0, 4.0, 5.0, 6.0], 2, 2);
        let c = CpuBackend::hcat_2d(&[&a, &b]);
        assert_eq!(CpuBackend::shape_2d(&c), (2, 3));
        assert_eq!(CpuBackend::ravel_2d(&c), vec![1.0, 3.0, 4.0, 2.0, 5.0, 6.0]);
    }

    #[test]
    #[should_panic]
    fn test_from_vec_2d_shape_mismatch_panics() {
        let _ = CpuBackend::from_vec_2d(vec![1.0, 2.0, 3.0], 2, 2);
    }

    #[test]
    fn test_row_and_get() {
        let t = CpuBackend::from_vec_2d(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        assert_eq!(CpuBackend::row_2d(&t, 1), vec![3.0, 4.0]);
        assert_eq!(CpuBackend::get_2d(&t, 0, 1), 2.0);
    }
}

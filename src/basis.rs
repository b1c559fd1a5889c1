//! This module defines the read-only view of the basis that vectors are
//! reorthogonalized against.
//!
//! The Gram-Schmidt passes never need the basis as a whole. They only need
//! column-level operations: inner products of columns with the target vector,
//! and subtraction of a combination of columns from it. The [`ColumnBasis`]
//! trait captures that contract, so the storage of the basis stays with the
//! caller (an iterative solver typically owns a large preallocated
//! `n x kmax` matrix and fills it column by column).
//!
//! The batched operations have per-column default implementations. The dense
//! implementation routes contiguous selections through a single faer matrix
//! product instead.
//!
//! Target vectors follow the same convention as the rest of the crate: an
//! `n x 1` faer matrix.

use faer::{
    Accum, Mat, MatMut, MatRef, Par,
    linalg::matmul::matmul,
    prelude::{Reborrow, ReborrowMut, Scale},
};
use std::ops::Range;

/// A collection of `ncols` columns of common length `nrows`.
///
/// # Example
///
/// ```
/// use faer::mat;
/// use reorth::basis::ColumnBasis;
///
/// let q = mat![[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]];
/// let mut v = mat![[3.0], [4.0], [5.0]];
///
/// let coeff = q.as_ref().dot_col(1, v.as_ref());
/// q.as_ref().sub_scaled_col(1, coeff, v.as_mut());
/// assert_eq!(v, mat![[3.0], [0.0], [5.0]]);
/// ```
pub trait ColumnBasis {
    /// Returns the length of each column.
    fn nrows(&self) -> usize;

    /// Returns the number of columns.
    fn ncols(&self) -> usize;

    /// Returns the inner product of column `j` with the `nrows x 1` vector `v`.
    ///
    /// # Panics
    ///
    /// Implementations may panic if `j` is out of bounds or `v` has the wrong length.
    fn dot_col(&self, j: usize, v: MatRef<'_, f64>) -> f64;

    /// Performs `v -= coeff * column_j` in place.
    ///
    /// # Panics
    ///
    /// Implementations may panic if `j` is out of bounds or `v` has the wrong length.
    fn sub_scaled_col(&self, j: usize, coeff: f64, v: MatMut<'_, f64>);

    /// Writes the inner product of column `index[p]` with `v` into `out[p]`.
    ///
    /// `out` must hold at least `index.len()` entries.
    fn dot_cols(&self, index: &[usize], v: MatRef<'_, f64>, out: &mut [f64]) {
        for (coeff, &j) in out.iter_mut().zip(index) {
            *coeff = self.dot_col(j, v);
        }
    }

    /// Performs `v -= sum_p coeffs[p] * column_{index[p]}` in place.
    fn sub_combination(&self, index: &[usize], coeffs: &[f64], mut v: MatMut<'_, f64>) {
        for (&coeff, &j) in coeffs.iter().zip(index) {
            self.sub_scaled_col(j, coeff, v.rb_mut());
        }
    }
}

/// Returns `start..start + k` if `index` lists consecutive columns.
fn contiguous_range(index: &[usize]) -> Option<Range<usize>> {
    let (&start, _) = index.split_first()?;
    index
        .iter()
        .enumerate()
        .all(|(p, &j)| j == start + p)
        .then(|| start..start + index.len())
}

/// The primary implementation: a borrowed dense column-major matrix.
impl<'a> ColumnBasis for MatRef<'a, f64> {
    #[inline]
    fn nrows(&self) -> usize {
        MatRef::nrows(self)
    }

    #[inline]
    fn ncols(&self) -> usize {
        MatRef::ncols(self)
    }

    #[inline]
    fn dot_col(&self, j: usize, v: MatRef<'_, f64>) -> f64 {
        self.col(j).transpose() * v.col(0)
    }

    #[inline]
    fn sub_scaled_col(&self, j: usize, coeff: f64, mut v: MatMut<'_, f64>) {
        let mut dst = v.col_mut(0);
        dst -= self.col(j) * Scale(coeff);
    }

    fn dot_cols(&self, index: &[usize], v: MatRef<'_, f64>, out: &mut [f64]) {
        match contiguous_range(index) {
            Some(range) => {
                // All coefficients at once: Q[:, range]^T * v.
                let dots = self.get(.., range).transpose() * v;
                for (p, coeff) in out[..index.len()].iter_mut().enumerate() {
                    *coeff = dots[(p, 0)];
                }
            }
            None => {
                for (coeff, &j) in out.iter_mut().zip(index) {
                    *coeff = self.dot_col(j, v);
                }
            }
        }
    }

    fn sub_combination(&self, index: &[usize], coeffs: &[f64], mut v: MatMut<'_, f64>) {
        match contiguous_range(index) {
            Some(range) => {
                let weights = Mat::from_fn(index.len(), 1, |p, _| coeffs[p]);
                // v = v - Q[:, range] * weights, accumulated in place.
                matmul(
                    v,
                    Accum::Add,
                    self.get(.., range),
                    weights.as_ref(),
                    -1.0,
                    Par::Seq,
                );
            }
            None => {
                for (&coeff, &j) in coeffs.iter().zip(index) {
                    self.sub_scaled_col(j, coeff, v.rb_mut());
                }
            }
        }
    }
}

/// Delegates to the `MatRef` implementation via a reborrow.
impl<'a> ColumnBasis for MatMut<'a, f64> {
    #[inline]
    fn nrows(&self) -> usize {
        self.rb().nrows()
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.rb().ncols()
    }

    #[inline]
    fn dot_col(&self, j: usize, v: MatRef<'_, f64>) -> f64 {
        self.rb().dot_col(j, v)
    }

    #[inline]
    fn sub_scaled_col(&self, j: usize, coeff: f64, v: MatMut<'_, f64>) {
        self.rb().sub_scaled_col(j, coeff, v)
    }

    fn dot_cols(&self, index: &[usize], v: MatRef<'_, f64>, out: &mut [f64]) {
        self.rb().dot_cols(index, v, out)
    }

    fn sub_combination(&self, index: &[usize], coeffs: &[f64], v: MatMut<'_, f64>) {
        self.rb().sub_combination(index, coeffs, v)
    }
}

/// Delegates to the `MatRef` implementation via a view.
impl ColumnBasis for Mat<f64> {
    #[inline]
    fn nrows(&self) -> usize {
        self.as_ref().nrows()
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.as_ref().ncols()
    }

    #[inline]
    fn dot_col(&self, j: usize, v: MatRef<'_, f64>) -> f64 {
        self.as_ref().dot_col(j, v)
    }

    #[inline]
    fn sub_scaled_col(&self, j: usize, coeff: f64, v: MatMut<'_, f64>) {
        self.as_ref().sub_scaled_col(j, coeff, v)
    }

    fn dot_cols(&self, index: &[usize], v: MatRef<'_, f64>, out: &mut [f64]) {
        self.as_ref().dot_cols(index, v, out)
    }

    fn sub_combination(&self, index: &[usize], coeffs: &[f64], v: MatMut<'_, f64>) {
        self.as_ref().sub_combination(index, coeffs, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::mat;

    #[test]
    fn test_dot_col_for_mat() {
        let q: Mat<f64> = mat![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let v: Mat<f64> = mat![[1.0], [1.0], [2.0]];

        let basis: &dyn ColumnBasis = &q;
        assert_eq!(basis.nrows(), 3);
        assert_eq!(basis.ncols(), 2);
        assert_eq!(basis.dot_col(0, v.as_ref()), 14.0);
        assert_eq!(basis.dot_col(1, v.as_ref()), 18.0);
    }

    #[test]
    fn test_sub_scaled_col_for_views() {
        let mut q: Mat<f64> = mat![[1.0, 0.5], [0.0, 0.5]];
        let expected: Mat<f64> = mat![[2.0], [-1.0]];

        let mut v: Mat<f64> = mat![[3.0], [0.0]];
        let basis_ref: &dyn ColumnBasis = &q.as_ref();
        basis_ref.sub_scaled_col(1, 2.0, v.as_mut());
        basis_ref.sub_scaled_col(0, 0.0, v.as_mut());
        assert_eq!(v, expected);

        let mut w: Mat<f64> = mat![[3.0], [0.0]];
        let basis_mut: &dyn ColumnBasis = &q.as_mut();
        basis_mut.sub_scaled_col(1, 2.0, w.as_mut());
        assert_eq!(w, expected);
    }

    #[test]
    fn test_contiguous_range_detection() {
        assert_eq!(contiguous_range(&[2, 3, 4]), Some(2..5));
        assert_eq!(contiguous_range(&[1]), Some(1..2));
        assert_eq!(contiguous_range(&[0, 2]), None);
        assert_eq!(contiguous_range(&[1, 0]), None);
        assert_eq!(contiguous_range(&[]), None);
    }

    /// Uses only the per-column methods, so the batched defaults are exercised.
    struct Columns(Mat<f64>);

    impl ColumnBasis for Columns {
        fn nrows(&self) -> usize {
            self.0.nrows()
        }

        fn ncols(&self) -> usize {
            self.0.ncols()
        }

        fn dot_col(&self, j: usize, v: MatRef<'_, f64>) -> f64 {
            self.0.dot_col(j, v)
        }

        fn sub_scaled_col(&self, j: usize, coeff: f64, v: MatMut<'_, f64>) {
            self.0.sub_scaled_col(j, coeff, v)
        }
    }

    #[test]
    fn test_batched_ops_match_default_implementations() {
        let q: Mat<f64> = mat![
            [1.0, 2.0, 0.0],
            [0.0, 1.0, 1.0],
            [2.0, 0.0, 1.0],
        ];
        let fallback = Columns(q.clone());
        let v: Mat<f64> = mat![[1.0], [2.0], [3.0]];

        for index in [&[0, 1, 2][..], &[1, 2], &[2, 0]] {
            let mut dense = vec![0.0; 3];
            let mut default = vec![0.0; 3];
            q.dot_cols(index, v.as_ref(), &mut dense);
            fallback.dot_cols(index, v.as_ref(), &mut default);
            assert_eq!(dense, default);

            let mut w_dense = v.clone();
            let mut w_default = v.clone();
            q.sub_combination(index, &dense, w_dense.as_mut());
            fallback.sub_combination(index, &default, w_default.as_mut());
            assert_eq!(w_dense, w_default);
        }

        // Contiguous block: [7, 4, 5] are the dots of columns 0..3 with v.
        let mut coeffs = vec![0.0; 3];
        q.dot_cols(&[0, 1, 2], v.as_ref(), &mut coeffs);
        assert_eq!(coeffs, vec![7.0, 4.0, 5.0]);
    }
}

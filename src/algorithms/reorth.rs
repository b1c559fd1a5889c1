//! Iterated Gram-Schmidt reorthogonalization.
//!
//! ** NOTE: Callers that hold an "all columns" selection or 1-based indices
//! should go through [`crate::solvers::reorth`], which resolves the selection
//! before calling into this module.
//!
//! A single Gram-Schmidt pass can lose most of its orthogonality when the
//! projection cancels a large part of the vector. The driver in this module
//! detects that situation from the norms alone: if a pass shrinks the vector
//! by more than a factor `alpha`, the pass is repeated once. If the repeated
//! pass shrinks it by more than `alpha` again, the vector is taken to lie in
//! the span of the selected columns and is replaced by zero.
//!
//! References: A. Bjorck, "Numerical Methods for Least Squares Problems",
//! SIAM 1996, pp. 68-69; J. W. Daniel, W. B. Gragg, L. Kaufman and
//! G. W. Stewart, "Reorthogonalization and Stable Algorithms Updating the
//! Gram-Schmidt QR Factorization", Math. Comp. 30 (1976), pp. 772-795.

use super::{
    GramSchmidt, MAX_PASSES, ReorthError, ReorthOutcome,
    gram_schmidt::{classical_pass, modified_pass},
};
use crate::{basis::ColumnBasis, error::ReorthErrorKind};
use faer::{
    MatMut, MatRef,
    prelude::{Reborrow, ReborrowMut},
};

/// Reorthogonalizes `v` against the columns of `basis` listed in `index`.
///
/// `v` is updated in place. `norm_estimate` is trusted as the current norm of
/// `v` and is used as the reference for the first acceptance test.
///
/// # Arguments
/// * `basis`: The columns to orthogonalize against. Only read.
/// * `index`: Explicit, non-empty list of 0-based column positions. Order and
///   duplicates are kept as given.
/// * `v`: The `n x 1` target vector.
/// * `norm_estimate`: Current Euclidean norm of `v`.
/// * `alpha`: Acceptance threshold, normally in `(0, 1]`; see [`super::DEFAULT_ALPHA`].
///   Values outside that range are used as given.
/// * `method`: Gram-Schmidt variant applied in every pass.
///
/// # Returns
/// The new norm and the number of passes performed. A norm of exactly zero
/// means `v` was found to lie numerically in the span of the selected columns
/// and has been zeroed.
///
/// # Errors
/// Shape and index errors are reported before `v` is modified.
///
/// # Example
///
/// ```
/// use faer::mat;
/// use reorth::algorithms::{GramSchmidt, reorth::reorthogonalize};
///
/// let q = mat![[1.0], [0.0], [0.0]];
/// let mut v = mat![[1.0], [1.0], [0.0]];
///
/// let outcome = reorthogonalize(&q, &[0], v.as_mut(), 2f64.sqrt(), 0.5, GramSchmidt::Modified)
///     .unwrap();
///
/// assert_eq!(v, mat![[0.0], [1.0], [0.0]]);
/// assert!((outcome.norm - 1.0).abs() < 1e-15);
/// assert_eq!(outcome.passes, 1);
/// ```
pub fn reorthogonalize<B>(
    basis: &B,
    index: &[usize],
    v: MatMut<'_, f64>,
    norm_estimate: f64,
    alpha: f64,
    method: GramSchmidt,
) -> Result<ReorthOutcome, ReorthError>
where
    B: ColumnBasis + ?Sized,
{
    // Only the classical variant needs a coefficient buffer.
    let mut work = match method {
        GramSchmidt::Modified => Vec::new(),
        GramSchmidt::Classical => vec![0.0; index.len()],
    };
    reorthogonalize_with_work(basis, index, v, norm_estimate, alpha, method, &mut work)
}

/// Same as [`reorthogonalize`], with a caller-provided coefficient buffer.
///
/// For [`GramSchmidt::Classical`], `work` must hold at least `index.len()`
/// entries; its contents on return are the coefficients of the last pass. It
/// is not touched by [`GramSchmidt::Modified`].
pub fn reorthogonalize_with_work<B>(
    basis: &B,
    index: &[usize],
    mut v: MatMut<'_, f64>,
    norm_estimate: f64,
    alpha: f64,
    method: GramSchmidt,
    work: &mut [f64],
) -> Result<ReorthOutcome, ReorthError>
where
    B: ColumnBasis + ?Sized,
{
    validate(basis, index, v.rb(), method, work.len())?;

    // NaN fails the range check as well.
    if !(0.0 < alpha && alpha <= 1.0) {
        log::warn!("alpha = {alpha} lies outside (0, 1]; using it as given.");
    }

    let mut reference = norm_estimate;
    for passes in 1..=MAX_PASSES {
        match method {
            GramSchmidt::Modified => modified_pass(basis, index, v.rb_mut()),
            GramSchmidt::Classical => classical_pass(basis, index, v.rb_mut(), work),
        }
        let norm = v.rb().norm_l2();
        log::trace!(
            "{method:?} pass {passes}/{MAX_PASSES} over {} columns: norm {reference:e} -> {norm:e}",
            index.len()
        );

        if norm >= alpha * reference {
            return Ok(ReorthOutcome { norm, passes });
        }
        reference = norm;
    }

    // The norm kept collapsing: `v` is numerically in span(basis[:, index]).
    log::debug!(
        "Vector declared rank deficient after {MAX_PASSES} passes (residual norm {reference:e})."
    );
    v.fill(0.0);
    Ok(ReorthOutcome {
        norm: 0.0,
        passes: MAX_PASSES,
    })
}

/// Checks every argument that could make a pass index out of bounds.
fn validate<B>(
    basis: &B,
    index: &[usize],
    v: MatRef<'_, f64>,
    method: GramSchmidt,
    work_len: usize,
) -> Result<(), ReorthError>
where
    B: ColumnBasis + ?Sized,
{
    if v.ncols() != 1 {
        return Err(ReorthErrorKind::NotAColumnVector { ncols: v.ncols() }.into());
    }
    if v.nrows() != basis.nrows() {
        return Err(ReorthErrorKind::DimensionMismatch {
            basis_rows: basis.nrows(),
            vector_rows: v.nrows(),
        }
        .into());
    }
    if index.is_empty() {
        return Err(ReorthErrorKind::InputError(
            "The index list must not be empty; resolve an 'all columns' selection first."
                .to_string(),
        )
        .into());
    }

    let ncols = basis.ncols();
    if let Some((position, &j)) = index.iter().enumerate().find(|&(_, &j)| j >= ncols) {
        return Err(ReorthErrorKind::IndexOutOfBounds {
            position,
            index: j,
            ncols,
        }
        .into());
    }

    if method == GramSchmidt::Classical && work_len < index.len() {
        return Err(ReorthErrorKind::InputError(format!(
            "Workspace holds {work_len} entries but {} columns are selected.",
            index.len()
        ))
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{algorithms::DEFAULT_ALPHA, error::ErrorKind};
    use faer::{Mat, mat};

    const METHODS: [GramSchmidt; 2] = [GramSchmidt::Modified, GramSchmidt::Classical];

    #[test]
    fn test_single_pass_removes_component() {
        for method in METHODS {
            let q: Mat<f64> = mat![[1.0], [0.0], [0.0]];
            let mut v: Mat<f64> = mat![[1.0], [1.0], [0.0]];

            let outcome =
                reorthogonalize(&q, &[0], v.as_mut(), 2f64.sqrt(), DEFAULT_ALPHA, method).unwrap();

            assert_eq!(v, mat![[0.0], [1.0], [0.0]]);
            assert!((outcome.norm - 1.0).abs() < 1e-15);
            assert_eq!(outcome.passes, 1);
            assert!(!outcome.is_rank_deficient());
        }
    }

    #[test]
    fn test_parallel_vector_is_zeroed_after_two_passes() {
        for method in METHODS {
            let q: Mat<f64> = mat![[1.0], [0.0]];
            let mut v: Mat<f64> = mat![[1.0], [0.0]];

            let outcome = reorthogonalize(&q, &[0], v.as_mut(), 1.0, DEFAULT_ALPHA, method).unwrap();

            assert_eq!(v, Mat::<f64>::zeros(2, 1));
            assert_eq!(outcome, ReorthOutcome { norm: 0.0, passes: 2 });
            assert!(outcome.is_rank_deficient());
        }
    }

    #[test]
    fn test_second_pass_accepted() {
        // The first pass removes most of the vector (ratio 0.1 < alpha), the
        // second finds nothing left to remove and keeps the norm.
        for method in METHODS {
            let q: Mat<f64> = mat![[1.0], [0.0]];
            let mut v: Mat<f64> = mat![[10.0], [1.0]];

            let outcome = reorthogonalize(&q, &[0], v.as_mut(), 10.0, DEFAULT_ALPHA, method).unwrap();

            assert_eq!(v, mat![[0.0], [1.0]]);
            assert!((outcome.norm - 1.0).abs() < 1e-15);
            assert_eq!(outcome.passes, 2);
        }
    }

    #[test]
    fn test_alpha_outside_unit_interval_is_used_as_given() {
        // With alpha > 1 even an untouched vector fails the first test, and
        // fails the second as well: the vector is zeroed.
        let q: Mat<f64> = mat![[1.0], [0.0]];
        let mut v: Mat<f64> = mat![[0.0], [3.0]];
        let outcome =
            reorthogonalize(&q, &[0], v.as_mut(), 3.0, 2.0, GramSchmidt::Modified).unwrap();
        assert_eq!(outcome, ReorthOutcome { norm: 0.0, passes: 2 });

        // alpha = 0 accepts anything after one pass.
        let mut w: Mat<f64> = mat![[1.0], [0.0]];
        let outcome =
            reorthogonalize(&q, &[0], w.as_mut(), 1.0, 0.0, GramSchmidt::Classical).unwrap();
        assert_eq!(outcome, ReorthOutcome { norm: 0.0, passes: 1 });
    }

    #[test]
    fn test_nan_norm_estimate_defers_to_second_test() {
        // The first comparison against NaN fails; the second compares against
        // the first-pass norm and accepts.
        for method in METHODS {
            let q: Mat<f64> = mat![[1.0], [0.0]];
            let mut v: Mat<f64> = mat![[1.0], [1.0]];

            let outcome =
                reorthogonalize(&q, &[0], v.as_mut(), f64::NAN, DEFAULT_ALPHA, method).unwrap();

            assert_eq!(outcome, ReorthOutcome { norm: 1.0, passes: 2 });
            assert_eq!(v, mat![[0.0], [1.0]]);
        }
    }

    #[test]
    fn test_nan_alpha_zeroes_the_vector() {
        for method in METHODS {
            let q: Mat<f64> = mat![[1.0], [0.0]];
            let mut v: Mat<f64> = mat![[1.0], [1.0]];

            let outcome = reorthogonalize(&q, &[0], v.as_mut(), 2f64.sqrt(), f64::NAN, method).unwrap();

            assert_eq!(outcome, ReorthOutcome { norm: 0.0, passes: 2 });
            assert_eq!(v, Mat::<f64>::zeros(2, 1));
        }
    }

    #[test]
    fn test_length_mismatch_leaves_vector_untouched() {
        for method in METHODS {
            let q = Mat::<f64>::identity(4, 2);
            let mut v: Mat<f64> = mat![[1.0], [2.0], [3.0]];

            let err = reorthogonalize(&q, &[0], v.as_mut(), 1.0, DEFAULT_ALPHA, method).unwrap_err();

            assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
            assert_eq!(v, mat![[1.0], [2.0], [3.0]]);
        }
    }

    #[test]
    fn test_index_out_of_bounds_leaves_vector_untouched() {
        let q = Mat::<f64>::identity(3, 2);
        let mut v: Mat<f64> = mat![[1.0], [2.0], [3.0]];

        let err = reorthogonalize(&q, &[0, 2], v.as_mut(), 1.0, DEFAULT_ALPHA, GramSchmidt::Modified)
            .unwrap_err();

        assert_eq!(
            err,
            ReorthError::from(ReorthErrorKind::IndexOutOfBounds {
                position: 1,
                index: 2,
                ncols: 2
            })
        );
        assert_eq!(v, mat![[1.0], [2.0], [3.0]]);
    }

    #[test]
    fn test_multi_column_target_is_rejected() {
        let q = Mat::<f64>::identity(2, 2);
        let mut v = Mat::<f64>::zeros(2, 2);
        let err = reorthogonalize(&q, &[0], v.as_mut(), 0.0, DEFAULT_ALPHA, GramSchmidt::Modified)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
    }

    #[test]
    fn test_empty_index_is_rejected() {
        let q = Mat::<f64>::identity(2, 2);
        let mut v: Mat<f64> = mat![[1.0], [1.0]];
        let err = reorthogonalize(&q, &[], v.as_mut(), 2f64.sqrt(), DEFAULT_ALPHA, GramSchmidt::Modified)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(v, mat![[1.0], [1.0]]);
    }

    #[test]
    fn test_short_workspace_is_rejected_for_classical_only() {
        let q = Mat::<f64>::identity(3, 3);
        let mut work = [0.0; 1];

        let mut v: Mat<f64> = mat![[1.0], [1.0], [1.0]];
        let err = reorthogonalize_with_work(
            &q,
            &[0, 1],
            v.as_mut(),
            3f64.sqrt(),
            DEFAULT_ALPHA,
            GramSchmidt::Classical,
            &mut work,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(v, mat![[1.0], [1.0], [1.0]]);

        let outcome = reorthogonalize_with_work(
            &q,
            &[0, 1],
            v.as_mut(),
            3f64.sqrt(),
            DEFAULT_ALPHA,
            GramSchmidt::Modified,
            &mut work,
        )
        .unwrap();
        assert_eq!(v, mat![[0.0], [0.0], [1.0]]);
        assert_eq!(outcome.passes, 1);
    }

    #[test]
    fn test_classical_workspace_holds_last_coefficients() {
        let q = Mat::<f64>::identity(3, 3);
        let mut v: Mat<f64> = mat![[2.0], [3.0], [6.0]];
        let mut work = [0.0; 2];

        reorthogonalize_with_work(
            &q,
            &[1, 0],
            v.as_mut(),
            7.0,
            DEFAULT_ALPHA,
            GramSchmidt::Classical,
            &mut work,
        )
        .unwrap();

        assert_eq!(work, [3.0, 2.0]);
        assert_eq!(v, mat![[0.0], [0.0], [6.0]]);
    }
}

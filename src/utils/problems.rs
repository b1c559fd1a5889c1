//! Test problems for reorthogonalization.
//!
//! A basis is built the way a Lanczos-type solver builds one: columns arrive
//! one at a time, each is reorthogonalized against the columns accepted so far,
//! normalized, and appended. Columns found to lie in the span of the current
//! basis are dropped. The quality of the resulting basis is measured with
//! [`orthogonality_loss`].

use crate::{
    algorithms::reorth::reorthogonalize,
    error::ReorthError,
    solvers::ReorthOptions,
};
use faer::{Mat, MatRef, prelude::*};
use rand::Rng;

/// An `n x k` matrix with entries drawn uniformly from `[-1, 1)`.
pub fn random_columns(n: usize, k: usize, rng: &mut impl Rng) -> Mat<f64> {
    Mat::from_fn(n, k, |_, _| 2.0 * rng.random::<f64>() - 1.0)
}

/// An `n x k` matrix whose columns are one shared random direction plus an
/// independent random perturbation of size `eps`.
///
/// For small `eps` almost all of each new column cancels against the previous
/// ones, which is the case the second reorthogonalization pass exists for.
pub fn nearly_dependent_columns(n: usize, k: usize, eps: f64, rng: &mut impl Rng) -> Mat<f64> {
    let base = random_columns(n, 1, rng);
    let noise = random_columns(n, k, rng);
    Mat::from_fn(n, k, |i, j| base[(i, 0)] + eps * noise[(i, j)])
}

/// Result of [`orthonormalize_columns`].
#[derive(Debug, Clone)]
pub struct BasisBuild {
    /// Orthonormal columns, one per accepted input column.
    pub q: Mat<f64>,
    /// Input columns dropped because they were numerically in the span of `q`.
    pub rank_deficient: usize,
    /// Reorthogonalization calls made; the first accepted column needs none.
    pub calls: usize,
    /// Projection passes performed over all reorthogonalization calls.
    pub passes: usize,
    /// Column projections performed over all calls, `sum(passes * k)`.
    pub projections: usize,
}

/// Orthonormalizes the columns of `a` one at a time with the given options.
pub fn orthonormalize_columns(
    a: MatRef<'_, f64>,
    options: ReorthOptions,
) -> Result<BasisBuild, ReorthError> {
    let (n, k) = (a.nrows(), a.ncols());
    let mut q = Mat::<f64>::zeros(n, k);
    let mut rank = 0;
    let mut rank_deficient = 0;
    let mut calls = 0;
    let mut passes = 0;
    let mut projections = 0;

    for j in 0..k {
        let mut v = a.get(.., j..j + 1).to_owned();
        let mut norm = v.norm_l2();

        // The first accepted column has nothing to be orthogonalized against.
        if rank > 0 {
            let index: Vec<usize> = (0..rank).collect();
            let outcome = reorthogonalize(
                &q.as_ref(),
                &index,
                v.as_mut(),
                norm,
                options.alpha,
                options.method,
            )?;
            norm = outcome.norm;
            calls += 1;
            passes += outcome.passes;
            projections += outcome.passes * index.len();
        }

        if norm == 0.0 {
            rank_deficient += 1;
            continue;
        }

        let unit = &v * Scale(norm.recip());
        q.col_mut(rank).copy_from(unit.col(0));
        rank += 1;
    }

    let q = if rank == k {
        q
    } else {
        q.as_ref().get(.., 0..rank).to_owned()
    };

    Ok(BasisBuild {
        q,
        rank_deficient,
        calls,
        passes,
        projections,
    })
}

/// Loss of orthogonality `||I - Q^T Q||_F` of the columns of `q`.
pub fn orthogonality_loss(q: MatRef<'_, f64>) -> f64 {
    let identity = Mat::<f64>::identity(q.ncols(), q.ncols());
    (&identity - q.transpose() * q).norm_l2()
}

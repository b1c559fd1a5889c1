//! This module provides the high-level entry points used by iterative solvers.
//!
//! The core routine in [`crate::algorithms::reorth`] takes an explicit, 0-based
//! list of column positions. Solvers usually think in terms of "the first `j`
//! columns", "every column", or carry 1-based positions from another
//! numbering convention. [`ColumnSelection`] expresses those choices and is
//! resolved exactly once here, before the core runs.

use crate::{
    algorithms::{
        DEFAULT_ALPHA, GramSchmidt, ReorthOutcome,
        reorth::reorthogonalize,
    },
    basis::ColumnBasis,
    error::{ReorthError, ReorthErrorKind},
};
use faer::{Mat, MatMut, MatRef};

/// Which columns of the basis a vector is reorthogonalized against.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnSelection {
    /// Every column of the basis, in order.
    #[default]
    All,
    /// Explicit 0-based positions. An empty list means every column.
    Indices(Vec<usize>),
    /// Explicit 1-based positions. An empty list means every column.
    OneBased(Vec<usize>),
}

impl ColumnSelection {
    /// The first `count` columns, `0..count`.
    pub fn leading(count: usize) -> Self {
        ColumnSelection::Indices((0..count).collect())
    }

    /// Expands the selection into the explicit 0-based index list expected by
    /// the core routine.
    ///
    /// Bounds against `ncols` are checked by the core routine, except for the
    /// 1-based position `0`, which has no 0-based counterpart and is rejected here.
    pub fn resolve(&self, ncols: usize) -> Result<Vec<usize>, ReorthError> {
        match self {
            ColumnSelection::All => Ok((0..ncols).collect()),
            ColumnSelection::Indices(index) if index.is_empty() => Ok((0..ncols).collect()),
            ColumnSelection::Indices(index) => Ok(index.clone()),
            ColumnSelection::OneBased(index) if index.is_empty() => Ok((0..ncols).collect()),
            ColumnSelection::OneBased(index) => index
                .iter()
                .enumerate()
                .map(|(position, &j)| {
                    j.checked_sub(1).ok_or_else(|| {
                        ReorthError::from(ReorthErrorKind::IndexOutOfBounds {
                            position,
                            index: j,
                            ncols,
                        })
                    })
                })
                .collect(),
        }
    }
}

/// Parameters of a reorthogonalization call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReorthOptions {
    /// Norm-ratio threshold deciding whether a second pass is needed.
    pub alpha: f64,
    /// Gram-Schmidt variant.
    pub method: GramSchmidt,
}

impl Default for ReorthOptions {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            method: GramSchmidt::Modified,
        }
    }
}

impl ReorthOptions {
    /// Default options with the given method.
    pub fn with_method(method: GramSchmidt) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }
}

/// Output of [`reorth`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReorthResult {
    /// The reorthogonalized `n x 1` vector.
    pub r: Mat<f64>,
    /// Its norm; zero if the input was numerically in the span of the selection.
    pub norm: f64,
    /// Number of passes performed (1 or 2).
    pub passes: usize,
    /// Total column projections performed, `passes * k` for `k` selected columns.
    pub projections: usize,
}

/// Reorthogonalizes a copy of `r` against the selected columns of `basis`.
///
/// `r` itself is left untouched. `normr` is the caller's current norm of `r`.
///
/// # Example
///
/// ```
/// use faer::mat;
/// use reorth::solvers::{ColumnSelection, ReorthOptions, reorth};
///
/// let q = mat![[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]];
/// let r = mat![[1.0], [2.0], [2.0]];
///
/// let result = reorth(&q, r.as_ref(), 3.0, &ColumnSelection::All, ReorthOptions::default())?;
///
/// assert_eq!(result.r, mat![[0.0], [0.0], [2.0]]);
/// assert_eq!(result.passes, 1);
/// assert_eq!(result.projections, 2);
/// # Ok::<(), reorth::error::ReorthError>(())
/// ```
pub fn reorth<B>(
    basis: &B,
    r: MatRef<'_, f64>,
    normr: f64,
    selection: &ColumnSelection,
    options: ReorthOptions,
) -> Result<ReorthResult, ReorthError>
where
    B: ColumnBasis + ?Sized,
{
    let mut r_new = r.to_owned();
    let (outcome, k) = reorth_in_place(basis, r_new.as_mut(), normr, selection, options)?;

    Ok(ReorthResult {
        r: r_new,
        norm: outcome.norm,
        passes: outcome.passes,
        projections: outcome.passes * k,
    })
}

/// Resolves `selection` and reorthogonalizes `r` in place.
///
/// Returns the core outcome together with the number of selected columns.
pub fn reorth_in_place<B>(
    basis: &B,
    r: MatMut<'_, f64>,
    normr: f64,
    selection: &ColumnSelection,
    options: ReorthOptions,
) -> Result<(ReorthOutcome, usize), ReorthError>
where
    B: ColumnBasis + ?Sized,
{
    let index = selection.resolve(basis.ncols())?;
    let outcome = reorthogonalize(basis, &index, r, normr, options.alpha, options.method)?;
    Ok((outcome, index.len()))
}

//! Single Gram-Schmidt projection passes.
//!
//! A pass removes from `v` its components along the selected columns of the
//! basis. The two variants differ only in which version of `v` the
//! coefficients are measured against:
//!
//! - [`modified_pass`] measures each coefficient against the vector already
//!   updated by the previous columns of the same pass.
//! - [`classical_pass`] measures every coefficient against the vector as it
//!   was when the pass started, stores them in a scratch slice, and subtracts
//!   the weighted sum afterwards.
//!
//! For exactly orthonormal columns both give the same result. Under rounding
//! the modified variant loses less orthogonality per pass, while the classical
//! variant has no dependency between the coefficients.
//!
//! These functions do not validate their arguments; callers go through
//! [`super::reorth::reorthogonalize`] which checks shapes and indices first.

use crate::basis::ColumnBasis;
use faer::{
    MatMut,
    prelude::{Reborrow, ReborrowMut},
};

/// One modified Gram-Schmidt pass: `v -= (q_j' v) q_j` for each `j` in `index`, in order.
pub fn modified_pass<B>(basis: &B, index: &[usize], mut v: MatMut<'_, f64>)
where
    B: ColumnBasis + ?Sized,
{
    for &j in index {
        let coeff = basis.dot_col(j, v.rb());
        basis.sub_scaled_col(j, coeff, v.rb_mut());
    }
}

/// One classical Gram-Schmidt pass.
///
/// `work[p]` receives the coefficient of column `index[p]`; its first
/// `index.len()` entries are overwritten.
pub fn classical_pass<B>(basis: &B, index: &[usize], v: MatMut<'_, f64>, work: &mut [f64])
where
    B: ColumnBasis + ?Sized,
{
    let work = &mut work[..index.len()];

    // All inner products use the vector from the start of the pass.
    basis.dot_cols(index, v.rb(), work);
    basis.sub_combination(index, work, v);
}

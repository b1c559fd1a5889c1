//! Iterated Gram-Schmidt reorthogonalization for Krylov subspace solvers.
//!
//! Lanczos-type eigenvalue and SVD solvers build an orthonormal basis one
//! column at a time. In floating point the new columns slowly lose
//! orthogonality to the old ones, and the usual cure is to reorthogonalize
//! each new vector against (part of) the basis. This crate implements that one
//! kernel:
//!
//! 1. Project the vector against the selected columns with modified or
//!    classical Gram-Schmidt.
//! 2. If the norm dropped below `alpha` times its previous value, cancellation
//!    was severe: project once more.
//! 3. If the second pass also drops the norm below `alpha` times the first
//!    result, the vector is numerically in the span of the selected columns and
//!    is replaced by zero.
//!
//! At most two passes are ever performed.
//!
//! Built on the [`faer`] linear algebra framework. The basis is only read, and
//! any storage that implements [`basis::ColumnBasis`] can be used (faer's
//! `Mat`, `MatRef` and `MatMut` do). Vectors are `n x 1` matrices.
//!
//! ## Entry points
//!
//! **Core** ([`reorthogonalize`]): explicit 0-based column list, vector updated
//! in place.
//!
//! **Adapter** ([`reorth`]): accepts a [`ColumnSelection`] ("all columns",
//! 0-based or 1-based lists), works on a copy, and reports the number of
//! column projections performed.
//!
//! ## Example Usage
//!
//! Building an orthonormal basis column by column, the way a Lanczos solver
//! with full reorthogonalization does:
//!
//! ```rust
//! use faer::{Mat, mat};
//! use reorth::{GramSchmidt, reorthogonalize};
//!
//! let mut q = Mat::<f64>::zeros(3, 2);
//! q[(0, 0)] = 1.0;
//!
//! // Next candidate vector and its norm.
//! let mut v = mat![[3.0], [4.0], [0.0]];
//! let norm = v.norm_l2();
//!
//! let outcome = reorthogonalize(&q.as_ref(), &[0], v.as_mut(), norm, 0.5, GramSchmidt::Modified)
//!     .unwrap();
//!
//! // 4/5 of the norm survives the projection, so one pass is enough.
//! assert_eq!(outcome.passes, 1);
//! assert_eq!(v, mat![[0.0], [4.0], [0.0]]);
//! ```
//!
//! A zero norm in the outcome is not an error: it means the vector carried no
//! direction outside the selected columns.

// Declare the modules that form the crate's API structure.
pub mod algorithms;
pub mod basis;
pub mod error;
pub mod solvers;
pub mod utils;

// Re-export the main API for convenient access.
pub use algorithms::{
    DEFAULT_ALPHA, GramSchmidt, ReorthOutcome,
    reorth::{reorthogonalize, reorthogonalize_with_work},
};
pub use error::{ErrorKind, ReorthError};
pub use solvers::{ColumnSelection, ReorthOptions, ReorthResult, reorth};

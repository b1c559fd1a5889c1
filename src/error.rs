//! This module defines the custom error types for the library.
//!
//! Every failure that can be reported by the reorthogonalization routines is
//! collected in a single public type, [`ReorthError`]. All of them are argument
//! validation failures detected before the target vector is touched: once the
//! projection passes start, no error path remains.
//!
//! Numerical rank deficiency (the vector lies in the span of the selected
//! columns) is *not* an error. It is reported through a zero vector and a zero
//! norm in [`crate::algorithms::ReorthOutcome`].
use thiserror::Error;

/// Represents all possible errors that can occur during a reorthogonalization call.
///
#[derive(Error, Debug)]
#[error(transparent)]
pub struct ReorthError(#[from] ReorthErrorKind);

/// The two error classes a caller can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The vector and the basis disagree in shape, or an index does not address a column.
    DimensionMismatch,
    /// A parameter is malformed (unknown method code, empty selection, short workspace).
    InvalidArgument,
}

/// Private enum containing the distinct kinds of errors.
/// This separation allows for a clean `Display` implementation via [`thiserror`]
/// while keeping the variants free to change.
#[derive(Error, Debug, PartialEq)]
pub(crate) enum ReorthErrorKind {
    /// The target vector does not have as many rows as the basis columns.
    #[error(
        "Dimension mismatch: basis columns have {basis_rows} rows but vector has {vector_rows} rows."
    )]
    DimensionMismatch {
        basis_rows: usize,
        vector_rows: usize,
    },

    /// The target vector is stored in more (or fewer) than one column.
    #[error("Dimension mismatch: target vector must have exactly 1 column, got {ncols}.")]
    NotAColumnVector { ncols: usize },

    /// A selected column index lies outside the basis.
    #[error(
        "Dimension mismatch: selected index {index} (position {position}) is out of bounds for a basis with {ncols} columns."
    )]
    IndexOutOfBounds {
        position: usize,
        index: usize,
        ncols: usize,
    },

    /// A method code other than 0 (modified) or 1 (classical).
    #[error("Invalid argument: unknown Gram-Schmidt method code {0}, expected 0 or 1.")]
    InvalidMethod(i64),

    /// Indicates that an invalid input parameter was provided to a function.
    #[error("Invalid argument: {0}")]
    InputError(String),
}

impl ReorthError {
    /// Classifies the error as a dimension problem or a malformed argument.
    pub fn kind(&self) -> ErrorKind {
        match self.0 {
            ReorthErrorKind::DimensionMismatch { .. }
            | ReorthErrorKind::NotAColumnVector { .. }
            | ReorthErrorKind::IndexOutOfBounds { .. } => ErrorKind::DimensionMismatch,
            ReorthErrorKind::InvalidMethod(_) | ReorthErrorKind::InputError(_) => {
                ErrorKind::InvalidArgument
            }
        }
    }
}

// Manually implement PartialEq for the public error type.
// We compare the inner `ReorthErrorKind`.
impl PartialEq for ReorthError {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

//! Core reorthogonalization kernels.
//!
//! - [`gram_schmidt`]: one projection pass of modified or classical Gram-Schmidt.
//! - [`reorth`]: the iterated driver with the alpha-ratio acceptance test.
//!
//! The types shared by both live here.

pub mod gram_schmidt;
pub mod reorth;

pub use crate::error::ReorthError;
use crate::error::ReorthErrorKind;

/// Default threshold for the norm-ratio acceptance test.
pub const DEFAULT_ALPHA: f64 = 0.5;

/// Upper bound on projection passes per call. A vector that has not stabilized
/// after this many passes is treated as lying in the span of the basis.
pub const MAX_PASSES: usize = 2;

/// Selects the Gram-Schmidt variant used for each pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GramSchmidt {
    /// Each projection is subtracted immediately, so later columns see the
    /// updated vector.
    #[default]
    Modified,
    /// All coefficients are computed against the vector as it was at the start
    /// of the pass, then subtracted together.
    Classical,
}

impl GramSchmidt {
    /// Integer method code: 0 = modified, 1 = classical.
    pub fn code(self) -> i64 {
        match self {
            GramSchmidt::Modified => 0,
            GramSchmidt::Classical => 1,
        }
    }
}

impl TryFrom<i64> for GramSchmidt {
    type Error = ReorthError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(GramSchmidt::Modified),
            1 => Ok(GramSchmidt::Classical),
            other => Err(ReorthErrorKind::InvalidMethod(other).into()),
        }
    }
}

/// Result of a reorthogonalization call; the vector itself is updated in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReorthOutcome {
    /// Euclidean norm of the updated vector. Exactly zero when the vector was
    /// found to lie numerically in the span of the selected columns.
    pub norm: f64,
    /// Number of projection passes performed (1 or 2).
    pub passes: usize,
}

impl ReorthOutcome {
    /// `true` if the vector was declared numerically contained in the span of
    /// the selected columns and zeroed.
    pub fn is_rank_deficient(&self) -> bool {
        self.norm == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_method_from_code() {
        assert_eq!(GramSchmidt::try_from(0_i64).unwrap(), GramSchmidt::Modified);
        assert_eq!(GramSchmidt::try_from(1_i64).unwrap(), GramSchmidt::Classical);
        for method in [GramSchmidt::Modified, GramSchmidt::Classical] {
            assert_eq!(GramSchmidt::try_from(method.code()).unwrap(), method);
        }
    }

    #[test]
    fn test_unknown_method_code_is_invalid_argument() {
        let err = GramSchmidt::try_from(2_i64).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(GramSchmidt::try_from(-1_i64).unwrap_err().kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_default_method_is_modified() {
        assert_eq!(GramSchmidt::default(), GramSchmidt::Modified);
    }
}

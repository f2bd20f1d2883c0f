//! Error types for tridiagonal factorization and solve.
//!
//! Shape errors are always reported. Structural and numerical errors
//! (entries outside the band, asymmetry, non-positive pivots) are only
//! reported when strict validation is enabled, see
//! [`Validation`](crate::config::Validation).

use thiserror::Error;

/// Errors that can occur during tridiagonal operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TridiagError {
    /// The trailing two dimensions of a matrix batch are not equal.
    #[error("matrix batch is not square: {rows}x{cols}")]
    NotSquare {
        /// Number of rows per batch element
        rows: usize,
        /// Number of columns per batch element
        cols: usize,
    },

    /// Factor and right-hand side disagree on the batch size.
    #[error("batch size mismatch: factor has {factor}, right-hand side has {rhs}")]
    BatchMismatch {
        /// Batch size of the factor
        factor: usize,
        /// Batch size of the right-hand side
        rhs: usize,
    },

    /// A dimension does not match what the operation expects.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// The expected size
        expected: usize,
        /// The size that was provided
        got: usize,
    },

    /// An entry outside the tridiagonal band is not zero.
    #[error("entry ({row}, {col}) of batch element {batch} lies outside the tridiagonal band: {value}")]
    NotTridiagonal {
        /// Batch element
        batch: usize,
        /// Row index
        row: usize,
        /// Column index
        col: usize,
        /// The offending value
        value: f64,
    },

    /// Sub- and super-diagonal disagree.
    #[error("batch element {batch} is not symmetric at off-diagonal row {row}")]
    NotSymmetric {
        /// Batch element
        batch: usize,
        /// Row of the sub-diagonal entry (column is `row - 1`)
        row: usize,
    },

    /// An entry outside the bidiagonal band of a factor is not zero.
    #[error("entry ({row}, {col}) of factor {batch} lies outside the bidiagonal band: {value}")]
    NotBidiagonal {
        /// Batch element
        batch: usize,
        /// Row index
        row: usize,
        /// Column index
        col: usize,
        /// The offending value
        value: f64,
    },

    /// A pivot of the factorization is not strictly positive.
    #[error("batch element {batch} is not positive definite (pivot {index})")]
    NotPositiveDefinite {
        /// Batch element
        batch: usize,
        /// Index of the first failing pivot
        index: usize,
    },
}

/// A specialized `Result` type for tridiagonal operations.
pub type Result<T> = std::result::Result<T, TridiagError>;

impl TridiagError {
    /// Returns `true` if this error comes from inconsistent shapes.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            TridiagError::NotSquare { .. }
                | TridiagError::BatchMismatch { .. }
                | TridiagError::DimensionMismatch { .. }
        )
    }

    /// Returns `true` if this error comes from strict structural validation.
    pub fn is_structure_error(&self) -> bool {
        matches!(
            self,
            TridiagError::NotTridiagonal { .. }
                | TridiagError::NotSymmetric { .. }
                | TridiagError::NotBidiagonal { .. }
        )
    }

    /// Returns `true` if this is a positive-definiteness error.
    pub fn is_not_positive_definite(&self) -> bool {
        matches!(self, TridiagError::NotPositiveDefinite { .. })
    }

    /// The batch element the error refers to, if any.
    pub fn batch_index(&self) -> Option<usize> {
        match self {
            TridiagError::NotTridiagonal { batch, .. }
            | TridiagError::NotSymmetric { batch, .. }
            | TridiagError::NotBidiagonal { batch, .. }
            | TridiagError::NotPositiveDefinite { batch, .. } => Some(*batch),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TridiagError::NotSquare { rows: 3, cols: 4 };
        assert_eq!(err.to_string(), "matrix batch is not square: 3x4");
    }

    #[test]
    fn test_batch_mismatch_display() {
        let err = TridiagError::BatchMismatch { factor: 2, rhs: 5 };
        assert_eq!(
            err.to_string(),
            "batch size mismatch: factor has 2, right-hand side has 5"
        );
        assert!(err.is_shape_error());
        assert_eq!(err.batch_index(), None);
    }

    #[test]
    fn test_structure_errors() {
        let err = TridiagError::NotTridiagonal {
            batch: 1,
            row: 0,
            col: 2,
            value: 0.5,
        };
        assert!(err.is_structure_error());
        assert!(!err.is_shape_error());
        assert_eq!(err.batch_index(), Some(1));
    }

    #[test]
    fn test_not_positive_definite() {
        let err = TridiagError::NotPositiveDefinite { batch: 3, index: 2 };
        assert!(err.is_not_positive_definite());
        assert_eq!(
            err.to_string(),
            "batch element 3 is not positive definite (pivot 2)"
        );
    }
}

//! Configuration for tridiagonal factorization and solve

use crate::traits::RealField;
use serde::{Deserialize, Serialize};

/// Which triangle of the Cholesky factor is materialized.
///
/// For a symmetric positive definite `A`, `Lower` yields `A = L * L^T`
/// and `Upper` yields `A = U^T * U` with `U = L^T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Triangle {
    /// Lower bidiagonal factor, off-diagonal band at `[i][i - 1]`
    #[default]
    Lower,
    /// Upper bidiagonal factor, off-diagonal band at `[i - 1][i]`
    Upper,
}

impl Triangle {
    /// Convert from the boolean `upper` flag of the dense interface
    pub fn from_upper(upper: bool) -> Self {
        if upper { Triangle::Upper } else { Triangle::Lower }
    }

    /// `true` for [`Triangle::Upper`]
    pub fn is_upper(self) -> bool {
        self == Triangle::Upper
    }

    /// The other triangle
    pub fn flip(self) -> Self {
        match self {
            Triangle::Lower => Triangle::Upper,
            Triangle::Upper => Triangle::Lower,
        }
    }

    /// Position `(row, col)` of the `i`-th off-diagonal band entry in a
    /// dense `n x n` factor, for `i` in `0..n - 1`.
    #[inline]
    pub fn band_position(self, i: usize) -> (usize, usize) {
        match self {
            Triangle::Lower => (i + 1, i),
            Triangle::Upper => (i, i + 1),
        }
    }
}

/// How much of the input structure is checked at the dense boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Validation {
    /// Reject entries outside the band, asymmetric input and non-positive
    /// pivots
    #[default]
    Strict,
    /// Read the band and ignore everything else; invalid input produces
    /// NaN / Inf like a dense factorization would
    Skip,
}

/// Configuration shared by factorization and solve
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "R: RealField + Deserialize<'de>"))]
pub struct TridiagConfig<R> {
    /// Triangle of the factor
    #[serde(default)]
    pub triangle: Triangle,
    /// Validation policy
    #[serde(default)]
    pub validation: Validation,
    /// Largest absolute value accepted as zero outside the band, and largest
    /// accepted difference between sub- and super-diagonal
    #[serde(default = "default_band_tolerance")]
    pub band_tolerance: R,
    /// Minimum batch size processed in parallel
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

fn default_band_tolerance<R: RealField>() -> R {
    R::zero()
}

fn default_parallel_threshold() -> usize {
    64
}

impl<R: RealField> Default for TridiagConfig<R> {
    fn default() -> Self {
        Self {
            triangle: Triangle::Lower,
            validation: Validation::Strict,
            band_tolerance: default_band_tolerance(),
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

impl<R: RealField> TridiagConfig<R> {
    /// Default configuration producing a lower factor
    pub fn lower() -> Self {
        Self::default()
    }

    /// Default configuration producing an upper factor
    pub fn upper() -> Self {
        Self {
            triangle: Triangle::Upper,
            ..Self::default()
        }
    }

    /// Default configuration from the boolean `upper` flag
    pub fn from_upper(upper: bool) -> Self {
        Self {
            triangle: Triangle::from_upper(upper),
            ..Self::default()
        }
    }

    /// Set the validation policy
    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    /// Set the band tolerance
    pub fn with_band_tolerance(mut self, tolerance: R) -> Self {
        self.band_tolerance = tolerance;
        self
    }

    /// Set the minimum batch size processed in parallel
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// `true` when strict validation is enabled
    pub fn is_strict(&self) -> bool {
        self.validation == Validation::Strict
    }
}

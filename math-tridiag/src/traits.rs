//! Core traits for the tridiagonal kernels
//!
//! This module defines the scalar abstraction used throughout the crate:
//! - [`RealField`]: Trait for the floating point types the kernels run on

use num_traits::{Float, FromPrimitive, NumAssign, ToPrimitive};
use std::fmt::Debug;

/// Trait for scalar types that can be used in the tridiagonal kernels.
///
/// Only real floating point types are supported; the factorization takes
/// square roots of pivots and the solver divides by the factor diagonal,
/// both of which rely on IEEE semantics (NaN / Inf propagation) on
/// invalid input.
///
/// # Implementations
///
/// Provided for:
/// - `f64` (default precision)
/// - `f32` (for memory-constrained applications)
pub trait RealField:
    Float + NumAssign + FromPrimitive + ToPrimitive + Default + Send + Sync + Debug + 'static
{
    /// Check if this is approximately zero
    #[inline]
    fn is_zero_approx(&self, tol: Self) -> bool {
        self.abs() <= tol
    }

    /// Check if this is strictly positive (false for NaN)
    #[inline]
    fn is_strictly_positive(&self) -> bool {
        *self > Self::zero()
    }

    /// Lossy conversion used for diagnostics and error payloads
    #[inline]
    fn to_f64_lossy(&self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl RealField for f64 {}

impl RealField for f32 {}

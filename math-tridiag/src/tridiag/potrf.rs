//! Cholesky factorization of symmetric tridiagonal matrices
//!
//! For `A` tridiagonal with diagonal `d` and off-diagonal `e`, the lower
//! Cholesky factor `L` is bidiagonal:
//!
//! ```text
//! L[0][0]   = sqrt(d[0])
//! L[i][i-1] = e[i-1] / L[i-1][i-1]
//! L[i][i]   = sqrt(d[i] - L[i][i-1]^2)
//! ```
//!
//! The recurrence is sequential along `i` and independent across the
//! batch, which is mapped in parallel.
//!
//! Positive definiteness is a precondition. A non-positive pivot yields
//! NaN in the factor, the same as a dense factorization would, unless
//! strict validation turns it into [`TridiagError::NotPositiveDefinite`].

use super::band::{BidiagFactor, TridiagBatch};
use crate::config::TridiagConfig;
use crate::error::{Result, TridiagError};
use crate::parallel::{runs_in_parallel, zip_batch_mut};
use crate::traits::RealField;
use ndarray::{Array3, ArrayView3, ArrayViewMut1};

/// Factor one tridiagonal matrix in place.
///
/// On entry `diag` (length `n`) and `offdiag` (length `n - 1`) hold the
/// bands of `A`; on exit they hold the diagonal and the sub-diagonal of
/// `L`. Returns the index of the first pivot that was not strictly
/// positive, if any. The recurrence keeps going past such a pivot.
pub fn factor_bands<T: RealField>(diag: &mut [T], offdiag: &mut [T]) -> Option<usize> {
    factor_rows(ArrayViewMut1::from(diag), ArrayViewMut1::from(offdiag))
}

fn factor_rows<T: RealField>(
    mut diag: ArrayViewMut1<'_, T>,
    mut offdiag: ArrayViewMut1<'_, T>,
) -> Option<usize> {
    debug_assert_eq!(offdiag.len(), diag.len().saturating_sub(1));

    let mut bad_pivot = None;
    let mut prev = T::zero();
    for i in 0..diag.len() {
        let mut pivot = diag[i];
        if i > 0 {
            let l = offdiag[i - 1] / prev;
            offdiag[i - 1] = l;
            pivot -= l * l;
        }
        if bad_pivot.is_none() && !pivot.is_strictly_positive() {
            bad_pivot = Some(i);
        }
        prev = pivot.sqrt();
        diag[i] = prev;
    }
    bad_pivot
}

impl<T: RealField> TridiagBatch<T> {
    /// Cholesky factorization of every matrix in the batch.
    ///
    /// The returned factor is laid out as `config.triangle`. With strict
    /// validation a non-positive pivot is reported for the first failing
    /// batch element and no factor is returned.
    pub fn cholesky(&self, config: &TridiagConfig<T>) -> Result<BidiagFactor<T>> {
        let batch = self.batch_size();
        let n = self.dim();

        log::debug!(
            "Tridiagonal Cholesky: batch={}, n={}, parallel={}",
            batch,
            n,
            runs_in_parallel(batch, config.parallel_threshold)
        );

        // The factor overwrites a copy of the input bands
        let mut diag = self.diag().to_owned();
        let mut offdiag = self.offdiag().to_owned();
        let bad_pivots = zip_batch_mut(
            diag.view_mut(),
            offdiag.view_mut(),
            config.parallel_threshold,
            factor_rows,
        );

        for (b, index) in bad_pivots.into_iter().enumerate() {
            let Some(index) = index else { continue };
            if config.is_strict() {
                return Err(TridiagError::NotPositiveDefinite { batch: b, index });
            }
            log::debug!(
                "Batch element {} has a non-positive pivot at {}, factor contains NaN",
                b,
                index
            );
        }

        Ok(BidiagFactor {
            diag,
            offdiag,
            triangle: config.triangle,
        })
    }
}

/// Factor a dense `B x n x n` batch of symmetric tridiagonal matrices.
///
/// Returns the dense bidiagonal Cholesky factors, lower (`A = L L^T`) or
/// upper (`A = U^T U`) according to `config.triangle`.
pub fn potrf_with_config<T: RealField>(
    matrices: ArrayView3<'_, T>,
    config: &TridiagConfig<T>,
) -> Result<Array3<T>> {
    let batch = TridiagBatch::from_dense(matrices, config)?;
    Ok(batch.cholesky(config)?.to_dense())
}

/// Factor a dense batch with the default configuration.
///
/// `upper` selects the upper factor. The input must be symmetric,
/// tridiagonal and positive definite; this is checked, see
/// [`potrf_with_config`] to relax the checks.
pub fn tridiag_batch_potrf<T: RealField>(
    matrices: ArrayView3<'_, T>,
    upper: bool,
) -> Result<Array3<T>> {
    potrf_with_config(matrices, &TridiagConfig::from_upper(upper))
}

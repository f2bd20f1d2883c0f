//! Solve with a bidiagonal Cholesky factor
//!
//! Given the lower factor `L` of `A = L L^T`, the system `A x = b` is
//! solved by forward substitution `L y = b` followed by backward
//! substitution `L^T x = y`. Both passes are `O(n)` per right-hand-side
//! column since `L` has a single sub-diagonal.
//!
//! For an upper factor `U = L^T` the passes apply `U^T` first and `U`
//! second, which reads the very same band values.
//!
//! The diagonal is not checked before dividing; a zero pivot propagates as
//! Inf / NaN.

use super::band::BidiagFactor;
use crate::config::TridiagConfig;
use crate::error::{Result, TridiagError};
use crate::parallel::{for_each_batch_mut, runs_in_parallel};
use crate::traits::RealField;
use ndarray::{Array3, ArrayView1, ArrayView3, ArrayViewMut1, ArrayViewMut2, Axis};

/// Solve `L L^T X = B` in place for one factor.
///
/// `diag` (length `n`) and `sub` (length `n - 1`) are the bands of `L`,
/// `rhs` is the `n x k` right-hand side, overwritten with the solution.
pub fn solve_bands<T: RealField>(
    diag: ArrayView1<'_, T>,
    sub: ArrayView1<'_, T>,
    mut rhs: ArrayViewMut2<'_, T>,
) {
    debug_assert_eq!(rhs.nrows(), diag.len());
    debug_assert_eq!(sub.len(), diag.len().saturating_sub(1));

    for column in rhs.axis_iter_mut(Axis(1)) {
        solve_column(diag, sub, column);
    }
}

fn solve_column<T: RealField>(
    diag: ArrayView1<'_, T>,
    sub: ArrayView1<'_, T>,
    mut x: ArrayViewMut1<'_, T>,
) {
    let n = diag.len();
    if n == 0 {
        return;
    }

    // Forward substitution: L y = b
    let mut acc = x[0] / diag[0];
    x[0] = acc;
    for i in 1..n {
        acc = (x[i] - sub[i - 1] * acc) / diag[i];
        x[i] = acc;
    }

    // Backward substitution: L^T x = y
    acc = x[n - 1] / diag[n - 1];
    x[n - 1] = acc;
    for i in (0..n - 1).rev() {
        acc = (x[i] - sub[i] * acc) / diag[i];
        x[i] = acc;
    }
}

impl<T: RealField> BidiagFactor<T> {
    /// Solve `A X = B` for every element of the batch, where `A` is the
    /// matrix this factor was computed from.
    ///
    /// `rhs` has shape `B x n x k`.
    pub fn solve(&self, rhs: ArrayView3<'_, T>) -> Result<Array3<T>> {
        self.solve_with_config(rhs, &TridiagConfig::default())
    }

    /// Same as [`BidiagFactor::solve`], with an explicit parallel threshold
    /// taken from `config`.
    pub fn solve_with_config(
        &self,
        rhs: ArrayView3<'_, T>,
        config: &TridiagConfig<T>,
    ) -> Result<Array3<T>> {
        let (batch, rows, k) = rhs.dim();
        let n = self.dim();
        if batch != self.batch_size() {
            return Err(TridiagError::BatchMismatch {
                factor: self.batch_size(),
                rhs: batch,
            });
        }
        if rows != n {
            return Err(TridiagError::DimensionMismatch {
                expected: n,
                got: rows,
            });
        }

        log::debug!(
            "Tridiagonal solve ({:?}): batch={}, n={}, k={}, parallel={}",
            self.triangle,
            batch,
            n,
            k,
            runs_in_parallel(batch, config.parallel_threshold)
        );

        // Solved in place, so the right-hand side is copied exactly once
        let mut out = rhs.to_owned();
        let diag = self.diag();
        let offdiag = self.offdiag();
        for_each_batch_mut(out.view_mut(), config.parallel_threshold, |b, x| {
            solve_bands(diag.row(b), offdiag.row(b), x);
        });
        Ok(out)
    }
}

/// Solve a dense batch of systems given dense bidiagonal factors.
///
/// `factor` is `B x n x n` as returned by
/// [`potrf_with_config`](super::potrf_with_config) with the same
/// `config.triangle`, `rhs` is `B x n x k`. Returns the `B x n x k`
/// solution of `L L^T X = B` (lower) or `U^T U X = B` (upper).
pub fn potrs_with_config<T: RealField>(
    rhs: ArrayView3<'_, T>,
    factor: ArrayView3<'_, T>,
    config: &TridiagConfig<T>,
) -> Result<Array3<T>> {
    let (factor_batch, rows, cols) = factor.dim();
    if rows != cols {
        return Err(TridiagError::NotSquare { rows, cols });
    }
    let (rhs_batch, rhs_rows, _) = rhs.dim();
    if rhs_batch != factor_batch {
        return Err(TridiagError::BatchMismatch {
            factor: factor_batch,
            rhs: rhs_batch,
        });
    }
    if rhs_rows != rows {
        return Err(TridiagError::DimensionMismatch {
            expected: rows,
            got: rhs_rows,
        });
    }

    let factor = BidiagFactor::from_dense(factor, config.triangle, config)?;
    factor.solve_with_config(rhs, config)
}

/// Solve a dense batch with the default configuration.
///
/// `upper` must match the flag used to compute `factor`.
pub fn tridiag_batch_potrs<T: RealField>(
    rhs: ArrayView3<'_, T>,
    factor: ArrayView3<'_, T>,
    upper: bool,
) -> Result<Array3<T>> {
    potrs_with_config(rhs, factor, &TridiagConfig::from_upper(upper))
}

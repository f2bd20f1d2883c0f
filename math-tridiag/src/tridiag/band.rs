//! Band storage for batched tridiagonal matrices and bidiagonal factors
//!
//! Matrices are kept as two explicit band arrays, `diag` (`B x n`) and
//! `offdiag` (`B x (n - 1)`). Dense `B x n x n` arrays only appear at the
//! boundary, through `from_dense` / `to_dense`.

use crate::config::{Triangle, TridiagConfig};
use crate::error::{Result, TridiagError};
use crate::traits::RealField;
use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};

/// A batch of `B` symmetric tridiagonal `n x n` matrices
#[derive(Debug, Clone, PartialEq)]
pub struct TridiagBatch<T: RealField> {
    diag: Array2<T>,
    offdiag: Array2<T>,
}

/// A batch of `B` bidiagonal Cholesky factors
///
/// The band values do not depend on the triangle: the upper factor is the
/// transpose of the lower one, only the dense placement of `offdiag`
/// differs.
#[derive(Debug, Clone, PartialEq)]
pub struct BidiagFactor<T: RealField> {
    pub(crate) diag: Array2<T>,
    pub(crate) offdiag: Array2<T>,
    pub(crate) triangle: Triangle,
}

impl<T: RealField> TridiagBatch<T> {
    /// Build a batch from its bands
    ///
    /// `diag` has shape `B x n`, `offdiag` has shape `B x (n - 1)` (or
    /// `B x 0` when `n == 0`).
    pub fn from_bands(diag: Array2<T>, offdiag: Array2<T>) -> Result<Self> {
        check_band_shapes(&diag, &offdiag)?;
        Ok(Self { diag, offdiag })
    }

    /// Read the three central bands of a dense `B x n x n` batch.
    ///
    /// With strict validation, any entry outside the band larger than
    /// `config.band_tolerance` and any asymmetry between sub- and
    /// super-diagonal is rejected. Otherwise those entries are ignored and
    /// the sub-diagonal is used.
    pub fn from_dense(matrices: ArrayView3<'_, T>, config: &TridiagConfig<T>) -> Result<Self> {
        let (batch, rows, cols) = matrices.dim();
        if rows != cols {
            return Err(TridiagError::NotSquare { rows, cols });
        }
        let n = rows;
        let tol = config.band_tolerance;

        if config.is_strict() {
            for (b, matrix) in matrices.outer_iter().enumerate() {
                if let Some((row, col, value)) = first_off_band(matrix, tol, is_tridiagonal_entry)
                {
                    return Err(TridiagError::NotTridiagonal {
                        batch: b,
                        row,
                        col,
                        value: value.to_f64_lossy(),
                    });
                }
                if let Some(row) = first_asymmetry(matrix, tol) {
                    return Err(TridiagError::NotSymmetric { batch: b, row });
                }
            }
        } else if log::log_enabled!(log::Level::Warn) {
            let (off_band, asymmetric) = matrices.outer_iter().fold((0, 0), |(o, a), matrix| {
                (
                    o + count_off_band(matrix, tol, is_tridiagonal_entry),
                    a + count_asymmetry(matrix, tol),
                )
            });
            if off_band + asymmetric > 0 {
                log::warn!(
                    "Ignoring {} entries outside the tridiagonal band and {} super-diagonal entries that differ from the sub-diagonal ({} matrices of size {})",
                    off_band,
                    asymmetric,
                    batch,
                    n
                );
            }
        }

        let diag = Array2::from_shape_fn((batch, n), |(b, i)| matrices[[b, i, i]]);
        let offdiag =
            Array2::from_shape_fn((batch, n.saturating_sub(1)), |(b, i)| matrices[[b, i + 1, i]]);

        Ok(Self { diag, offdiag })
    }

    /// Materialize the dense `B x n x n` batch, zero outside the band
    pub fn to_dense(&self) -> Array3<T> {
        let (batch, n) = self.diag.dim();
        let mut out = Array3::zeros((batch, n, n));
        for b in 0..batch {
            for i in 0..n {
                out[[b, i, i]] = self.diag[[b, i]];
            }
            for i in 0..n.saturating_sub(1) {
                let e = self.offdiag[[b, i]];
                out[[b, i + 1, i]] = e;
                out[[b, i, i + 1]] = e;
            }
        }
        out
    }

    /// Number of matrices in the batch
    pub fn batch_size(&self) -> usize {
        self.diag.nrows()
    }

    /// Matrix dimension `n`
    pub fn dim(&self) -> usize {
        self.diag.ncols()
    }

    /// Main diagonals, `B x n`
    pub fn diag(&self) -> ArrayView2<'_, T> {
        self.diag.view()
    }

    /// Off-diagonals, `B x (n - 1)`
    pub fn offdiag(&self) -> ArrayView2<'_, T> {
        self.offdiag.view()
    }

    /// Multiply every matrix of the batch by the matching `n x k` block of
    /// `x`, in `O(n k)` per element.
    pub fn matmul_dense(&self, x: ArrayView3<'_, T>) -> Result<Array3<T>> {
        let (batch, rows, k) = x.dim();
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

        let mut out = Array3::zeros((batch, n, k));
        for b in 0..batch {
            for i in 0..n {
                for j in 0..k {
                    let mut acc = self.diag[[b, i]] * x[[b, i, j]];
                    if i > 0 {
                        acc += self.offdiag[[b, i - 1]] * x[[b, i - 1, j]];
                    }
                    if i + 1 < n {
                        acc += self.offdiag[[b, i]] * x[[b, i + 1, j]];
                    }
                    out[[b, i, j]] = acc;
                }
            }
        }
        Ok(out)
    }

    /// New batch made of the given batch elements, in order.
    ///
    /// Indices may repeat.
    pub fn select(&self, indices: &[usize]) -> Result<Self> {
        let batch = self.batch_size();
        if let Some(&bad) = indices.iter().find(|&&i| i >= batch) {
            return Err(TridiagError::DimensionMismatch {
                expected: batch,
                got: bad,
            });
        }
        Ok(Self {
            diag: self.diag.select(Axis(0), indices),
            offdiag: self.offdiag.select(Axis(0), indices),
        })
    }
}

impl<T: RealField> BidiagFactor<T> {
    /// Build a factor from its bands
    pub fn from_bands(diag: Array2<T>, offdiag: Array2<T>, triangle: Triangle) -> Result<Self> {
        check_band_shapes(&diag, &offdiag)?;
        Ok(Self {
            diag,
            offdiag,
            triangle,
        })
    }

    /// Read a dense `B x n x n` bidiagonal factor laid out as `triangle`.
    ///
    /// With strict validation, entries outside the bidiagonal band larger
    /// than `config.band_tolerance` are rejected.
    pub fn from_dense(
        factor: ArrayView3<'_, T>,
        triangle: Triangle,
        config: &TridiagConfig<T>,
    ) -> Result<Self> {
        let (batch, rows, cols) = factor.dim();
        if rows != cols {
            return Err(TridiagError::NotSquare { rows, cols });
        }
        let n = rows;
        let in_band = |row: usize, col: usize| {
            row == col || {
                let (r, c) = triangle.band_position(row.min(col));
                (r, c) == (row, col)
            }
        };

        if config.is_strict() {
            for (b, matrix) in factor.outer_iter().enumerate() {
                if let Some((row, col, value)) =
                    first_off_band(matrix, config.band_tolerance, &in_band)
                {
                    return Err(TridiagError::NotBidiagonal {
                        batch: b,
                        row,
                        col,
                        value: value.to_f64_lossy(),
                    });
                }
            }
        }

        let diag = Array2::from_shape_fn((batch, n), |(b, i)| factor[[b, i, i]]);
        let offdiag = Array2::from_shape_fn((batch, n.saturating_sub(1)), |(b, i)| {
            let (r, c) = triangle.band_position(i);
            factor[[b, r, c]]
        });

        Ok(Self {
            diag,
            offdiag,
            triangle,
        })
    }

    /// Materialize the dense `B x n x n` factor, zero outside the band
    pub fn to_dense(&self) -> Array3<T> {
        let (batch, n) = self.diag.dim();
        let mut out = Array3::zeros((batch, n, n));
        for b in 0..batch {
            for i in 0..n {
                out[[b, i, i]] = self.diag[[b, i]];
            }
            for i in 0..n.saturating_sub(1) {
                let (r, c) = self.triangle.band_position(i);
                out[[b, r, c]] = self.offdiag[[b, i]];
            }
        }
        out
    }

    /// The tridiagonal batch `L * L^T` (equivalently `U^T * U`)
    pub fn reconstruct(&self) -> TridiagBatch<T> {
        let (batch, n) = self.diag.dim();
        let diag = Array2::from_shape_fn((batch, n), |(b, i)| {
            let d = self.diag[[b, i]];
            if i > 0 {
                let s = self.offdiag[[b, i - 1]];
                d * d + s * s
            } else {
                d * d
            }
        });
        let offdiag = Array2::from_shape_fn((batch, n.saturating_sub(1)), |(b, i)| {
            self.offdiag[[b, i]] * self.diag[[b, i]]
        });
        TridiagBatch { diag, offdiag }
    }

    /// The same factor in the other triangle
    pub fn transpose(&self) -> Self {
        Self {
            diag: self.diag.clone(),
            offdiag: self.offdiag.clone(),
            triangle: self.triangle.flip(),
        }
    }

    /// Triangle of the dense layout
    pub fn triangle(&self) -> Triangle {
        self.triangle
    }

    /// Number of factors in the batch
    pub fn batch_size(&self) -> usize {
        self.diag.nrows()
    }

    /// Matrix dimension `n`
    pub fn dim(&self) -> usize {
        self.diag.ncols()
    }

    /// Factor diagonals, `B x n`
    pub fn diag(&self) -> ArrayView2<'_, T> {
        self.diag.view()
    }

    /// Factor off-diagonal bands, `B x (n - 1)`
    pub fn offdiag(&self) -> ArrayView2<'_, T> {
        self.offdiag.view()
    }
}

fn check_band_shapes<T>(diag: &Array2<T>, offdiag: &Array2<T>) -> Result<()> {
    let (batch, n) = diag.dim();
    if offdiag.nrows() != batch {
        return Err(TridiagError::BatchMismatch {
            factor: batch,
            rhs: offdiag.nrows(),
        });
    }
    if offdiag.ncols() != n.saturating_sub(1) {
        return Err(TridiagError::DimensionMismatch {
            expected: n.saturating_sub(1),
            got: offdiag.ncols(),
        });
    }
    Ok(())
}

#[inline]
fn is_tridiagonal_entry(row: usize, col: usize) -> bool {
    row.abs_diff(col) <= 1
}

fn first_off_band<T: RealField>(
    matrix: ArrayView2<'_, T>,
    tol: T,
    in_band: impl Fn(usize, usize) -> bool,
) -> Option<(usize, usize, T)> {
    matrix
        .indexed_iter()
        .find(|&((row, col), value)| !in_band(row, col) && !value.is_zero_approx(tol))
        .map(|((row, col), &value)| (row, col, value))
}

fn count_off_band<T: RealField>(
    matrix: ArrayView2<'_, T>,
    tol: T,
    in_band: impl Fn(usize, usize) -> bool,
) -> usize {
    matrix
        .indexed_iter()
        .filter(|&((row, col), value)| !in_band(row, col) && !value.is_zero_approx(tol))
        .count()
}

fn is_asymmetric_at<T: RealField>(matrix: ArrayView2<'_, T>, tol: T, row: usize) -> bool {
    !(matrix[[row, row - 1]] - matrix[[row - 1, row]]).is_zero_approx(tol)
}

/// First sub-diagonal row whose entry differs from its mirror
fn first_asymmetry<T: RealField>(matrix: ArrayView2<'_, T>, tol: T) -> Option<usize> {
    (1..matrix.nrows()).find(|&row| is_asymmetric_at(matrix, tol, row))
}

/// Number of sub-diagonal rows whose entry differs from its mirror
fn count_asymmetry<T: RealField>(matrix: ArrayView2<'_, T>, tol: T) -> usize {
    (1..matrix.nrows())
        .filter(|&row| is_asymmetric_at(matrix, tol, row))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Validation;
    use ndarray::{Array3, array};

    fn sample_dense() -> Array3<f64> {
        array![[
            [4.0, 1.0, 0.0],
            [1.0, 5.0, 2.0],
            [0.0, 2.0, 6.0],
        ]]
    }

    #[test]
    fn test_from_dense_reads_bands() {
        let batch = TridiagBatch::from_dense(sample_dense().view(), &TridiagConfig::default())
            .expect("tridiagonal input");
        assert_eq!(batch.batch_size(), 1);
        assert_eq!(batch.dim(), 3);
        assert_eq!(batch.diag(), array![[4.0, 5.0, 6.0]]);
        assert_eq!(batch.offdiag(), array![[1.0, 2.0]]);
        assert_eq!(batch.to_dense(), sample_dense());
    }

    #[test]
    fn test_from_dense_not_square() {
        let dense = Array3::<f64>::zeros((2, 3, 4));
        let err = TridiagBatch::from_dense(dense.view(), &TridiagConfig::default()).unwrap_err();
        assert_eq!(err, TridiagError::NotSquare { rows: 3, cols: 4 });
    }

    #[test]
    fn test_strict_rejects_off_band() {
        let mut dense = sample_dense();
        dense[[0, 2, 0]] = 0.5;
        let err = TridiagBatch::from_dense(dense.view(), &TridiagConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            TridiagError::NotTridiagonal {
                batch: 0,
                row: 2,
                col: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_strict_rejects_asymmetry() {
        let mut dense = sample_dense();
        dense[[0, 1, 2]] = 2.5;
        let err = TridiagBatch::from_dense(dense.view(), &TridiagConfig::default()).unwrap_err();
        assert_eq!(err, TridiagError::NotSymmetric { batch: 0, row: 2 });
    }

    #[test]
    fn test_band_tolerance_accepts_small_residuals() {
        let mut dense = sample_dense();
        dense[[0, 0, 2]] = 1e-14;
        dense[[0, 0, 1]] = 1.0 + 1e-14;
        let config = TridiagConfig::default().with_band_tolerance(1e-12);
        let batch = TridiagBatch::from_dense(dense.view(), &config).expect("within tolerance");
        assert_eq!(batch.offdiag()[[0, 0]], 1.0);
    }

    #[test]
    fn test_skip_ignores_off_band() {
        let mut dense = sample_dense();
        dense[[0, 0, 2]] = 7.0;
        dense[[0, 1, 2]] = -3.0;
        let config = TridiagConfig::default().with_validation(Validation::Skip);
        let batch = TridiagBatch::from_dense(dense.view(), &config).expect("skip mode");
        assert_eq!(batch.offdiag(), array![[1.0, 2.0]]);
    }

    #[test]
    fn test_dropped_entry_counts() {
        let mut dense = sample_dense();
        dense[[0, 0, 1]] = 9.0;
        dense[[0, 2, 0]] = 0.5;
        let matrix = dense.index_axis(Axis(0), 0);
        assert_eq!(count_off_band(matrix, 0.0, is_tridiagonal_entry), 1);
        assert_eq!(count_asymmetry(matrix, 0.0), 1);
        assert_eq!(count_asymmetry(matrix, 10.0), 0);
        assert_eq!(first_asymmetry(matrix, 0.0), Some(1));

        let clean = sample_dense();
        assert_eq!(count_asymmetry(clean.index_axis(Axis(0), 0), 0.0), 0);
    }

    #[test]
    fn test_from_bands_shape_checks() {
        let err = TridiagBatch::from_bands(Array2::<f64>::zeros((2, 4)), Array2::zeros((2, 4)))
            .unwrap_err();
        assert_eq!(
            err,
            TridiagError::DimensionMismatch {
                expected: 3,
                got: 4
            }
        );

        let err = TridiagBatch::from_bands(Array2::<f64>::zeros((2, 4)), Array2::zeros((3, 3)))
            .unwrap_err();
        assert!(err.is_shape_error());

        let empty = TridiagBatch::from_bands(Array2::<f64>::zeros((2, 0)), Array2::zeros((2, 0)))
            .expect("empty matrices");
        assert_eq!(empty.to_dense().dim(), (2, 0, 0));
    }

    #[test]
    fn test_matmul_dense() {
        let batch =
            TridiagBatch::from_dense(sample_dense().view(), &TridiagConfig::default()).unwrap();
        let x = array![[[1.0, 0.0], [2.0, 1.0], [3.0, -1.0]]];
        let y = batch.matmul_dense(x.view()).unwrap();
        let expected = sample_dense().index_axis(Axis(0), 0).dot(&x.index_axis(Axis(0), 0));
        assert_eq!(y.index_axis(Axis(0), 0), expected);
    }

    #[test]
    fn test_select() {
        let diag = array![[1.0, 2.0], [3.0, 4.0]];
        let offdiag = array![[0.1], [0.2]];
        let batch = TridiagBatch::from_bands(diag, offdiag).unwrap();
        let picked = batch.select(&[1, 1, 0]).unwrap();
        assert_eq!(picked.diag(), array![[3.0, 4.0], [3.0, 4.0], [1.0, 2.0]]);
        assert_eq!(picked.offdiag(), array![[0.2], [0.2], [0.1]]);
        assert!(batch.select(&[2]).is_err());
    }

    #[test]
    fn test_factor_dense_layouts() {
        let diag = array![[1.0, 2.0, 3.0]];
        let offdiag = array![[4.0, 5.0]];
        let lower = BidiagFactor::from_bands(diag, offdiag, Triangle::Lower).unwrap();
        assert_eq!(
            lower.to_dense(),
            array![[[1.0, 0.0, 0.0], [4.0, 2.0, 0.0], [0.0, 5.0, 3.0]]]
        );

        let upper = lower.transpose();
        assert_eq!(upper.triangle(), Triangle::Upper);
        assert_eq!(
            upper.to_dense(),
            array![[[1.0, 4.0, 0.0], [0.0, 2.0, 5.0], [0.0, 0.0, 3.0]]]
        );

        let config = TridiagConfig::default();
        let read_back =
            BidiagFactor::from_dense(upper.to_dense().view(), Triangle::Upper, &config).unwrap();
        assert_eq!(read_back, upper);
    }

    #[test]
    fn test_factor_strict_rejects_wrong_triangle() {
        let lower = array![[[1.0, 0.0], [4.0, 2.0]]];
        let err = BidiagFactor::from_dense(lower.view(), Triangle::Upper, &TridiagConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            TridiagError::NotBidiagonal {
                batch: 0,
                row: 1,
                col: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_reconstruct() {
        let factor = BidiagFactor::from_bands(
            array![[1.0, 1.0, 2.0, 3.0]],
            array![[2.0, 1.0, 2.0]],
            Triangle::Lower,
        )
        .unwrap();
        let batch = factor.reconstruct();
        assert_eq!(batch.diag(), array![[1.0, 5.0, 5.0, 13.0]]);
        assert_eq!(batch.offdiag(), array![[2.0, 1.0, 4.0]]);
    }
}

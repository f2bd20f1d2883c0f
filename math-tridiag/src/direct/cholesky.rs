//! Dense Cholesky decomposition
//!
//! Provides Cholesky factorization and the two triangular solves for dense
//! symmetric positive definite matrices. It makes no structural assumption
//! and runs in `O(n^3)`; it is the reference the banded kernels are
//! checked against.

use crate::config::Triangle;
use crate::error::{Result, TridiagError};
use crate::traits::RealField;
use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};

/// Compute the dense Cholesky factor of a symmetric positive definite matrix
///
/// Only the lower triangle of `a` is read. Returns `L` with `A = L L^T`, or
/// `U = L^T` with `A = U^T U` for [`Triangle::Upper`].
pub fn cholesky_factorize<T: RealField>(
    a: ArrayView2<'_, T>,
    triangle: Triangle,
) -> Result<Array2<T>> {
    factorize_lower(a, 0).map(|l| match triangle {
        Triangle::Lower => l,
        Triangle::Upper => l.reversed_axes(),
    })
}

fn factorize_lower<T: RealField>(a: ArrayView2<'_, T>, batch: usize) -> Result<Array2<T>> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(TridiagError::NotSquare {
            rows: n,
            cols: a.ncols(),
        });
    }

    let mut l = Array2::zeros((n, n));
    for j in 0..n {
        let mut pivot = a[[j, j]];
        for k in 0..j {
            pivot -= l[[j, k]] * l[[j, k]];
        }
        if !pivot.is_strictly_positive() {
            return Err(TridiagError::NotPositiveDefinite { batch, index: j });
        }
        let l_jj = pivot.sqrt();
        l[[j, j]] = l_jj;

        for i in (j + 1)..n {
            let mut s = a[[i, j]];
            for k in 0..j {
                s -= l[[i, k]] * l[[j, k]];
            }
            l[[i, j]] = s / l_jj;
        }
    }

    Ok(l)
}

/// Solve `L X = B` by forward substitution, `L` dense lower triangular
pub fn solve_lower_triangular<T: RealField>(
    l: ArrayView2<'_, T>,
    b: ArrayView2<'_, T>,
) -> Result<Array2<T>> {
    let n = check_triangular_system(l, b)?;
    let mut x = b.to_owned();

    for mut column in x.axis_iter_mut(Axis(1)) {
        for i in 0..n {
            let mut s = column[i];
            for k in 0..i {
                s -= l[[i, k]] * column[k];
            }
            column[i] = s / l[[i, i]];
        }
    }

    Ok(x)
}

/// Solve `U X = B` by backward substitution, `U` dense upper triangular
pub fn solve_upper_triangular<T: RealField>(
    u: ArrayView2<'_, T>,
    b: ArrayView2<'_, T>,
) -> Result<Array2<T>> {
    let n = check_triangular_system(u, b)?;
    let mut x = b.to_owned();

    for mut column in x.axis_iter_mut(Axis(1)) {
        for i in (0..n).rev() {
            let mut s = column[i];
            for k in (i + 1)..n {
                s -= u[[i, k]] * column[k];
            }
            column[i] = s / u[[i, i]];
        }
    }

    Ok(x)
}

/// Solve `A X = B` given the dense Cholesky factor of `A`
pub fn cholesky_solve<T: RealField>(
    factor: ArrayView2<'_, T>,
    b: ArrayView2<'_, T>,
    triangle: Triangle,
) -> Result<Array2<T>> {
    match triangle {
        Triangle::Lower => {
            let y = solve_lower_triangular(factor, b)?;
            solve_upper_triangular(factor.t(), y.view())
        }
        Triangle::Upper => {
            let y = solve_lower_triangular(factor.t(), b)?;
            solve_upper_triangular(factor, y.view())
        }
    }
}

/// Dense Cholesky factor of every matrix in a `B x n x n` batch
pub fn batch_cholesky<T: RealField>(
    matrices: ArrayView3<'_, T>,
    triangle: Triangle,
) -> Result<Array3<T>> {
    let mut out = Array3::zeros(matrices.raw_dim());
    for (b, matrix) in matrices.outer_iter().enumerate() {
        let l = factorize_lower(matrix, b)?;
        let mut slot = out.index_axis_mut(Axis(0), b);
        match triangle {
            Triangle::Lower => slot.assign(&l),
            Triangle::Upper => slot.assign(&l.t()),
        }
    }
    Ok(out)
}

/// Dense solve of every system in a batch given dense Cholesky factors
pub fn batch_cholesky_solve<T: RealField>(
    rhs: ArrayView3<'_, T>,
    factor: ArrayView3<'_, T>,
    triangle: Triangle,
) -> Result<Array3<T>> {
    let (factor_batch, _, _) = factor.dim();
    let (rhs_batch, _, _) = rhs.dim();
    if factor_batch != rhs_batch {
        return Err(TridiagError::BatchMismatch {
            factor: factor_batch,
            rhs: rhs_batch,
        });
    }

    let mut out = Array3::zeros(rhs.raw_dim());
    for (b, (f, r)) in factor.outer_iter().zip(rhs.outer_iter()).enumerate() {
        let x = cholesky_solve(f, r, triangle)?;
        out.index_axis_mut(Axis(0), b).assign(&x);
    }
    Ok(out)
}

fn check_triangular_system<T>(t: ArrayView2<'_, T>, b: ArrayView2<'_, T>) -> Result<usize> {
    let n = t.nrows();
    if n != t.ncols() {
        return Err(TridiagError::NotSquare {
            rows: n,
            cols: t.ncols(),
        });
    }
    if b.nrows() != n {
        return Err(TridiagError::DimensionMismatch {
            expected: n,
            got: b.nrows(),
        });
    }
    Ok(n)
}

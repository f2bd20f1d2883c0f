//! Dense direct solvers
//!
//! This module provides the dense (unstructured) counterparts of the
//! tridiagonal kernels:
//! - [`cholesky_factorize`]: dense Cholesky factorization
//! - [`cholesky_solve`]: forward then backward substitution with a dense factor
//! - [`batch_cholesky`], [`batch_cholesky_solve`]: the same over a batch axis

mod cholesky;

pub use cholesky::{
    batch_cholesky, batch_cholesky_solve, cholesky_factorize, cholesky_solve,
    solve_lower_triangular, solve_upper_triangular,
};

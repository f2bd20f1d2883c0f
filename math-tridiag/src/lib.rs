//! Batched Cholesky factorization and solve for symmetric tridiagonal matrices
//!
//! A symmetric positive definite tridiagonal matrix has a bidiagonal
//! Cholesky factor, which can be computed and applied in `O(n)` instead of
//! the `O(n^3)` / `O(n^2)` of the dense routines. This crate does both for
//! a whole batch of matrices at once, with the batch axis processed in
//! parallel.
//!
//! # Features
//!
//! - **Factorization**: [`tridiag_batch_potrf`], lower or upper factor
//! - **Solve**: [`tridiag_batch_potrs`], batched matrix right-hand sides
//! - **Band storage**: [`TridiagBatch`] / [`BidiagFactor`] avoid the dense layout
//! - **Dense reference**: [`direct`] Cholesky and triangular solves
//! - **Generic Scalar Types**: Works with f64, f32
//!
//! # Example
//!
//! ```ignore
//! use math_audio_tridiag::{tridiag_batch_potrf, tridiag_batch_potrs};
//! use ndarray::Array3;
//!
//! // B x n x n symmetric positive definite tridiagonal matrices
//! let factor = tridiag_batch_potrf(matrices.view(), false)?;
//!
//! // B x n x k right-hand sides
//! let solution = tridiag_batch_potrs(rhs.view(), factor.view(), false)?;
//! ```

pub mod config;
pub mod direct;
pub mod error;
pub mod parallel;
pub mod traits;
pub mod tridiag;

// Re-export main types
pub use config::{Triangle, TridiagConfig, Validation};
pub use error::{Result, TridiagError};
pub use traits::RealField;

// Re-export the batched kernels
pub use tridiag::{
    BidiagFactor, TridiagBatch, factor_bands, potrf_with_config, potrs_with_config, solve_bands,
    tridiag_batch_potrf, tridiag_batch_potrs,
};

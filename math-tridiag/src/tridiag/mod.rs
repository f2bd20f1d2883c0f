//! Batched Cholesky factorization and solve for symmetric tridiagonal
//! matrices
//!
//! This module provides:
//! - [`tridiag_batch_potrf`] / [`potrf_with_config`]: bidiagonal Cholesky
//!   factor of a dense `B x n x n` batch
//! - [`tridiag_batch_potrs`] / [`potrs_with_config`]: solve with such a
//!   factor against a dense `B x n x k` right-hand side
//! - [`TridiagBatch`] and [`BidiagFactor`]: band storage used by both, for
//!   callers that do not need the dense layout
//!
//! Work is `O(n)` per matrix and right-hand-side column. Each batch element
//! is processed independently.

mod band;
mod potrf;
mod potrs;

pub use band::{BidiagFactor, TridiagBatch};
pub use potrf::{factor_bands, potrf_with_config, tridiag_batch_potrf};
pub use potrs::{potrs_with_config, solve_bands, tridiag_batch_potrs};

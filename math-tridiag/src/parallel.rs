//! Parallel utilities with feature-gated implementations
//!
//! Only batch-axis iteration is provided: the kernels write every batch
//! element in place into one preallocated output. With the `rayon` feature
//! the batch axis is split across the global thread pool, otherwise it is
//! walked sequentially.

use ndarray::{ArrayViewMut, ArrayViewMut1, ArrayViewMut2, Axis, RemoveAxis};

/// Check if parallel processing is available
#[cfg(feature = "rayon")]
pub fn is_parallel_available() -> bool {
    true
}

/// Check if parallel processing is available
#[cfg(not(feature = "rayon"))]
pub fn is_parallel_available() -> bool {
    false
}

/// Whether a batch of `count` elements is split across threads for the
/// given `threshold`.
pub fn runs_in_parallel(count: usize, threshold: usize) -> bool {
    count >= threshold.max(1) && is_parallel_available()
}

/// Call `f(b, element)` on every element along the batch (first) axis of
/// `out`, in parallel once the batch reaches `threshold`.
pub fn for_each_batch_mut<A, D, F>(mut out: ArrayViewMut<'_, A, D>, threshold: usize, f: F)
where
    A: Send + Sync,
    D: RemoveAxis,
    F: Fn(usize, ArrayViewMut<'_, A, D::Smaller>) + Sync + Send,
{
    if runs_in_parallel(out.len_of(Axis(0)), threshold) {
        par_for_each_batch(out, f);
    } else {
        for (b, element) in out.axis_iter_mut(Axis(0)).enumerate() {
            f(b, element);
        }
    }
}

/// Walk the rows of two `B x _` arrays in lockstep, mapping each pair in
/// place. Results come back in batch order.
pub fn zip_batch_mut<A, U, F>(
    mut first: ArrayViewMut2<'_, A>,
    mut second: ArrayViewMut2<'_, A>,
    threshold: usize,
    f: F,
) -> Vec<U>
where
    A: Send + Sync,
    U: Send,
    F: Fn(ArrayViewMut1<'_, A>, ArrayViewMut1<'_, A>) -> U + Sync + Send,
{
    debug_assert_eq!(first.nrows(), second.nrows());
    if runs_in_parallel(first.nrows(), threshold) {
        par_zip_batch(first, second, f)
    } else {
        first
            .axis_iter_mut(Axis(0))
            .zip(second.axis_iter_mut(Axis(0)))
            .map(|(a, b)| f(a, b))
            .collect()
    }
}

#[cfg(feature = "rayon")]
fn par_for_each_batch<A, D, F>(mut out: ArrayViewMut<'_, A, D>, f: F)
where
    A: Send + Sync,
    D: RemoveAxis,
    F: Fn(usize, ArrayViewMut<'_, A, D::Smaller>) + Sync + Send,
{
    use rayon::prelude::*;
    out.axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(b, element)| f(b, element));
}

#[cfg(not(feature = "rayon"))]
fn par_for_each_batch<A, D, F>(mut out: ArrayViewMut<'_, A, D>, f: F)
where
    D: RemoveAxis,
    F: Fn(usize, ArrayViewMut<'_, A, D::Smaller>),
{
    for (b, element) in out.axis_iter_mut(Axis(0)).enumerate() {
        f(b, element);
    }
}

#[cfg(feature = "rayon")]
fn par_zip_batch<A, U, F>(mut first: ArrayViewMut2<'_, A>, mut second: ArrayViewMut2<'_, A>, f: F) -> Vec<U>
where
    A: Send + Sync,
    U: Send,
    F: Fn(ArrayViewMut1<'_, A>, ArrayViewMut1<'_, A>) -> U + Sync + Send,
{
    use rayon::prelude::*;
    first
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .zip(second.axis_iter_mut(Axis(0)))
        .map(|(a, b)| f(a, b))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn par_zip_batch<A, U, F>(mut first: ArrayViewMut2<'_, A>, mut second: ArrayViewMut2<'_, A>, f: F) -> Vec<U>
where
    F: Fn(ArrayViewMut1<'_, A>, ArrayViewMut1<'_, A>) -> U,
{
    first
        .axis_iter_mut(Axis(0))
        .zip(second.axis_iter_mut(Axis(0)))
        .map(|(a, b)| f(a, b))
        .collect()
}

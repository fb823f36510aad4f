//! Merge-path partitioning of the combined (segments, values) work list.
//!
//! The merge path is the staircase through the `(nrows + 1) x (nnz + 1)`
//! grid traced by merging the segment end-offsets with the counting sequence
//! of value indices, ties going to the segment side. Splitting the path at
//! evenly spaced diagonals assigns every worker the same number of steps no
//! matter how values are distributed over rows.

use crate::util::usize_to_i64;

/// `seg_end[r] <= q`, answered without materializing the end-offset array.
///
/// `seg_end[r]` is the index of the first value belonging to a row greater
/// than `r`, i.e. the number of values in rows `0..=r`. Because `row` is
/// non-decreasing, at most `q` values lie in rows `0..=r` exactly when the
/// value at index `q` (if any) belongs to a later row.
#[inline]
pub fn seg_end_le(row: &[i64], r: usize, q: usize) -> bool {
    q >= row.len() || row[q] > usize_to_i64(r)
}

/// Splits the merge path at diagonal `diag`.
///
/// Returns the unique `(segments consumed, values consumed)` pair summing to
/// `diag` such that every segment end-offset before the split is `<=` every
/// value index after it, and strictly greater the other way around. Ties
/// place the end-offset first, so an empty row emits its tail before any
/// value is attributed to it.
///
/// Binary search over the segment side; `O(log min(nrows, nnz))`, pure.
#[must_use]
pub fn merge_path_search(diag: usize, row: &[i64], nrows: usize, nnz: usize) -> (usize, usize) {
    debug_assert!(diag <= nrows + nnz);
    let mut lo = diag.saturating_sub(nnz);
    let mut hi = diag.min(nrows);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        // mid < hi <= diag, so the value-side index is in range.
        if seg_end_le(row, mid, diag - mid - 1) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    (lo, diag - lo)
}

/// Evenly spaced diagonals `D_w = floor(w * path_len / workers)` for
/// `w = 0..=workers`. Consecutive entries bound each worker's half-open
/// share of the path.
#[must_use]
pub fn worker_diagonals(path_len: usize, workers: usize) -> Vec<usize> {
    assert!(workers >= 1, "at least one worker required");
    (0..=workers)
        .map(|w| {
            let d = (w as u128 * path_len as u128) / workers as u128;
            #[allow(clippy::cast_possible_truncation, reason = "d <= path_len fits usize")]
            {
                d as usize
            }
        })
        .collect()
}

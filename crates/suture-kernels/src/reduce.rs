//! Per-worker tile reduction over merge-path regions.
//!
//! Every worker owns a half-open span of merge-path diagonals. It walks the
//! span one tile at a time, turning each path step into a (row, value) pair:
//! a step on the value side contributes `data[k] * x[col[k]]` to the open
//! row, a step on the segment side closes the open row and flags the pair as
//! that row's tail. An inclusive reduce-by-row scan threads a carry through
//! the tiles, and every flagged pair scatters its scanned value into `y`.
//! Rows whose tail lies outside the span are handed to the boundary fixup as
//! two partials per worker.
#![allow(
    clippy::many_single_char_names,
    reason = "Math kernels conventionally use i/j/k/n to denote indices and counts"
)]

use crate::path::{merge_path_search, seg_end_le};
use crate::scan::inclusive_row_scan;
use crate::util::{i64_to_usize, usize_to_i64};
use rayon::prelude::*;
use std::cell::RefCell;
use suture_core::{Coo, RowPartial};
use thread_local::ThreadLocal;

/// Fixed-size scratch arena for one worker.
///
/// The three regions hold one tile of pair rows, pair values, and tail
/// flags. A tile passes through them in phase order: fill, scan (values are
/// overwritten by their running reduction), scatter. The arena is reused for
/// every tile a worker consumes.
pub struct TileScratch {
    rows: Vec<i64>,
    values: Vec<f64>,
    tails: Vec<bool>,
}

impl TileScratch {
    /// Allocates an arena for `tile_items` merge-path steps per tile.
    #[must_use]
    pub fn new(tile_items: usize) -> Self {
        let n = tile_items.max(1);
        Self {
            rows: vec![0i64; n],
            values: vec![0.0f64; n],
            tails: vec![false; n],
        }
    }

    /// Path steps consumed per tile.
    #[inline]
    #[must_use]
    pub fn tile_items(&self) -> usize {
        self.rows.len()
    }
}

/// Reduces one merge-path region `[diag_begin, diag_end)` into `y`.
///
/// Returns the region's boundary partials `(first, last)`: the contribution
/// to the first row touched, and the still-open partial at the end of the
/// region. Rows whose tail falls inside the region are written to `y`
/// directly. Indices must have been validated; `y` must have `nrows` slots.
pub fn reduce_region_f64_i64<R>(
    a: &Coo<f64, i64>,
    x: &[f64],
    diag_begin: usize,
    diag_end: usize,
    scratch: &mut TileScratch,
    identity: f64,
    reduce: &R,
    y: &mut [f64],
) -> (RowPartial, RowPartial)
where
    R: Fn(f64, f64) -> f64,
{
    assert_eq!(y.len(), a.nrows, "y length must equal nrows");
    // SAFETY: exclusive access to all of `y` for the whole call.
    unsafe {
        reduce_region_raw(
            a,
            x,
            diag_begin,
            diag_end,
            scratch,
            identity,
            reduce,
            y.as_mut_ptr(),
        )
    }
}

/// Region walk over a shared output pointer.
///
/// # Safety
/// `y` must point to `a.nrows` writable slots, and no other writer may touch
/// the slots of rows whose tail lies inside `[diag_begin, diag_end)` while
/// the call runs. Disjoint merge-path regions satisfy this by construction.
#[allow(clippy::too_many_arguments)]
unsafe fn reduce_region_raw<R>(
    a: &Coo<f64, i64>,
    x: &[f64],
    diag_begin: usize,
    diag_end: usize,
    scratch: &mut TileScratch,
    identity: f64,
    reduce: &R,
    y: *mut f64,
) -> (RowPartial, RowPartial)
where
    R: Fn(f64, f64) -> f64,
{
    let nnz = a.nnz();
    let (row_start, val_start) = merge_path_search(diag_begin, &a.row, a.nrows, nnz);
    let (row_end, val_end) = merge_path_search(diag_end, &a.row, a.nrows, nnz);

    let first_row = usize_to_i64(row_start);
    let mut first = RowPartial::identity(first_row, identity);
    let mut latched = false;
    let mut carry = RowPartial::identity(first_row, identity);

    let tile_items = scratch.tile_items();
    let mut rc = row_start;
    let mut vc = val_start;
    let mut trailing_tail = false;

    while rc < row_end || vc < val_end {
        // Fill phase: consume up to one tile of path steps. Each step
        // advances exactly one side.
        let mut n = 0usize;
        while n < tile_items && (rc < row_end || vc < val_end) {
            if rc < row_end && seg_end_le(&a.row, rc, vc) {
                // Row rc has no values left: emit its tail.
                scratch.rows[n] = usize_to_i64(rc);
                scratch.values[n] = identity;
                scratch.tails[n] = true;
                rc += 1;
            } else {
                debug_assert!(vc < val_end);
                let c = i64_to_usize(a.col[vc]);
                scratch.rows[n] = usize_to_i64(rc);
                scratch.values[n] = a.data[vc] * x[c];
                scratch.tails[n] = false;
                vc += 1;
            }
            n += 1;
        }

        // Scan phase: running reduction seeded by the previous tile's carry.
        carry = inclusive_row_scan(&scratch.rows[..n], &mut scratch.values[..n], carry, reduce);

        // Scatter phase: finalized rows leave the worker here. The first
        // tail observed also latches the first-row partial for the fixup.
        for k in 0..n {
            if scratch.tails[k] {
                let r = i64_to_usize(scratch.rows[k]);
                unsafe {
                    *y.add(r) = scratch.values[k];
                }
                if !latched {
                    first.value = scratch.values[k];
                    latched = true;
                }
            }
        }
        trailing_tail = scratch.tails[n - 1];
    }

    // The carry after a trailing tail belongs to the next, still untouched
    // row; handing the closed row's total onward would count it twice in the
    // fixup. For the globally final region that next row is `nrows`, which
    // the fixup treats as neutral padding.
    let last = if rc == row_start && vc == val_start {
        RowPartial::identity(first_row, identity)
    } else if trailing_tail {
        RowPartial::identity(usize_to_i64(rc), identity)
    } else {
        carry
    };
    (first, last)
}

/// Launches one tile reducer per region and collects the boundary partials
/// in stream order `first[0], last[0], first[1], last[1], ...`.
///
/// `diagonals` are the `workers + 1` region bounds from
/// [`worker_diagonals`](crate::path::worker_diagonals). Scratch arenas are
/// reused across regions scheduled on the same thread.
pub fn reduce_regions_f64_i64<R>(
    a: &Coo<f64, i64>,
    x: &[f64],
    diagonals: &[usize],
    tile_items: usize,
    identity: f64,
    reduce: &R,
    y: &mut [f64],
) -> Vec<RowPartial>
where
    R: Fn(f64, f64) -> f64 + Sync,
{
    assert!(diagonals.len() >= 2, "need at least one region");
    assert_eq!(y.len(), a.nrows, "y length must equal nrows");
    let workers = diagonals.len() - 1;
    let tls: ThreadLocal<RefCell<TileScratch>> = ThreadLocal::new();
    let y_addr = y.as_mut_ptr() as usize;
    let pairs: Vec<(RowPartial, RowPartial)> = (0..workers)
        .into_par_iter()
        .map(|w| {
            let cell = tls.get_or(|| RefCell::new(TileScratch::new(tile_items)));
            let mut scratch = cell.borrow_mut();
            let y_ptr = y_addr as *mut f64;
            // SAFETY: the regions form a disjoint cover of the merge path,
            // so each row tail (and with it each y slot) is scattered by
            // exactly one worker.
            unsafe {
                reduce_region_raw(
                    a,
                    x,
                    diagonals[w],
                    diagonals[w + 1],
                    &mut scratch,
                    identity,
                    reduce,
                    y_ptr,
                )
            }
        })
        .collect();

    let mut partials = Vec::with_capacity(2 * workers);
    for (head, tail) in pairs {
        partials.push(head);
        partials.push(tail);
    }
    partials
}

//! Boundary fixup: stitches rows that straddle worker regions.
//!
//! The reduction phase leaves two partials per worker, ordered
//! `first[0], last[0], first[1], last[1], ...`. Because workers own
//! contiguous merge-path spans, the row ids in this stream are
//! non-decreasing, and consecutive partials sharing a row id are exactly the
//! per-worker contributions to one straddling row. Summing each run and
//! scattering the total finalizes those rows; the overwrite also corrects
//! any boundary row a worker scattered with only its own share.
//!
//! The reducer scans inclusively so the pair carrying a tail flag holds the
//! finished value; this pass scans exclusively because a run's total is
//! known the moment the next run starts.

use crate::scan::exclusive_row_scan;
use crate::util::i64_to_usize;
use suture_core::RowPartial;

#[inline]
fn scatter(y: &mut [f64], row: i64, value: f64) {
    // Trailing partials may carry the neutral one-past-the-end row.
    if row >= 0 {
        let r = i64_to_usize(row);
        if r < y.len() {
            y[r] = value;
        }
    }
}

/// Runs the single-worker fixup pass over the boundary-partial stream.
///
/// Streams `partials` in tiles of `tile_items`, flags heads of equal-row
/// runs (comparing across tile boundaries through the running prefix),
/// writes each closed run's total into `y`, and scatters the final running
/// prefix at the end. Partials addressing the one-past-the-end row are
/// neutral and never scattered.
pub fn fixup_row_partials<R>(
    partials: &[RowPartial],
    y: &mut [f64],
    tile_items: usize,
    identity: f64,
    reduce: &R,
) where
    R: Fn(f64, f64) -> f64,
{
    if partials.is_empty() {
        return;
    }
    let tile_items = tile_items.max(1);
    let mut rows = vec![0i64; tile_items];
    let mut values = vec![0.0f64; tile_items];
    let mut carry = RowPartial::identity(partials[0].row, identity);

    for chunk in partials.chunks(tile_items) {
        let n = chunk.len();
        // Load phase: stage the tile.
        for (k, p) in chunk.iter().enumerate() {
            rows[k] = p.row;
            values[k] = p.value;
        }
        let carry_row = carry.row;
        // Scan phase: each slot receives the prefix excluding itself.
        let next = exclusive_row_scan(&rows[..n], &mut values[..n], carry, reduce);
        // Scatter phase: a head closes the previous run, whose total is the
        // head's exclusive prefix.
        for k in 0..n {
            let prev = if k == 0 { carry_row } else { rows[k - 1] };
            if rows[k] != prev {
                scatter(y, prev, values[k]);
            }
        }
        carry = next;
    }

    // The final running prefix is the last run's total.
    scatter(y, carry.row, carry.value);
}

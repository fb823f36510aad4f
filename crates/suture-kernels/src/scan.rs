//! Reduce-by-row scans over (row, value) pairs.
//!
//! The combine operator reduces values of equal rows left to right and
//! restarts on a row change; it is associative whenever `reduce` is. Float
//! addition is used with strict left-to-right grouping within a row, so a
//! given worker count reproduces results bitwise; different worker counts
//! may round differently.
//!
//! Each tile scan is seeded with the carry returned by the previous tile,
//! which makes the sequence of per-tile scans equivalent to one scan over
//! the whole region. The operator never owns state: `reduce` is passed in.

use suture_core::RowPartial;

/// Combine two partials: equal rows reduce, a row change keeps the right
/// pair.
#[inline]
#[must_use]
pub fn combine_partials<R>(a: RowPartial, b: RowPartial, reduce: &R) -> RowPartial
where
    R: Fn(f64, f64) -> f64,
{
    if a.row == b.row {
        RowPartial::new(b.row, reduce(a.value, b.value))
    } else {
        b
    }
}

/// In-place inclusive left scan of one tile under the combine.
///
/// After the call `values[k]` holds the running reduction of all pairs up to
/// and including `k` that share `rows[k]`. Returns the carry for the next
/// tile (the scanned final pair).
pub fn inclusive_row_scan<R>(
    rows: &[i64],
    values: &mut [f64],
    carry: RowPartial,
    reduce: &R,
) -> RowPartial
where
    R: Fn(f64, f64) -> f64,
{
    debug_assert_eq!(rows.len(), values.len());
    let mut run = carry;
    for (k, &r) in rows.iter().enumerate() {
        run = combine_partials(run, RowPartial::new(r, values[k]), reduce);
        values[k] = run.value;
    }
    run
}

/// In-place exclusive left scan of one tile under the combine.
///
/// After the call `values[k]` holds the running reduction of all pairs
/// strictly before `k`; at the head of a run this is the closed previous
/// run's total. Returns the inclusive carry for the next tile.
pub fn exclusive_row_scan<R>(
    rows: &[i64],
    values: &mut [f64],
    carry: RowPartial,
    reduce: &R,
) -> RowPartial
where
    R: Fn(f64, f64) -> f64,
{
    debug_assert_eq!(rows.len(), values.len());
    let mut run = carry;
    for (k, &r) in rows.iter().enumerate() {
        let incoming = RowPartial::new(r, values[k]);
        values[k] = run.value;
        run = combine_partials(run, incoming, reduce);
    }
    run
}

//! SpMV entry points: validation, grid sizing, and kernel launch.
//!
//! `y = A @ x` for a row-sorted COO matrix. The parallel path runs the
//! merge-path segmented reduction; rows are finalized either inside the
//! worker owning their tail or by the boundary fixup, never both at once.

use crate::config::SpmvConfig;
use crate::fixup::fixup_row_partials;
use crate::path::worker_diagonals;
use crate::reduce::reduce_regions_f64_i64;
use crate::util::{i64_to_usize, SMALL_DIM_LIMIT, SMALL_NNZ_LIMIT};
use suture_core::{Coo, Error, Result};

/// Checks every launch precondition; the kernels themselves never validate.
fn validate_f64_i64(a: &Coo<f64, i64>, x: &[f64]) -> Result<()> {
    if a.row.len() != a.data.len() || a.col.len() != a.data.len() {
        return Err(Error::LengthMismatch {
            row: a.row.len(),
            col: a.col.len(),
            data: a.data.len(),
        });
    }
    if x.len() != a.ncols {
        return Err(Error::VectorLengthMismatch {
            expected: a.ncols,
            got: x.len(),
        });
    }
    let mut prev = i64::MIN;
    for (k, &r) in a.row.iter().enumerate() {
        if r < prev {
            return Err(Error::RowsNotSorted { position: k });
        }
        if !(r >= 0 && usize::try_from(r).is_ok_and(|i| i < a.nrows)) {
            return Err(Error::RowIndexOutOfBounds {
                position: k,
                index: r,
                nrows: a.nrows,
            });
        }
        prev = r;
    }
    for (k, &c) in a.col.iter().enumerate() {
        if !(c >= 0 && usize::try_from(c).is_ok_and(|j| j < a.ncols)) {
            return Err(Error::ColIndexOutOfBounds {
                position: k,
                index: c,
                ncols: a.ncols,
            });
        }
    }
    Ok(())
}

fn alloc_output(nrows: usize, identity: f64) -> Result<Vec<f64>> {
    let mut y = Vec::new();
    y.try_reserve_exact(nrows)
        .map_err(|_| Error::ResourceExhausted {
            what: "output vector",
            bytes: nrows * std::mem::size_of::<f64>(),
        })?;
    y.resize(nrows, identity);
    Ok(y)
}

/// Segmented reduction of a row-sorted COO matrix against `x` under a
/// caller-supplied `reduce` with neutral element `identity`.
///
/// Each nonzero contributes `data[k] * x[col[k]]` to its row; contributions
/// within a row are combined left to right. Returns one reduced value per
/// row, `identity` for empty rows.
///
/// # Errors
/// Any violated launch precondition: mismatched lengths, unsorted or
/// out-of-bounds indices, wrong vector length, or allocation failure.
pub fn segmented_reduce_coo_f64_i64<R>(
    a: &Coo<f64, i64>,
    x: &[f64],
    identity: f64,
    reduce: R,
    cfg: &SpmvConfig,
) -> Result<Vec<f64>>
where
    R: Fn(f64, f64) -> f64 + Sync,
{
    validate_f64_i64(a, x)?;
    let nrows = a.nrows;
    let nnz = a.nnz();
    if nrows == 0 {
        return Ok(Vec::new());
    }
    let mut y = alloc_output(nrows, identity)?;
    if nnz == 0 {
        // Degenerate but legal: all-identity output, no workers launched.
        return Ok(y);
    }

    let path_len = nrows + nnz;
    let workers = cfg
        .workers
        .unwrap_or_else(|| rayon::current_num_threads().max(1) * cfg.over_subscription.max(1))
        .clamp(1, path_len);
    let diagonals = worker_diagonals(path_len, workers);
    log::debug!(
        "segmented reduce: {workers} workers over path length {path_len} ({nrows} rows, {nnz} nonzeros)"
    );

    for _ in 0..cfg.iterations.max(1) {
        y.fill(identity);
        let partials =
            reduce_regions_f64_i64(a, x, &diagonals, cfg.tile_items(), identity, &reduce, &mut y);
        if workers > 1 {
            fixup_row_partials(&partials, &mut y, cfg.fixup_tile_items(), identity, &reduce);
        }
    }
    Ok(y)
}

/// y = A @ x for COO with explicit configuration.
///
/// # Errors
/// See [`segmented_reduce_coo_f64_i64`].
pub fn spmv_coo_with_config_f64_i64(
    a: &Coo<f64, i64>,
    x: &[f64],
    cfg: &SpmvConfig,
) -> Result<Vec<f64>> {
    // For small problems, avoid the merge-path machinery unless a worker
    // count was forced.
    let small = a.nrows <= SMALL_DIM_LIMIT && a.nnz() <= SMALL_NNZ_LIMIT;
    if cfg.workers.is_none() && small {
        return spmv_coo_seq_f64_i64(a, x);
    }
    segmented_reduce_coo_f64_i64(a, x, 0.0, |u, v| u + v, cfg)
}

/// y = A @ x for COO.
///
/// # Errors
/// See [`segmented_reduce_coo_f64_i64`].
pub fn spmv_coo_f64_i64(a: &Coo<f64, i64>, x: &[f64]) -> Result<Vec<f64>> {
    spmv_coo_with_config_f64_i64(a, x, &SpmvConfig::default())
}

/// y = A @ x for COO, sequential scalar kernel.
///
/// Same contract and validation as the parallel path; used as the
/// small-problem cutover and as an independent reference in tests.
///
/// # Errors
/// See [`segmented_reduce_coo_f64_i64`].
pub fn spmv_coo_seq_f64_i64(a: &Coo<f64, i64>, x: &[f64]) -> Result<Vec<f64>> {
    validate_f64_i64(a, x)?;
    let mut y = alloc_output(a.nrows, 0.0)?;
    for k in 0..a.nnz() {
        let i = i64_to_usize(a.row[k]);
        let j = i64_to_usize(a.col[k]);
        y[i] += a.data[k] * x[j];
    }
    Ok(y)
}

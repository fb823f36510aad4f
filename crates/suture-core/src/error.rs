//! Typed failure surface for construction and kernel launch.
//!
//! Every variant is detectable before a reduction starts; the kernels never
//! validate mid-execution.

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the caller before any worker is launched.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("row/col/data must have equal length (row {row}, col {col}, data {data})")]
    LengthMismatch { row: usize, col: usize, data: usize },

    #[error("row indices must be non-decreasing (violated at position {position})")]
    RowsNotSorted { position: usize },

    #[error("row index {index} at position {position} out of bounds for {nrows} rows")]
    RowIndexOutOfBounds {
        position: usize,
        index: i64,
        nrows: usize,
    },

    #[error("column index {index} at position {position} out of bounds for {ncols} columns")]
    ColIndexOutOfBounds {
        position: usize,
        index: i64,
        ncols: usize,
    },

    #[error("vector length {got} does not match {expected} columns")]
    VectorLengthMismatch { expected: usize, got: usize },

    #[error("failed to allocate {bytes} bytes for {what}")]
    ResourceExhausted { what: &'static str, bytes: usize },
}

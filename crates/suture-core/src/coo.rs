//! Definition and constructors for the COO (Coordinate) sparse matrix format.
//
// This file provides:
// - The Coo struct for 2D sparse matrices in COO format.
// - Constructors, validation, and utility methods.
//
// COO format stores nonzero elements as parallel lists of row indices,
// column indices, and values. The reduction kernels additionally require the
// row indices to be non-decreasing, which turns the row array into an
// implicit segment description: all nonzeros of a row are contiguous.

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
#[non_exhaustive]
/// COO (Coordinate) format for 2D sparse matrices.
///
/// Stores nonzero elements as lists of row indices, column indices, and
/// values.
///
/// - `data`: values of nonzero elements (length = nnz)
/// - `row`: row indices for each nonzero (length = nnz)
/// - `col`: column indices for each nonzero (length = nnz)
/// - `nrows`: number of rows in the matrix
/// - `ncols`: number of columns in the matrix
pub struct Coo<T, I> {
    pub data: Vec<T>, // Nonzero values
    pub row: Vec<I>,  // Row indices (length = nnz)
    pub col: Vec<I>,  // Column indices (length = nnz)
    pub ncols: usize, // Number of columns
    pub nrows: usize, // Number of rows
}

impl<T, I> Coo<T, I> {
    /// Returns the number of nonzero elements (nnz).
    #[inline]
    #[must_use]
    pub const fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Returns the shape of the matrix as (nrows, ncols).
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }
}

impl Coo<f64, i64> {
    /// Constructs a `Coo<f64, i64>` from parts, with optional checking.
    ///
    /// # Arguments
    /// * `nrows` - Number of rows in the matrix
    /// * `ncols` - Number of columns in the matrix
    /// * `row` - Row indices (length = nnz)
    /// * `col` - Column indices (length = nnz)
    /// * `data` - Nonzero values (length = nnz)
    /// * `check` - If true, validate index bounds and row ordering
    ///
    /// # Errors
    /// Returns a length error when the parallel arrays disagree, and with
    /// `check` also bounds and ordering errors.
    #[inline]
    pub fn from_parts(
        nrows: usize,
        ncols: usize,
        row: Vec<i64>,
        col: Vec<i64>,
        data: Vec<f64>,
        check: bool,
    ) -> Result<Self> {
        if row.len() != data.len() || col.len() != data.len() {
            return Err(Error::LengthMismatch {
                row: row.len(),
                col: col.len(),
                data: data.len(),
            });
        }
        if check {
            let nnz = data.len();
            let mut prev = i64::MIN;
            for k in 0..nnz {
                let i = row[k];
                let j = col[k];
                if i < prev {
                    return Err(Error::RowsNotSorted { position: k });
                }
                prev = i;
                let ok_i = i >= 0 && usize::try_from(i).is_ok_and(|ii| ii < nrows);
                if !ok_i {
                    return Err(Error::RowIndexOutOfBounds {
                        position: k,
                        index: i,
                        nrows,
                    });
                }
                let ok_j = j >= 0 && usize::try_from(j).is_ok_and(|jj| jj < ncols);
                if !ok_j {
                    return Err(Error::ColIndexOutOfBounds {
                        position: k,
                        index: j,
                        ncols,
                    });
                }
            }
        }
        Ok(Self {
            data,
            row,
            col,
            ncols,
            nrows,
        })
    }

    /// Constructs a `Coo<f64, i64>` from parts without any checks.
    ///
    /// # Safety
    /// Caller must ensure inputs are valid: equal lengths, in-bounds indices,
    /// non-decreasing `row`.
    #[inline]
    #[must_use]
    pub const fn from_parts_unchecked(
        nrows: usize,
        ncols: usize,
        row: Vec<i64>,
        col: Vec<i64>,
        data: Vec<f64>,
    ) -> Self {
        Self {
            data,
            row,
            col,
            ncols,
            nrows,
        }
    }

    /// Position of the first out-of-order row index, if any.
    #[must_use]
    pub fn sorted_violation(&self) -> Option<usize> {
        let mut prev = i64::MIN;
        for (k, &r) in self.row.iter().enumerate() {
            if r < prev {
                return Some(k);
            }
            prev = r;
        }
        None
    }
}

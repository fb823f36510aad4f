//! Load-balanced COO SpMV kernels for suture (pure Rust, parallel ready)
//!
//! The product `y = A @ x` for a row-sorted COO matrix is computed as a
//! segmented reduction over the merge path of segment end-offsets and value
//! indices: every worker gets an equal share of the combined path, walks it
//! tile by tile, and rows straddling worker boundaries are stitched together
//! by a single fixup pass.
#![allow(
    clippy::missing_panics_doc,
    reason = "Performance kernels may assert on invalid input; the orchestrator entry points return typed errors instead"
)]
#![allow(
    clippy::too_many_arguments,
    reason = "Kernel entry points mirror the launch parameter lists"
)]

pub const fn init_parallel() {
    // Rayon auto-detects threads by default; users may set RAYON_NUM_THREADS.
}

pub mod config;
pub mod fixup;
pub mod path;
pub mod reduce;
pub mod scan;
pub mod spmv;
pub mod util;

pub use config::SpmvConfig;
pub use fixup::fixup_row_partials;
pub use path::{merge_path_search, worker_diagonals};
pub use reduce::{reduce_region_f64_i64, reduce_regions_f64_i64, TileScratch};
pub use scan::{combine_partials, exclusive_row_scan, inclusive_row_scan};
pub use spmv::{
    segmented_reduce_coo_f64_i64, spmv_coo_f64_i64, spmv_coo_seq_f64_i64,
    spmv_coo_with_config_f64_i64,
};

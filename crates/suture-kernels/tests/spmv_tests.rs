use suture_core::{Coo, Error};
use suture_kernels::*;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn small_coo() -> Coo<f64, i64> {
    // A = [[2,3,0],[0,0,4],[5,0,0]]
    Coo::from_parts(
        3,
        3,
        vec![0i64, 0, 1, 2],
        vec![0i64, 1, 2, 0],
        vec![2.0f64, 3.0, 4.0, 5.0],
        true,
    )
    .unwrap()
}

#[test]
fn test_empty_matrix() {
    let a = Coo::from_parts(3, 3, vec![], vec![], vec![], true).unwrap();
    let x = vec![1.0f64; 3];
    let y = spmv_coo_f64_i64(&a, &x).unwrap();
    assert_eq!(y, vec![0.0, 0.0, 0.0]);
}

#[test]
fn test_small_known_product() {
    let a = small_coo();
    let x = vec![1.0f64; 3];
    let y = spmv_coo_f64_i64(&a, &x).unwrap();
    assert!(approx_eq(y[0], 5.0) && approx_eq(y[1], 4.0) && approx_eq(y[2], 5.0));

    // Same product through the merge-path engine at several worker counts.
    for workers in [1usize, 2, 3, 4, 7] {
        let cfg = SpmvConfig::default().with_workers(workers);
        let y = spmv_coo_with_config_f64_i64(&a, &x, &cfg).unwrap();
        assert_eq!(y, vec![5.0, 4.0, 5.0], "workers = {workers}");
    }
}

#[test]
fn test_trailing_empty_row() {
    // Row 1 has no nonzeros and must come out as the identity.
    let a = Coo::from_parts(
        2,
        3,
        vec![0i64, 0, 0],
        vec![0i64, 1, 2],
        vec![1.0f64, 1.0, 1.0],
        true,
    )
    .unwrap();
    let x = vec![10.0f64, 20.0, 30.0];
    for workers in [1usize, 2, 4] {
        let cfg = SpmvConfig::default().with_workers(workers);
        let y = spmv_coo_with_config_f64_i64(&a, &x, &cfg).unwrap();
        assert_eq!(y, vec![60.0, 0.0], "workers = {workers}");
    }
}

/// 5x5 grid, 9-point stencil (all neighbours incl. diagonals and the node
/// itself). With x = 1 each output row equals the stencil degree.
#[test]
fn test_grid_stencil_degrees() {
    let side = 5usize;
    let n = side * side;
    let mut row = Vec::new();
    let mut col = Vec::new();
    let mut data = Vec::new();
    for i in 0..side {
        for j in 0..side {
            let r = i * side + j;
            for di in -1i64..=1 {
                for dj in -1i64..=1 {
                    let ni = i as i64 + di;
                    let nj = j as i64 + dj;
                    if ni >= 0 && ni < side as i64 && nj >= 0 && nj < side as i64 {
                        row.push(r as i64);
                        col.push(ni * side as i64 + nj);
                        data.push(1.0f64);
                    }
                }
            }
        }
    }
    let a = Coo::from_parts(n, n, row, col, data, true).unwrap();
    let x = vec![1.0f64; n];
    for workers in [1usize, 3, 8] {
        let cfg = SpmvConfig::default().with_workers(workers);
        let y = spmv_coo_with_config_f64_i64(&a, &x, &cfg).unwrap();
        for i in 0..side {
            for j in 0..side {
                let span_i = if i == 0 || i == side - 1 { 2 } else { 3 };
                let span_j = if j == 0 || j == side - 1 { 2 } else { 3 };
                let expected = (span_i * span_j) as f64;
                assert_eq!(y[i * side + j], expected, "node ({i},{j}), workers = {workers}");
            }
        }
    }
}

/// A single row with a million nonzeros: every worker boundary lands inside
/// the row, so the whole result is stitched from carried partials.
#[test]
fn test_single_long_row() {
    let n = 1_000_000usize;
    let a = Coo::from_parts_unchecked(1, 1, vec![0i64; n], vec![0i64; n], vec![1.0f64; n]);
    let x = vec![1.0f64];
    for workers in [1usize, 2, 64, 255] {
        let cfg = SpmvConfig::default().with_workers(workers);
        let y = spmv_coo_with_config_f64_i64(&a, &x, &cfg).unwrap();
        assert_eq!(y, vec![1_000_000.0], "workers = {workers}");
    }
}

/// One nonzero per row: half of all merge-path steps are tail flags.
#[test]
fn test_dense_tail_flags() {
    let nrows = 5000usize;
    let ncols = 16usize;
    let row: Vec<i64> = (0..nrows as i64).collect();
    let col: Vec<i64> = (0..nrows).map(|r| (r % ncols) as i64).collect();
    let data = vec![1.0f64; nrows];
    let a = Coo::from_parts(nrows, ncols, row, col, data, true).unwrap();
    let x = vec![1.0f64; ncols];
    for workers in [1usize, 13, 256] {
        let cfg = SpmvConfig::default().with_workers(workers);
        let y = spmv_coo_with_config_f64_i64(&a, &x, &cfg).unwrap();
        assert!(y.iter().all(|&v| v == 1.0), "workers = {workers}");
    }
}

/// Interleaved empty rows, including leading and trailing runs of them.
#[test]
fn test_scattered_empty_rows() {
    // Nonzeros only in rows 3, 4 and 9 of 12.
    let a = Coo::from_parts(
        12,
        2,
        vec![3i64, 3, 4, 9],
        vec![0i64, 1, 0, 1],
        vec![1.0f64, 2.0, 3.0, 4.0],
        true,
    )
    .unwrap();
    let x = vec![1.0f64, 1.0];
    for workers in [1usize, 2, 5, 16] {
        let cfg = SpmvConfig::default().with_workers(workers);
        let y = spmv_coo_with_config_f64_i64(&a, &x, &cfg).unwrap();
        let mut expected = vec![0.0f64; 12];
        expected[3] = 3.0;
        expected[4] = 3.0;
        expected[9] = 4.0;
        assert_eq!(y, expected, "workers = {workers}");
    }
}

#[test]
fn test_iterations_are_idempotent() {
    let a = small_coo();
    let x = vec![1.0f64; 3];
    let cfg = SpmvConfig::default().with_workers(2).with_iterations(3);
    let y = spmv_coo_with_config_f64_i64(&a, &x, &cfg).unwrap();
    assert_eq!(y, vec![5.0, 4.0, 5.0]);
}

#[test]
fn test_generic_reduce_max() {
    // Row-wise maximum of v * x[c] instead of the sum.
    let a = Coo::from_parts(
        3,
        2,
        vec![0i64, 0, 2],
        vec![0i64, 1, 0],
        vec![2.0f64, -3.0, 4.0],
        true,
    )
    .unwrap();
    let x = vec![1.0f64, 1.0];
    let cfg = SpmvConfig::default().with_workers(2);
    let y = segmented_reduce_coo_f64_i64(&a, &x, f64::NEG_INFINITY, f64::max, &cfg).unwrap();
    assert_eq!(y[0], 2.0);
    assert_eq!(y[1], f64::NEG_INFINITY); // empty row keeps the identity
    assert_eq!(y[2], 4.0);
}

#[test]
fn test_rejects_unsorted_rows() {
    let a = Coo::from_parts_unchecked(
        3,
        3,
        vec![1i64, 0],
        vec![0i64, 0],
        vec![1.0f64, 1.0],
    );
    let err = spmv_coo_f64_i64(&a, &[1.0, 1.0, 1.0]).unwrap_err();
    assert!(matches!(err, Error::RowsNotSorted { position: 1 }));
}

#[test]
fn test_rejects_out_of_bounds_column() {
    let a = Coo::from_parts_unchecked(2, 2, vec![0i64, 1], vec![0i64, 3], vec![1.0f64, 1.0]);
    let err = spmv_coo_f64_i64(&a, &[1.0, 1.0]).unwrap_err();
    assert!(matches!(err, Error::ColIndexOutOfBounds { index: 3, .. }));
}

#[test]
fn test_rejects_vector_length_mismatch() {
    let a = small_coo();
    let err = spmv_coo_f64_i64(&a, &[1.0, 1.0]).unwrap_err();
    assert!(matches!(
        err,
        Error::VectorLengthMismatch { expected: 3, got: 2 }
    ));
}

#[test]
fn test_sequential_kernel_matches() {
    let a = small_coo();
    let x = vec![0.5f64, -1.0, 2.0];
    let seq = spmv_coo_seq_f64_i64(&a, &x).unwrap();
    let cfg = SpmvConfig::default().with_workers(4);
    let par = spmv_coo_with_config_f64_i64(&a, &x, &cfg).unwrap();
    for (s, p) in seq.iter().zip(par.iter()) {
        assert!(approx_eq(*s, *p));
    }
}

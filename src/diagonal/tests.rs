use super::*;
use crate::BlockRegion;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Entry-wise comparison relative to the largest magnitude in `b`.
fn assert_close(a: &Matrix<f64>, b: &Matrix<f64>, tol: f64) {
    assert_eq!(a.shape(), b.shape(), "shape mismatch");
    let scale = 1.0 + b.as_slice().iter().fold(0.0_f64, |m, y| m.max(y.abs()));
    for (k, (&x, &y)) in a.as_slice().iter().zip(b.as_slice()).enumerate() {
        assert!(
            (x - y).abs() <= tol * scale,
            "entry {} differs: {} vs {} (tol = {})",
            k,
            x,
            y,
            tol
        );
    }
}

fn random(rng: &mut ChaCha8Rng, rows: usize, cols: usize) -> Matrix<f64> {
    Matrix::from_fn(rows, cols, |_, _| rng.gen_range(-50.0..50.0))
}

/// `n x m` diagonal matrix and the compact vector of its first `min(n, m)`
/// entries, padded to `n` with zeros.
fn random_diagonal(rng: &mut ChaCha8Rng, n: usize, m: usize) -> (Matrix<f64>, Matrix<f64>) {
    let mut full = Matrix::zeros(n, m);
    let mut compact = Matrix::zeros(n, 1);
    for i in 0..n.min(m) {
        let v = rng.gen_range(-50.0..50.0);
        full[(i, i)] = v;
        compact[(i, 0)] = v;
    }
    (full, compact)
}

fn naive(a: &Matrix<f64>, b: &Matrix<f64>) -> Matrix<f64> {
    Matrix::from_fn(a.nrows(), b.ncols(), |i, j| {
        (0..a.ncols()).map(|p| a[(i, p)] * b[(p, j)]).sum()
    })
}

fn transposed(a: &Matrix<f64>) -> Matrix<f64> {
    Matrix::from_fn(a.ncols(), a.nrows(), |i, j| a[(j, i)])
}

const TOL: f64 = 1e-10;

// ── Scenarios ───────────────────────────────────────────────────────

#[test]
fn compact_pre_mult_scales_rows() {
    let d = Matrix::column(&[2.0, 3.0, 4.0]);
    let b = Matrix::from_rows(3, 2, &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
    let mut c = Matrix::zeros(3, 2);
    pre_mult(&Diagonal::Compact(&d), &b, &mut c).unwrap();
    assert_eq!(c, Matrix::from_rows(3, 2, &[2.0, 2.0, 6.0, 6.0, 12.0, 12.0]));

    let full = Matrix::from_fn(3, 3, |i, j| if i == j { d[(i, 0)] } else { 0.0 });
    let mut c_full = Matrix::zeros(3, 2);
    pre_mult(&Diagonal::Full(&full), &b, &mut c_full).unwrap();
    assert_eq!(c, c_full);
}

#[test]
fn rectangular_full_pads_with_zero_rows() {
    let full = Matrix::from_rows(3, 2, &[2.0, 0.0, 0.0, 3.0, 0.0, 0.0]);
    let b = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    let mut c = Matrix::filled(3, 2, 9.0);
    pre_mult(&Diagonal::Full(&full), &b, &mut c).unwrap();
    assert_eq!(c.as_slice(), &[2.0, 4.0, 9.0, 12.0, 0.0, 0.0]);

    // The compact form of the same operator has three entries.
    let compact = Matrix::column(&[2.0, 3.0, 0.0]);
    let mut c2 = Matrix::filled(3, 2, 9.0);
    assert!(pre_mult(&Diagonal::Compact(&compact), &b, &mut c2).is_ok());
    assert_eq!(c, c2);
}

#[test]
fn shape_errors_leave_output_untouched() {
    let full = Matrix::<f64>::identity(3);
    let b = Matrix::<f64>::zeros(2, 2);
    let mut c = Matrix::filled(3, 2, 1.0);
    assert_eq!(
        pre_mult(&Diagonal::Full(&full), &b, &mut c),
        Err(MatrixError::DimensionMismatch {
            op: "pre_mult",
            expected: (3, 2),
            got: (2, 2),
        })
    );
    let not_column = Matrix::<f64>::zeros(3, 2);
    assert!(pre_mult(&Diagonal::Compact(&not_column), &b, &mut c).is_err());
    assert!(post_mult(&b, &Diagonal::Full(&full), &mut c).is_err());
    assert!(c.as_slice().iter().all(|&x| x == 1.0));
}

#[test]
fn uniform_matches_scale() {
    let b = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let mut c = Matrix::zeros(2, 3);
    pre_mult(&Diagonal::Uniform(0.5), &b, &mut c).unwrap();
    assert_eq!(c.as_slice(), &[0.5, 1.0, 1.5, 2.0, 2.5, 3.0]);
    post_mult(&b, &Diagonal::Uniform(2.0), &mut c).unwrap();
    assert_eq!(c.as_slice(), &[2.0, 4.0, 6.0, 8.0, 10.0, 12.0]);
}

#[test]
fn zero_size_block_ops_are_noops() {
    let mut dest = Matrix::filled(2, 2, 4.0);
    let before = dest.clone();
    let b = Matrix::<f64>::zeros(0, 3);
    let d = Matrix::<f64>::zeros(0, 1);
    pre_mult_add_block(&Diagonal::Compact(&d), &b, &mut dest, 5, 5).unwrap();
    pre_mult_add_block(&Diagonal::Uniform(1.0), &Matrix::zeros(2, 0), &mut dest, 9, 9)
        .unwrap();

    // Offsets past the destination are fine when the block is empty.
    let empty_cols = Matrix::<f64>::zeros(4, 0);
    let empty_rows = Matrix::<f64>::zeros(0, 4);
    mult_add_block_inner(&empty_cols, &Diagonal::Uniform(1.0), &mut dest, 5, 5).unwrap();
    mult_add_block_inner_scaled(2.0, &empty_cols, &Diagonal::Uniform(1.0), &mut dest, 5, 5)
        .unwrap();
    mult_add_block_outer(&empty_rows, &Diagonal::Uniform(1.0), &mut dest, 5, 5).unwrap();
    mult_add_block_outer_scaled(2.0, &empty_rows, &Diagonal::Uniform(1.0), &mut dest, 5, 5)
        .unwrap();
    inner_diagonal_mult_add_block_trans_a(
        &empty_cols,
        &Diagonal::Uniform(1.0),
        &Matrix::zeros(4, 2),
        &mut dest,
        7,
        7,
    )
    .unwrap();
    assert_eq!(dest, before);

    // A non-empty block at the same offset is still rejected.
    let b = Matrix::<f64>::zeros(4, 1);
    assert!(mult_add_block_inner(&b, &Diagonal::Uniform(1.0), &mut dest, 5, 5).is_err());
}

#[test]
fn zero_weight_does_not_hide_nan() {
    let a = Matrix::from_rows(1, 2, &[0.0, 1.0]);
    let b = Matrix::from_rows(2, 1, &[f64::NAN, 1.0]);
    let mut c = Matrix::zeros(1, 1);
    inner_diagonal_mult(&a, &Diagonal::Uniform(1.0), &b, &mut c).unwrap();
    assert!(c.contains_nan());

    // A zero diagonal entry against a NaN row
    let w = Matrix::column(&[0.0, 1.0]);
    let a = Matrix::from_rows(2, 1, &[1.0, 1.0]);
    let mut dest = Matrix::zeros(2, 2);
    inner_diagonal_mult_add_block_trans_a_scaled(1.0, &a, &Diagonal::Compact(&w), &b, &mut dest, 1, 1)
        .unwrap();
    assert!(dest[(1, 1)].is_nan());
    assert_eq!(dest[(0, 0)], 0.0);

    let mut c = Matrix::zeros(1, 1);
    inner_diagonal_mult_trans_a(&a, &Diagonal::Compact(&w), &b, &mut c).unwrap();
    assert!(c.contains_nan());
}

#[test]
fn invert() {
    let d = Matrix::from_rows(2, 3, &[4.0, 7.0, 0.0, 1.0, -2.0, 5.0]);
    let mut out = Matrix::zeros(0, 0);
    invert_diagonal(&d, &mut out);
    assert_eq!(out.as_slice(), &[0.25, 0.0, 0.0, 0.0, -0.5, 0.0]);

    let mut inplace = d.clone();
    invert_diagonal_in_place(&mut inplace);
    assert_eq!(inplace, out);
}

// ── Randomized equivalence ──────────────────────────────────────────

#[test]
fn random_pre_mult_full_compact_naive() {
    let mut rng = ChaCha8Rng::seed_from_u64(124);
    for _ in 0..40 {
        let n = rng.gen_range(1..60);
        let m = rng.gen_range(1..60);
        let cols = rng.gen_range(1..60);
        let (full, compact) = random_diagonal(&mut rng, n, m);
        let b = random(&mut rng, m, cols);

        let mut c_full = Matrix::zeros(n, cols);
        let mut c_compact = Matrix::zeros(n, cols);
        pre_mult(&Diagonal::Full(&full), &b, &mut c_full).unwrap();
        pre_mult(&Diagonal::Compact(&compact), &b, &mut c_compact).unwrap();

        assert_eq!(c_full, c_compact);
        assert_close(&c_full, &naive(&full, &b), TOL);
    }
}

#[test]
fn random_post_mult_full_compact_naive() {
    let mut rng = ChaCha8Rng::seed_from_u64(125);
    for _ in 0..40 {
        let rows = rng.gen_range(1..60);
        let m = rng.gen_range(1..60);
        let n = rng.gen_range(1..60);
        let (full, compact) = random_diagonal(&mut rng, m, n);
        let b = random(&mut rng, rows, m);

        let mut c_full = Matrix::zeros(rows, n);
        let mut c_compact = Matrix::zeros(rows, n);
        post_mult(&b, &Diagonal::Full(&full), &mut c_full).unwrap();
        post_mult(&b, &Diagonal::Compact(&compact), &mut c_compact).unwrap();

        assert_eq!(c_full, c_compact);
        assert_close(&c_full, &naive(&b, &full), TOL);
    }
}

#[test]
fn random_post_mult_trans_a() {
    let mut rng = ChaCha8Rng::seed_from_u64(126);
    for _ in 0..40 {
        let lead = rng.gen_range(1..60);
        let m = rng.gen_range(1..60);
        let n = rng.gen_range(1..60);
        let (full, compact) = random_diagonal(&mut rng, m, n);
        let a = random(&mut rng, m, lead);

        let mut c_full = Matrix::zeros(lead, n);
        let mut c_compact = Matrix::zeros(lead, n);
        post_mult_trans_a(&a, &Diagonal::Full(&full), &mut c_full).unwrap();
        post_mult_trans_a(&a, &Diagonal::Compact(&compact), &mut c_compact).unwrap();

        assert_eq!(c_full, c_compact);
        assert_close(&c_full, &naive(&transposed(&a), &full), TOL);
    }
}

#[test]
fn random_pre_mult_add_block() {
    let mut rng = ChaCha8Rng::seed_from_u64(127);
    for _ in 0..40 {
        let n = rng.gen_range(1..40);
        let cols = rng.gen_range(1..40);
        let full_rows = rng.gen_range(n..80);
        let full_cols = rng.gen_range(cols..80);
        let row = rng.gen_range(0..=full_rows - n);
        let col = rng.gen_range(0..=full_cols - cols);
        let scale = rng.gen_range(-10.0..10.0);

        let (full, compact) = random_diagonal(&mut rng, n, n);
        let b = random(&mut rng, n, cols);
        let base = random(&mut rng, full_rows, full_cols);

        let mut expected = base.clone();
        expected
            .add_block(BlockRegion::new(row, col, 0, 0, n, cols), &naive(&full, &b), scale)
            .unwrap();

        let mut got_full = base.clone();
        let mut got_compact = base.clone();
        pre_mult_add_block_scaled(scale, &Diagonal::Full(&full), &b, &mut got_full, row, col)
            .unwrap();
        pre_mult_add_block_scaled(
            scale,
            &Diagonal::Compact(&compact),
            &b,
            &mut got_compact,
            row,
            col,
        )
        .unwrap();

        assert_eq!(got_full, got_compact);
        assert_close(&got_full, &expected, TOL);
    }
}

#[test]
fn random_inner_diagonal_products() {
    let mut rng = ChaCha8Rng::seed_from_u64(128);
    for _ in 0..30 {
        let task = rng.gen_range(1..50);
        let rows = rng.gen_range(1..50);
        let cols = rng.gen_range(1..50);
        let (full, compact) = random_diagonal(&mut rng, task, task);

        // a * D * b
        let a = random(&mut rng, rows, task);
        let b = random(&mut rng, task, cols);
        let expected = naive(&naive(&a, &full), &b);
        let mut c = Matrix::zeros(rows, cols);
        inner_diagonal_mult(&a, &Diagonal::Full(&full), &b, &mut c).unwrap();
        assert_close(&c, &expected, TOL);
        inner_diagonal_mult(&a, &Diagonal::Compact(&compact), &b, &mut c).unwrap();
        assert_close(&c, &expected, TOL);

        // aᵀ * D * b
        let at = transposed(&a);
        let mut c = Matrix::zeros(rows, cols);
        inner_diagonal_mult_trans_a(&at, &Diagonal::Compact(&compact), &b, &mut c).unwrap();
        assert_close(&c, &expected, TOL);
        inner_diagonal_mult_add_trans_a(&at, &Diagonal::Full(&full), &b, &mut c).unwrap();
        let mut doubled = expected.clone();
        doubled.scale_in_place(2.0);
        assert_close(&c, &doubled, TOL);
    }
}

#[test]
fn random_inner_diagonal_add_block_trans_a() {
    let mut rng = ChaCha8Rng::seed_from_u64(129);
    for _ in 0..30 {
        let task = rng.gen_range(1..40);
        let rows = rng.gen_range(1..40);
        let cols = rng.gen_range(1..40);
        let full_rows = rng.gen_range(rows..90);
        let full_cols = rng.gen_range(cols..90);
        let row = rng.gen_range(0..=full_rows - rows);
        let col = rng.gen_range(0..=full_cols - cols);
        let scale = rng.gen_range(0.0..100.0);

        let (full, compact) = random_diagonal(&mut rng, task, task);
        let a = random(&mut rng, task, rows);
        let b = random(&mut rng, task, cols);
        let base = random(&mut rng, full_rows, full_cols);

        let product = naive(&naive(&transposed(&a), &full), &b);
        let mut expected = base.clone();
        expected
            .add_block(BlockRegion::new(row, col, 0, 0, rows, cols), &product, scale)
            .unwrap();

        let mut got_full = base.clone();
        let mut got_compact = base.clone();
        inner_diagonal_mult_add_block_trans_a_scaled(
            scale,
            &a,
            &Diagonal::Full(&full),
            &b,
            &mut got_full,
            row,
            col,
        )
        .unwrap();
        inner_diagonal_mult_add_block_trans_a_scaled(
            scale,
            &a,
            &Diagonal::Compact(&compact),
            &b,
            &mut got_compact,
            row,
            col,
        )
        .unwrap();
        assert_close(&got_full, &expected, TOL);
        assert_eq!(got_full, got_compact);

        let mut unscaled = base.clone();
        inner_diagonal_mult_add_block_trans_a(&a, &Diagonal::Compact(&compact), &b, &mut unscaled, row, col)
            .unwrap();
        let mut expected = base.clone();
        expected
            .add_block(BlockRegion::new(row, col, 0, 0, rows, cols), &product, 1.0)
            .unwrap();
        assert_close(&unscaled, &expected, TOL);
    }
}

#[test]
fn random_mult_add_inner_scaled_all_weights() {
    let mut rng = ChaCha8Rng::seed_from_u64(130);
    for _ in 0..12 {
        let m = rng.gen_range(1..=100);
        let n = rng.gen_range(1..=100);
        let scale = rng.gen_range(-5.0..5.0);
        let b = random(&mut rng, m, n);
        let (full, compact) = random_diagonal(&mut rng, m, m);
        let uniform = rng.gen_range(0.1..10.0);
        let base = random(&mut rng, n, n);
        let bt = transposed(&b);

        let weighted = naive(&naive(&bt, &full), &b);
        let mut expected = base.clone();
        expected
            .add_block(BlockRegion::whole(&weighted, 0, 0), &weighted, scale)
            .unwrap();

        let mut got_full = base.clone();
        let mut got_compact = base.clone();
        mult_add_inner_scaled(scale, &b, &Diagonal::Full(&full), &mut got_full).unwrap();
        mult_add_inner_scaled(scale, &b, &Diagonal::Compact(&compact), &mut got_compact)
            .unwrap();
        assert_close(&got_full, &expected, 1e-9);
        assert_eq!(got_full, got_compact);

        let plain = naive(&bt, &b);
        let mut expected = base.clone();
        expected
            .add_block(BlockRegion::whole(&plain, 0, 0), &plain, scale * uniform)
            .unwrap();
        let mut got = base.clone();
        mult_add_inner_scaled(scale, &b, &Diagonal::Uniform(uniform), &mut got).unwrap();
        assert_close(&got, &expected, 1e-9);
    }
}

#[test]
fn random_inner_and_outer_are_symmetric() {
    let mut rng = ChaCha8Rng::seed_from_u64(131);
    for _ in 0..20 {
        let m = rng.gen_range(1..50);
        let n = rng.gen_range(1..50);
        let b = random(&mut rng, m, n);
        let (full_m, compact_m) = random_diagonal(&mut rng, m, m);
        let (full_n, compact_n) = random_diagonal(&mut rng, n, n);

        let mut inner_full = Matrix::zeros(n, n);
        let mut inner_compact = Matrix::zeros(n, n);
        mult_inner(&b, &Diagonal::Full(&full_m), &mut inner_full).unwrap();
        mult_inner(&b, &Diagonal::Compact(&compact_m), &mut inner_compact).unwrap();
        assert_eq!(inner_full, inner_compact);
        assert_eq!(inner_full, transposed(&inner_full));
        assert_close(&inner_full, &naive(&naive(&transposed(&b), &full_m), &b), TOL);

        let mut outer_full = Matrix::zeros(m, m);
        let mut outer_compact = Matrix::zeros(m, m);
        mult_outer(&b, &Diagonal::Full(&full_n), &mut outer_full).unwrap();
        mult_outer(&b, &Diagonal::Compact(&compact_n), &mut outer_compact).unwrap();
        assert_eq!(outer_full, outer_compact);
        assert_eq!(outer_full, transposed(&outer_full));
        assert_close(&outer_full, &naive(&naive(&b, &full_n), &transposed(&b)), TOL);
    }
}

#[test]
fn random_block_inner_outer() {
    let mut rng = ChaCha8Rng::seed_from_u64(132);
    for _ in 0..20 {
        let m = rng.gen_range(1..30);
        let n = rng.gen_range(1..30);
        let size = m.max(n) + rng.gen_range(0..20);
        let row = rng.gen_range(0..=size - n);
        let col = rng.gen_range(0..=size - n);
        let b = random(&mut rng, m, n);
        let (_, w) = random_diagonal(&mut rng, m, m);
        let base = random(&mut rng, size, size);

        let mut inner = Matrix::zeros(n, n);
        mult_inner(&b, &Diagonal::Compact(&w), &mut inner).unwrap();
        let mut expected = base.clone();
        expected
            .add_block(BlockRegion::whole(&inner, row, col), &inner, 1.0)
            .unwrap();
        let mut got = base.clone();
        mult_add_block_inner(&b, &Diagonal::Compact(&w), &mut got, row, col).unwrap();
        assert_close(&got, &expected, TOL);

        let mut expected = base.clone();
        expected
            .add_block(BlockRegion::whole(&inner, row, col), &inner, 3.0)
            .unwrap();
        let mut got = base.clone();
        mult_add_block_inner_scaled(3.0, &b, &Diagonal::Compact(&w), &mut got, row, col)
            .unwrap();
        assert_close(&got, &expected, TOL);

        let bt = transposed(&b);
        let mut outer = Matrix::zeros(n, n);
        mult_outer(&bt, &Diagonal::Compact(&w), &mut outer).unwrap();
        assert_close(&outer, &inner, TOL);
        let mut got = base.clone();
        mult_add_outer(&bt, &Diagonal::Compact(&w), &mut Matrix::zeros(n, n)).unwrap();
        mult_add_block_outer(&bt, &Diagonal::Compact(&w), &mut got, row, col).unwrap();
        let mut expected = base.clone();
        expected
            .add_block(BlockRegion::whole(&outer, row, col), &outer, 1.0)
            .unwrap();
        assert_close(&got, &expected, TOL);
    }
}

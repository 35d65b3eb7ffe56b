use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use structmat::{diagonal, Diagonal, Matrix};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn jacobian(rows: usize, cols: usize) -> Matrix<f64> {
    Matrix::from_fn(rows, cols, |i, j| ((i * 7 + j * 3) % 11) as f64 - 5.0)
}

fn weights(n: usize) -> Matrix<f64> {
    Matrix::from_fn(n, 1, |i, _| 1.0 + (i % 4) as f64)
}

fn full_from_compact(w: &Matrix<f64>) -> Matrix<f64> {
    let n = w.nrows();
    Matrix::from_fn(n, n, |i, j| if i == j { w[(i, 0)] } else { 0.0 })
}

// ---------------------------------------------------------------------------
// Symmetric inner product vs. general products
// ---------------------------------------------------------------------------

fn inner_product(c: &mut Criterion) {
    let mut g = c.benchmark_group("inner_product");

    for &n in &[6usize, 30, 100] {
        let b = jacobian(n, n);
        let w = weights(n);
        let w_full = full_from_compact(&w);

        g.bench_with_input(BenchmarkId::new("mult_inner", n), &n, |bench, &n| {
            let mut out = Matrix::zeros(n, n);
            bench.iter(|| {
                diagonal::mult_inner(
                    std::hint::black_box(&b),
                    &Diagonal::Compact(&w),
                    &mut out,
                )
                .unwrap()
            })
        });

        g.bench_with_input(BenchmarkId::new("mult_quad", n), &n, |bench, &n| {
            let mut out = Matrix::zeros(n, n);
            let mut tmp = Matrix::zeros(n, n);
            bench.iter(|| out.mult_quad(std::hint::black_box(&b), &w_full, &mut tmp).unwrap())
        });

        g.bench_with_input(BenchmarkId::new("two_gemm", n), &n, |bench, &n| {
            let mut out = Matrix::zeros(n, n);
            let mut tmp = Matrix::zeros(n, n);
            bench.iter(|| {
                tmp.mult(&w_full, std::hint::black_box(&b)).unwrap();
                out.mult_trans_a(&b, &tmp).unwrap();
            })
        });
    }

    g.finish();
}

// ---------------------------------------------------------------------------
// Diagonal pre-multiplication: storage forms
// ---------------------------------------------------------------------------

fn pre_mult(c: &mut Criterion) {
    let mut g = c.benchmark_group("pre_mult");

    for &n in &[6usize, 30, 100] {
        let b = jacobian(n, n);
        let w = weights(n);
        let w_full = full_from_compact(&w);

        g.bench_with_input(BenchmarkId::new("full", n), &n, |bench, &n| {
            let mut out = Matrix::zeros(n, n);
            bench.iter(|| {
                diagonal::pre_mult(&Diagonal::Full(&w_full), std::hint::black_box(&b), &mut out)
                    .unwrap()
            })
        });

        g.bench_with_input(BenchmarkId::new("compact", n), &n, |bench, &n| {
            let mut out = Matrix::zeros(n, n);
            bench.iter(|| {
                diagonal::pre_mult(&Diagonal::Compact(&w), std::hint::black_box(&b), &mut out)
                    .unwrap()
            })
        });

        g.bench_with_input(BenchmarkId::new("dense_gemm", n), &n, |bench, &n| {
            let mut out = Matrix::zeros(n, n);
            bench.iter(|| out.mult(&w_full, std::hint::black_box(&b)).unwrap())
        });
    }

    g.finish();
}

criterion_group!(benches, inner_product, pre_mult);
criterion_main!(benches);

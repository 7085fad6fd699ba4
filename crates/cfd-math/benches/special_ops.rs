//! Criterion benchmarks for `cfd-math`.
//!
//! Kernels that sit under every CDF and estimator evaluation.

use cfd_math::{beta_reg, digamma, gamma_p, gamma_q, log_gamma};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_incomplete_gamma(c: &mut Criterion) {
    let mut group = c.benchmark_group("incomplete_gamma");

    // Series branch (x < a+1) and continued-fraction branch (x >= a+1).
    for (name, a, x) in [
        ("series_small", 0.5, 0.5),
        ("series_large", 40.0, 30.0),
        ("cf_small", 2.0, 9.0),
        ("cf_large", 40.0, 60.0),
    ] {
        group.bench_with_input(BenchmarkId::new("gamma_p", name), &(a, x), |b, &(a, x)| {
            b.iter(|| black_box(gamma_p(black_box(a), black_box(x))));
        });
        group.bench_with_input(BenchmarkId::new("gamma_q", name), &(a, x), |b, &(a, x)| {
            b.iter(|| black_box(gamma_q(black_box(a), black_box(x))));
        });
    }

    group.finish();
}

fn bench_beta_and_polygamma(c: &mut Criterion) {
    let mut group = c.benchmark_group("beta_polygamma");

    for (name, x, a, b) in [
        ("negbin_typical", 0.6, 10.0, 7.0),
        ("skewed", 0.05, 0.5, 30.0),
    ] {
        group.bench_with_input(BenchmarkId::new("beta_reg", name), &(x, a, b), |bch, &(x, a, b)| {
            bch.iter(|| black_box(beta_reg(black_box(x), black_box(a), black_box(b))));
        });
    }

    group.bench_function("log_gamma", |b| b.iter(|| black_box(log_gamma(black_box(7.3)))));
    group.bench_function("digamma", |b| b.iter(|| black_box(digamma(black_box(0.8)))));

    group.finish();
}

criterion_group!(benches, bench_incomplete_gamma, bench_beta_and_polygamma);
criterion_main!(benches);

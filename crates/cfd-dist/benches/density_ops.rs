//! Criterion benchmarks for `cfd-dist`.
//!
//! Per-point evaluation cost of each family, domain enumeration for the
//! discrete families, and a small EM fit.

use cfd_dist::{
    ChiSquare, DiscreteSupport, GaussianMixtureConfig, GaussianMixtureFitter, MultivariateGaussian,
    NegativeBinomial, Pareto, Poisson, Sampler, Uniform, Univariate,
    UnivariateDistribution,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn families() -> Vec<(&'static str, UnivariateDistribution)> {
    vec![
        ("chi_square", ChiSquare::new(4.0).unwrap().into()),
        ("negative_binomial", NegativeBinomial::new(10.0, 0.4).unwrap().into()),
        ("pareto", Pareto::new(3.0, 2.0, 0.0).unwrap().into()),
        ("poisson", Poisson::new(2.0).unwrap().into()),
        ("uniform", Uniform::new(0.0, 10.0).unwrap().into()),
    ]
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    for (name, dist) in families() {
        group.bench_with_input(BenchmarkId::new("pdf", name), &dist, |b, d| {
            b.iter(|| black_box(d.pdf_at(black_box(6.0))));
        });
        group.bench_with_input(BenchmarkId::new("cdf", name), &dist, |b, d| {
            b.iter(|| black_box(d.cdf_at(black_box(6.0))));
        });
    }
    group.finish();
}

fn bench_domain(c: &mut Criterion) {
    let mut group = c.benchmark_group("domain");
    for rate in [2.0, 50.0, 1000.0] {
        let cdf = Poisson::new(rate).unwrap().cdf();
        group.bench_with_input(BenchmarkId::new("poisson", rate), &cdf, |b, cdf| {
            b.iter(|| black_box(cdf.domain()));
        });
    }
    let cdf = NegativeBinomial::new(10.0, 0.4).unwrap().cdf();
    group.bench_function("negative_binomial", |b| {
        b.iter(|| black_box(cdf.domain()));
    });
    group.finish();
}

fn bench_em(c: &mut Criterion) {
    let truth = MultivariateGaussian::isotropic(vec![0.0, 0.0], 1.0).unwrap();
    let shifted = MultivariateGaussian::isotropic(vec![5.0, 5.0], 1.0).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let mut data = truth.sample_n(&mut rng, 250).unwrap();
    data.extend(shifted.sample_n(&mut rng, 250).unwrap());
    let fitter = GaussianMixtureFitter::new(GaussianMixtureConfig::with_components(2));

    c.bench_function("em_two_components_500", |b| {
        b.iter(|| black_box(fitter.fit(black_box(&data)).unwrap()));
    });
}

criterion_group!(benches, bench_evaluate, bench_domain, bench_em);
criterion_main!(benches);

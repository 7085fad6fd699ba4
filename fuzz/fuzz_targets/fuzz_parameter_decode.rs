//! Fuzz target for parameter-vector decoding.
//!
//! Arbitrary vectors either decode into a valid distribution or leave the
//! target untouched. Accepted distributions never yield a negative density
//! or a CDF outside [0, 1].

#![no_main]

use arbitrary::Arbitrary;
use cfd_dist::{Family, ParameterVector, Parameterized, UnivariateDistribution};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    family: u8,
    values: Vec<f64>,
    x: f64,
}

fuzz_target!(|input: Input| {
    let family = Family::ALL[input.family as usize % Family::ALL.len()];
    let mut dist = UnivariateDistribution::default_for(family);
    let before = dist;
    let vector = ParameterVector::from(input.values);
    if dist.decode(Some(&vector)).is_err() {
        assert_eq!(dist, before);
        return;
    }
    if input.x.is_nan() {
        return;
    }
    let pdf = dist.pdf_at(input.x);
    assert!(pdf.is_nan() || pdf >= 0.0, "pdf {pdf} for {dist:?}");
    let cdf = dist.cdf_at(input.x);
    assert!(cdf.is_nan() || (0.0..=1.0).contains(&cdf), "cdf {cdf} for {dist:?}");
});

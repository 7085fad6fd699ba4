//! Negative binomial distribution NB(r, p) over {0, 1, 2, ...}.
//!
//! `p` is the per-trial probability of the counted outcome and `r` the
//! (real-valued) stopping size:
//!
//! ```text
//! P(K = k) = Γ(k + r) / (Γ(r) k!) · (1 - p)^r · p^k
//! P(K <= k) = I_{1-p}(r, k + 1)
//! ```
//!
//! `p = 0` is a point mass at zero; `p = 1` carries no finite mass.

use cfd_math::{beta_reg, log_gamma};
use rand::RngCore;
use rand_distr::{Distribution as _, Gamma, Poisson};
use serde::Serialize;

use crate::density::{DiscreteSupport, ProbabilityFunction, Sampler, Univariate};
use crate::domain::IntegerDomain;
use crate::error::{ensure_positive, DistError, Result};
use crate::vector::{ParameterVector, Parameterized};

fn valid_params(r: f64, p: f64) -> bool {
    r.is_finite() && r > 0.0 && (0.0..=1.0).contains(&p)
}

fn ensure_probability(p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(DistError::invalid("p", p, "must lie in [0, 1]"))
    }
}

/// Negative binomial mass at `k`. Zero for negative or non-integer `k`.
pub fn negative_binomial_pmf(k: f64, r: f64, p: f64) -> f64 {
    if k.is_nan() || !valid_params(r, p) {
        return f64::NAN;
    }
    if k < 0.0 || k.fract() != 0.0 || k.is_infinite() {
        return 0.0;
    }
    if p == 0.0 {
        return if k == 0.0 { 1.0 } else { 0.0 };
    }
    if p == 1.0 {
        return 0.0;
    }
    let log_coeff = log_gamma(k + r) - log_gamma(r) - log_gamma(k + 1.0);
    (log_coeff + r * (-p).ln_1p() + k * p.ln()).exp()
}

/// Negative binomial CDF at `x`, evaluated at `floor(x)`.
pub fn negative_binomial_cdf(x: f64, r: f64, p: f64) -> f64 {
    if x.is_nan() || !valid_params(r, p) {
        return f64::NAN;
    }
    if x < 0.0 {
        return 0.0;
    }
    if p == 0.0 {
        return 1.0;
    }
    if p == 1.0 {
        return 0.0;
    }
    if x.is_infinite() {
        return 1.0;
    }
    beta_reg(1.0 - p, r, x.floor() + 1.0)
}

/// Negative binomial distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NegativeBinomial {
    r: f64,
    p: f64,
}

impl NegativeBinomial {
    pub const ARITY: usize = 2;
    pub const DEFAULT_R: f64 = 1.0;
    pub const DEFAULT_P: f64 = 0.5;

    pub fn new(r: f64, p: f64) -> Result<Self> {
        ensure_positive("r", r)?;
        ensure_probability(p)?;
        Ok(Self { r, p })
    }

    pub fn r(&self) -> f64 {
        self.r
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn set_r(&mut self, r: f64) -> Result<()> {
        ensure_positive("r", r)?;
        self.r = r;
        Ok(())
    }

    pub fn set_p(&mut self, p: f64) -> Result<()> {
        ensure_probability(p)?;
        self.p = p;
        Ok(())
    }
}

impl Default for NegativeBinomial {
    fn default() -> Self {
        Self {
            r: Self::DEFAULT_R,
            p: Self::DEFAULT_P,
        }
    }
}

/// Mass-function view over a snapshot of [`NegativeBinomial`] parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NegativeBinomialPmf {
    r: f64,
    p: f64,
}

impl ProbabilityFunction for NegativeBinomialPmf {
    fn evaluate(&self, x: f64) -> f64 {
        negative_binomial_pmf(x, self.r, self.p)
    }
}

/// CDF view over a snapshot of [`NegativeBinomial`] parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NegativeBinomialCdf {
    r: f64,
    p: f64,
}

impl ProbabilityFunction for NegativeBinomialCdf {
    fn evaluate(&self, x: f64) -> f64 {
        negative_binomial_cdf(x, self.r, self.p)
    }
}

impl DiscreteSupport for NegativeBinomialCdf {
    fn domain(&self) -> IntegerDomain {
        IntegerDomain::from_cdf(|k| self.evaluate(k as f64))
    }
}

impl Parameterized for NegativeBinomial {
    fn arity(&self) -> usize {
        Self::ARITY
    }

    fn parameters(&self) -> ParameterVector {
        ParameterVector::from([self.r, self.p])
    }

    fn apply_parameters(&mut self, values: &[f64]) -> Result<()> {
        let &[r, p] = values else {
            return Err(DistError::VectorLength {
                expected: Self::ARITY,
                actual: values.len(),
            });
        };
        *self = Self::new(r, p)?;
        Ok(())
    }
}

impl Sampler for NegativeBinomial {
    type Output = f64;

    /// Gamma-Poisson mixture: λ ~ Gamma(r, scale p/(1-p)), K ~ Poisson(λ).
    fn sample(&self, rng: &mut dyn RngCore) -> Result<f64> {
        if self.p == 0.0 {
            return Ok(0.0);
        }
        if self.p == 1.0 {
            return Err(DistError::Sampling(
                "negative binomial with p = 1 has no finite outcomes".to_string(),
            ));
        }
        let scale = self.p / (1.0 - self.p);
        let gamma = Gamma::new(self.r, scale).map_err(|e| DistError::Sampling(e.to_string()))?;
        let lambda: f64 = gamma.sample(rng);
        if lambda <= 0.0 {
            return Ok(0.0);
        }
        let poisson = Poisson::new(lambda).map_err(|e| DistError::Sampling(e.to_string()))?;
        Ok(poisson.sample(rng))
    }
}

impl Univariate for NegativeBinomial {
    type Pdf = NegativeBinomialPmf;
    type Cdf = NegativeBinomialCdf;

    fn pdf(&self) -> NegativeBinomialPmf {
        NegativeBinomialPmf {
            r: self.r,
            p: self.p,
        }
    }

    fn cdf(&self) -> NegativeBinomialCdf {
        NegativeBinomialCdf {
            r: self.r,
            p: self.p,
        }
    }

    fn mean(&self) -> f64 {
        if self.p == 1.0 {
            return f64::INFINITY;
        }
        self.r * self.p / (1.0 - self.p)
    }

    fn variance(&self) -> f64 {
        if self.p == 1.0 {
            return f64::INFINITY;
        }
        let q = 1.0 - self.p;
        self.r * self.p / (q * q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn integer_r_matches_binomial_coefficient() {
        // C(15, 6) * 0.6^10 * 0.4^6
        let expected = 5005.0 * 0.6f64.powi(10) * 0.4f64.powi(6);
        assert!(approx_eq(negative_binomial_pmf(6.0, 10.0, 0.4), expected, 1e-12));
    }

    #[test]
    fn cdf_is_cumulative_pmf() {
        let (r, p) = (2.5, 0.3);
        let mut total = 0.0;
        for k in 0..20 {
            total += negative_binomial_pmf(k as f64, r, p);
            assert!(approx_eq(negative_binomial_cdf(k as f64, r, p), total, 1e-12));
        }
        assert_eq!(
            negative_binomial_cdf(3.7, r, p),
            negative_binomial_cdf(3.0, r, p)
        );
    }

    #[test]
    fn non_integer_and_negative_points_have_no_mass() {
        assert_eq!(negative_binomial_pmf(1.5, 3.0, 0.5), 0.0);
        assert_eq!(negative_binomial_pmf(-1.0, 3.0, 0.5), 0.0);
        assert_eq!(negative_binomial_cdf(-0.5, 3.0, 0.5), 0.0);
    }

    #[test]
    fn degenerate_probabilities() {
        let zero = NegativeBinomial::new(4.0, 0.0).unwrap();
        assert_eq!(zero.pdf().evaluate(0.0), 1.0);
        assert_eq!(zero.pdf().evaluate(1.0), 0.0);
        assert_eq!(zero.mean(), 0.0);
        assert_eq!(zero.cdf().domain(), IntegerDomain::new(0, 0));

        let one = NegativeBinomial::new(4.0, 1.0).unwrap();
        assert_eq!(one.pdf().evaluate(3.0), 0.0);
        assert_eq!(one.cdf().evaluate(3.0), 0.0);
        assert_eq!(one.mean(), f64::INFINITY);
        assert_eq!(one.variance(), f64::INFINITY);
    }

    #[test]
    fn moments() {
        let d = NegativeBinomial::new(10.0, 0.4).unwrap();
        assert!(approx_eq(d.mean(), 10.0 * 0.4 / 0.6, 1e-12));
        assert!(approx_eq(d.variance(), 10.0 * 0.4 / 0.36, 1e-12));
    }

    #[test]
    fn domain_covers_the_mass() {
        let d = NegativeBinomial::new(10.0, 0.4).unwrap();
        let domain = d.cdf().domain();
        assert_eq!(domain.first(), 0);
        assert!(approx_eq(d.cdf().evaluate(domain.last() as f64), 1.0, 1e-9));
        let mass: f64 = domain.iter().map(|k| d.pdf().evaluate(k as f64)).sum();
        assert!(approx_eq(mass, 1.0, 1e-9));
    }

    #[test]
    fn rejected_setters_preserve_state() {
        let mut d = NegativeBinomial::new(3.0, 0.2).unwrap();
        assert!(d.set_p(1.5).is_err());
        assert!(d.set_p(f64::NAN).is_err());
        assert!(d.set_r(0.0).is_err());
        assert_eq!((d.r(), d.p()), (3.0, 0.2));

        let bad = ParameterVector::from([5.0, -0.1]);
        assert!(d.decode(Some(&bad)).is_err());
        assert_eq!((d.r(), d.p()), (3.0, 0.2));
    }
}

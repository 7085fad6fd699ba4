//! Poisson distribution with rate λ.

use cfd_math::{gamma_q, log_gamma};
use rand::RngCore;
use rand_distr::Distribution as _;
use serde::Serialize;

use crate::density::{DiscreteSupport, ProbabilityFunction, Sampler, Univariate};
use crate::domain::IntegerDomain;
use crate::error::{ensure_positive, DistError, Result};
use crate::vector::{ParameterVector, Parameterized};

fn valid_rate(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

/// Poisson mass at `k`. Zero for negative or non-integer `k`, NaN for invalid `rate`.
pub fn poisson_pmf(k: f64, rate: f64) -> f64 {
    if k.is_nan() || !valid_rate(rate) {
        return f64::NAN;
    }
    if k < 0.0 || k.fract() != 0.0 || k.is_infinite() {
        return 0.0;
    }
    (k * rate.ln() - rate - log_gamma(k + 1.0)).exp()
}

/// Poisson CDF at `x`: Q(floor(x) + 1, λ).
pub fn poisson_cdf(x: f64, rate: f64) -> f64 {
    if x.is_nan() || !valid_rate(rate) {
        return f64::NAN;
    }
    if x < 0.0 {
        return 0.0;
    }
    if x.is_infinite() {
        return 1.0;
    }
    gamma_q(x.floor() + 1.0, rate)
}

/// Poisson distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Poisson {
    rate: f64,
}

impl Poisson {
    pub const ARITY: usize = 1;
    pub const DEFAULT_RATE: f64 = 1.0;

    pub fn new(rate: f64) -> Result<Self> {
        ensure_positive("rate", rate)?;
        Ok(Self { rate })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn set_rate(&mut self, rate: f64) -> Result<()> {
        ensure_positive("rate", rate)?;
        self.rate = rate;
        Ok(())
    }
}

impl Default for Poisson {
    fn default() -> Self {
        Self {
            rate: Self::DEFAULT_RATE,
        }
    }
}

/// Mass-function view over a snapshot of [`Poisson`] parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoissonPmf {
    rate: f64,
}

impl ProbabilityFunction for PoissonPmf {
    fn evaluate(&self, x: f64) -> f64 {
        poisson_pmf(x, self.rate)
    }
}

/// CDF view over a snapshot of [`Poisson`] parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoissonCdf {
    rate: f64,
}

impl ProbabilityFunction for PoissonCdf {
    fn evaluate(&self, x: f64) -> f64 {
        poisson_cdf(x, self.rate)
    }
}

impl DiscreteSupport for PoissonCdf {
    fn domain(&self) -> IntegerDomain {
        IntegerDomain::from_cdf(|k| self.evaluate(k as f64))
    }
}

impl Parameterized for Poisson {
    fn arity(&self) -> usize {
        Self::ARITY
    }

    fn parameters(&self) -> ParameterVector {
        ParameterVector::from([self.rate])
    }

    fn apply_parameters(&mut self, values: &[f64]) -> Result<()> {
        let &[rate] = values else {
            return Err(DistError::VectorLength {
                expected: Self::ARITY,
                actual: values.len(),
            });
        };
        self.set_rate(rate)
    }
}

impl Sampler for Poisson {
    type Output = f64;

    fn sample(&self, rng: &mut dyn RngCore) -> Result<f64> {
        let dist =
            rand_distr::Poisson::new(self.rate).map_err(|e| DistError::Sampling(e.to_string()))?;
        Ok(dist.sample(rng))
    }
}

impl Univariate for Poisson {
    type Pdf = PoissonPmf;
    type Cdf = PoissonCdf;

    fn pdf(&self) -> PoissonPmf {
        PoissonPmf { rate: self.rate }
    }

    fn cdf(&self) -> PoissonCdf {
        PoissonCdf { rate: self.rate }
    }

    fn mean(&self) -> f64 {
        self.rate
    }

    fn variance(&self) -> f64 {
        self.rate
    }
}

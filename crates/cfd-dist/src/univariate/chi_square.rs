//! Chi-square distribution with `k` degrees of freedom.
//!
//! Chi-square(k) is Gamma(k/2, rate 1/2), so the density and CDF delegate to
//! the gamma special functions in `cfd-math`.

use cfd_math::{gamma_cdf, gamma_log_pdf};
use rand::RngCore;
use rand_distr::{ChiSquared, Distribution as _};
use serde::Serialize;

use crate::density::{ProbabilityFunction, Sampler, Univariate};
use crate::error::{ensure_positive, DistError, Result};
use crate::vector::{ParameterVector, Parameterized};

fn valid_dof(dof: f64) -> bool {
    dof.is_finite() && dof > 0.0
}

/// Chi-square density at `x`. Zero for `x <= 0`, NaN for invalid `dof`.
pub fn chi_square_pdf(x: f64, dof: f64) -> f64 {
    if x.is_nan() || !valid_dof(dof) {
        return f64::NAN;
    }
    if x <= 0.0 || x.is_infinite() {
        return 0.0;
    }
    gamma_log_pdf(x, 0.5 * dof, 0.5).exp()
}

/// Chi-square CDF at `x`: P(k/2, x/2). Zero for `x <= 0`, NaN for invalid `dof`.
pub fn chi_square_cdf(x: f64, dof: f64) -> f64 {
    if x.is_nan() || !valid_dof(dof) {
        return f64::NAN;
    }
    if x == f64::INFINITY {
        return 1.0;
    }
    gamma_cdf(x, 0.5 * dof, 0.5)
}

/// Chi-square distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChiSquare {
    degrees_of_freedom: f64,
}

impl ChiSquare {
    pub const ARITY: usize = 1;
    pub const DEFAULT_DEGREES_OF_FREEDOM: f64 = 1.0;

    pub fn new(degrees_of_freedom: f64) -> Result<Self> {
        ensure_positive("degrees_of_freedom", degrees_of_freedom)?;
        Ok(Self { degrees_of_freedom })
    }

    pub fn degrees_of_freedom(&self) -> f64 {
        self.degrees_of_freedom
    }

    pub fn set_degrees_of_freedom(&mut self, degrees_of_freedom: f64) -> Result<()> {
        ensure_positive("degrees_of_freedom", degrees_of_freedom)?;
        self.degrees_of_freedom = degrees_of_freedom;
        Ok(())
    }
}

impl Default for ChiSquare {
    fn default() -> Self {
        Self {
            degrees_of_freedom: Self::DEFAULT_DEGREES_OF_FREEDOM,
        }
    }
}

/// Density view over a snapshot of [`ChiSquare`] parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquarePdf {
    degrees_of_freedom: f64,
}

impl ProbabilityFunction for ChiSquarePdf {
    fn evaluate(&self, x: f64) -> f64 {
        chi_square_pdf(x, self.degrees_of_freedom)
    }
}

/// CDF view over a snapshot of [`ChiSquare`] parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquareCdf {
    degrees_of_freedom: f64,
}

impl ProbabilityFunction for ChiSquareCdf {
    fn evaluate(&self, x: f64) -> f64 {
        chi_square_cdf(x, self.degrees_of_freedom)
    }
}

impl Parameterized for ChiSquare {
    fn arity(&self) -> usize {
        Self::ARITY
    }

    fn parameters(&self) -> ParameterVector {
        ParameterVector::from([self.degrees_of_freedom])
    }

    fn apply_parameters(&mut self, values: &[f64]) -> Result<()> {
        let &[dof] = values else {
            return Err(DistError::VectorLength {
                expected: Self::ARITY,
                actual: values.len(),
            });
        };
        self.set_degrees_of_freedom(dof)
    }
}

impl Sampler for ChiSquare {
    type Output = f64;

    fn sample(&self, rng: &mut dyn RngCore) -> Result<f64> {
        let dist = ChiSquared::new(self.degrees_of_freedom)
            .map_err(|e| DistError::Sampling(e.to_string()))?;
        Ok(dist.sample(rng))
    }
}

impl Univariate for ChiSquare {
    type Pdf = ChiSquarePdf;
    type Cdf = ChiSquareCdf;

    fn pdf(&self) -> ChiSquarePdf {
        ChiSquarePdf {
            degrees_of_freedom: self.degrees_of_freedom,
        }
    }

    fn cdf(&self) -> ChiSquareCdf {
        ChiSquareCdf {
            degrees_of_freedom: self.degrees_of_freedom,
        }
    }

    fn mean(&self) -> f64 {
        self.degrees_of_freedom
    }

    fn variance(&self) -> f64 {
        2.0 * self.degrees_of_freedom
    }
}

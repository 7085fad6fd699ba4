//! Continuous uniform distribution on `[min, max]`.
//!
//! `min == max` is allowed and behaves as a point mass: the density is
//! infinite at the point, the CDF is a unit step and sampling is
//! deterministic.

use rand::{Rng, RngCore};
use serde::Serialize;

use crate::density::{ProbabilityFunction, Sampler, Univariate};
use crate::error::{ensure_finite, DistError, Result};
use crate::vector::{ParameterVector, Parameterized};

fn valid_bounds(min: f64, max: f64) -> bool {
    min.is_finite() && max.is_finite() && min <= max
}

fn ensure_ordered(min: f64, max: f64) -> Result<()> {
    ensure_finite("min", min)?;
    ensure_finite("max", max)?;
    if min > max {
        return Err(DistError::invalid("min", min, "must not exceed max"));
    }
    Ok(())
}

/// Uniform density at `x`. NaN for inverted or non-finite bounds.
pub fn uniform_pdf(x: f64, min: f64, max: f64) -> f64 {
    if x.is_nan() || !valid_bounds(min, max) {
        return f64::NAN;
    }
    if x < min || x > max {
        return 0.0;
    }
    if min == max {
        return f64::INFINITY;
    }
    1.0 / (max - min)
}

/// Uniform CDF at `x`. NaN for inverted or non-finite bounds.
pub fn uniform_cdf(x: f64, min: f64, max: f64) -> f64 {
    if x.is_nan() || !valid_bounds(min, max) {
        return f64::NAN;
    }
    if x < min {
        return 0.0;
    }
    if x >= max {
        return 1.0;
    }
    (x - min) / (max - min)
}

/// Uniform distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Uniform {
    min: f64,
    max: f64,
}

impl Uniform {
    pub const ARITY: usize = 2;
    pub const DEFAULT_MIN: f64 = 0.0;
    pub const DEFAULT_MAX: f64 = 1.0;

    pub fn new(min: f64, max: f64) -> Result<Self> {
        ensure_ordered(min, max)?;
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Fails if `min` is not finite or exceeds the current `max`.
    pub fn set_min(&mut self, min: f64) -> Result<()> {
        ensure_ordered(min, self.max)?;
        self.min = min;
        Ok(())
    }

    /// Fails if `max` is not finite or falls below the current `min`.
    pub fn set_max(&mut self, max: f64) -> Result<()> {
        ensure_finite("max", max)?;
        if max < self.min {
            return Err(DistError::invalid("max", max, "must not be below min"));
        }
        self.max = max;
        Ok(())
    }

    /// Replace both bounds at once, for moves that would transiently invert
    /// the interval through [`Uniform::set_min`] / [`Uniform::set_max`].
    pub fn set_bounds(&mut self, min: f64, max: f64) -> Result<()> {
        *self = Self::new(min, max)?;
        Ok(())
    }

    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

impl Default for Uniform {
    fn default() -> Self {
        Self {
            min: Self::DEFAULT_MIN,
            max: Self::DEFAULT_MAX,
        }
    }
}

/// Density view over a snapshot of [`Uniform`] bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformPdf {
    min: f64,
    max: f64,
}

impl ProbabilityFunction for UniformPdf {
    fn evaluate(&self, x: f64) -> f64 {
        uniform_pdf(x, self.min, self.max)
    }
}

/// CDF view over a snapshot of [`Uniform`] bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformCdf {
    min: f64,
    max: f64,
}

impl ProbabilityFunction for UniformCdf {
    fn evaluate(&self, x: f64) -> f64 {
        uniform_cdf(x, self.min, self.max)
    }
}

impl Parameterized for Uniform {
    fn arity(&self) -> usize {
        Self::ARITY
    }

    fn parameters(&self) -> ParameterVector {
        ParameterVector::from([self.min, self.max])
    }

    fn apply_parameters(&mut self, values: &[f64]) -> Result<()> {
        let &[min, max] = values else {
            return Err(DistError::VectorLength {
                expected: Self::ARITY,
                actual: values.len(),
            });
        };
        self.set_bounds(min, max)
    }
}

impl Sampler for Uniform {
    type Output = f64;

    fn sample(&self, rng: &mut dyn RngCore) -> Result<f64> {
        if self.is_degenerate() {
            return Ok(self.min);
        }
        Ok(rng.random_range(self.min..self.max))
    }
}

impl Univariate for Uniform {
    type Pdf = UniformPdf;
    type Cdf = UniformCdf;

    fn pdf(&self) -> UniformPdf {
        UniformPdf {
            min: self.min,
            max: self.max,
        }
    }

    fn cdf(&self) -> UniformCdf {
        UniformCdf {
            min: self.min,
            max: self.max,
        }
    }

    fn mean(&self) -> f64 {
        0.5 * (self.min + self.max)
    }

    fn variance(&self) -> f64 {
        let width = self.max - self.min;
        width * width / 12.0
    }
}

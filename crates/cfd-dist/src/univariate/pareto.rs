//! Shifted Pareto (type I) distribution.
//!
//! Support is `x >= shift + scale`; with `z = x - shift`:
//!
//! ```text
//! f(x) = α s^α / z^(α+1)
//! F(x) = 1 - (s / z)^α
//! ```

use rand::{Rng, RngCore};
use serde::Serialize;

use crate::density::{ProbabilityFunction, Sampler, Univariate};
use crate::error::{ensure_finite, ensure_positive, DistError, Result};
use crate::vector::{ParameterVector, Parameterized};

fn valid_params(shape: f64, scale: f64, shift: f64) -> bool {
    shape.is_finite() && shape > 0.0 && scale.is_finite() && scale > 0.0 && shift.is_finite()
}

/// Pareto density at `x`. Zero below `shift + scale`, NaN for invalid parameters.
pub fn pareto_pdf(x: f64, shape: f64, scale: f64, shift: f64) -> f64 {
    if x.is_nan() || !valid_params(shape, scale, shift) {
        return f64::NAN;
    }
    let z = x - shift;
    if z < scale || z.is_infinite() {
        return 0.0;
    }
    (shape.ln() + shape * scale.ln() - (shape + 1.0) * z.ln()).exp()
}

/// Pareto CDF at `x`. Zero below `shift + scale`, NaN for invalid parameters.
pub fn pareto_cdf(x: f64, shape: f64, scale: f64, shift: f64) -> f64 {
    if x.is_nan() || !valid_params(shape, scale, shift) {
        return f64::NAN;
    }
    let z = x - shift;
    if z < scale {
        return 0.0;
    }
    if z.is_infinite() {
        return 1.0;
    }
    -(shape * (scale / z).ln()).exp_m1()
}

/// Pareto distribution with shape α, scale s and location shift L.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pareto {
    shape: f64,
    scale: f64,
    shift: f64,
}

impl Pareto {
    pub const ARITY: usize = 3;
    pub const DEFAULT_SHAPE: f64 = 1.0;
    pub const DEFAULT_SCALE: f64 = 1.0;
    pub const DEFAULT_SHIFT: f64 = 0.0;

    pub fn new(shape: f64, scale: f64, shift: f64) -> Result<Self> {
        ensure_positive("shape", shape)?;
        ensure_positive("scale", scale)?;
        ensure_finite("shift", shift)?;
        Ok(Self {
            shape,
            scale,
            shift,
        })
    }

    pub fn shape(&self) -> f64 {
        self.shape
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn shift(&self) -> f64 {
        self.shift
    }

    pub fn set_shape(&mut self, shape: f64) -> Result<()> {
        ensure_positive("shape", shape)?;
        self.shape = shape;
        Ok(())
    }

    pub fn set_scale(&mut self, scale: f64) -> Result<()> {
        ensure_positive("scale", scale)?;
        self.scale = scale;
        Ok(())
    }

    pub fn set_shift(&mut self, shift: f64) -> Result<()> {
        ensure_finite("shift", shift)?;
        self.shift = shift;
        Ok(())
    }
}

impl Default for Pareto {
    fn default() -> Self {
        Self {
            shape: Self::DEFAULT_SHAPE,
            scale: Self::DEFAULT_SCALE,
            shift: Self::DEFAULT_SHIFT,
        }
    }
}

/// Density view over a snapshot of [`Pareto`] parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParetoPdf {
    shape: f64,
    scale: f64,
    shift: f64,
}

impl ProbabilityFunction for ParetoPdf {
    fn evaluate(&self, x: f64) -> f64 {
        pareto_pdf(x, self.shape, self.scale, self.shift)
    }
}

/// CDF view over a snapshot of [`Pareto`] parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParetoCdf {
    shape: f64,
    scale: f64,
    shift: f64,
}

impl ProbabilityFunction for ParetoCdf {
    fn evaluate(&self, x: f64) -> f64 {
        pareto_cdf(x, self.shape, self.scale, self.shift)
    }
}

impl Parameterized for Pareto {
    fn arity(&self) -> usize {
        Self::ARITY
    }

    fn parameters(&self) -> ParameterVector {
        ParameterVector::from([self.shape, self.scale, self.shift])
    }

    fn apply_parameters(&mut self, values: &[f64]) -> Result<()> {
        let &[shape, scale, shift] = values else {
            return Err(DistError::VectorLength {
                expected: Self::ARITY,
                actual: values.len(),
            });
        };
        *self = Self::new(shape, scale, shift)?;
        Ok(())
    }
}

impl Sampler for Pareto {
    type Output = f64;

    /// Inverse transform: `L + s · u^(-1/α)` with `u` uniform on (0, 1].
    fn sample(&self, rng: &mut dyn RngCore) -> Result<f64> {
        let u = 1.0 - rng.random::<f64>();
        Ok(self.shift + self.scale * u.powf(-1.0 / self.shape))
    }
}

impl Univariate for Pareto {
    type Pdf = ParetoPdf;
    type Cdf = ParetoCdf;

    fn pdf(&self) -> ParetoPdf {
        ParetoPdf {
            shape: self.shape,
            scale: self.scale,
            shift: self.shift,
        }
    }

    fn cdf(&self) -> ParetoCdf {
        ParetoCdf {
            shape: self.shape,
            scale: self.scale,
            shift: self.shift,
        }
    }

    /// Infinite for `shape <= 1`.
    fn mean(&self) -> f64 {
        if self.shape <= 1.0 {
            return f64::INFINITY;
        }
        self.shift + self.shape * self.scale / (self.shape - 1.0)
    }

    /// Infinite for `shape <= 2`.
    fn variance(&self) -> f64 {
        if self.shape <= 2.0 {
            return f64::INFINITY;
        }
        let a1 = self.shape - 1.0;
        self.scale * self.scale * self.shape / (a1 * a1 * (self.shape - 2.0))
    }
}

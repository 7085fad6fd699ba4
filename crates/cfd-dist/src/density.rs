//! Traits shared by every distribution in the crate.
//!
//! - [`ProbabilityFunction`]: a scalar function of one real argument (PDF,
//!   PMF or CDF view).
//! - [`DiscreteSupport`]: an enumerable integer support.
//! - [`Density`]: the density of a (possibly multivariate) distribution,
//!   the seam the mixture model is generic over.
//! - [`Sampler`]: draws from a caller-supplied random source.

use std::fmt::Debug;

use rand::RngCore;

use crate::domain::IntegerDomain;
use crate::error::Result;
use crate::vector::Parameterized;

/// A real-valued function of one real argument.
pub trait ProbabilityFunction {
    fn evaluate(&self, x: f64) -> f64;
}

/// Enumerable support of a discrete distribution.
pub trait DiscreteSupport {
    fn domain(&self) -> IntegerDomain;
}

/// Probability density (or mass) over points of type `Point`.
pub trait Density {
    type Point: ?Sized;

    fn density(&self, x: &Self::Point) -> f64;

    fn log_density(&self, x: &Self::Point) -> f64 {
        self.density(x).ln()
    }
}

/// Random draws from a distribution.
pub trait Sampler {
    type Output;

    fn sample(&self, rng: &mut dyn RngCore) -> Result<Self::Output>;

    /// `n` independent draws.
    fn sample_n(&self, rng: &mut dyn RngCore, n: usize) -> Result<Vec<Self::Output>> {
        (0..n).map(|_| self.sample(rng)).collect()
    }
}

/// Common surface of the closed-form univariate families.
pub trait Univariate: Parameterized + Sampler<Output = f64> + Clone + Debug {
    type Pdf: ProbabilityFunction + Copy;
    type Cdf: ProbabilityFunction + Copy;

    /// Snapshot of the current parameters as a density (or mass) function.
    fn pdf(&self) -> Self::Pdf;

    /// Snapshot of the current parameters as a cumulative distribution function.
    fn cdf(&self) -> Self::Cdf;

    fn mean(&self) -> f64;

    fn variance(&self) -> f64;
}

/// Implements [`Density`] over `f64` for univariate families through their PDF view.
macro_rules! univariate_density {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::density::Density for $ty {
                type Point = f64;

                fn density(&self, x: &f64) -> f64 {
                    $crate::density::ProbabilityFunction::evaluate(
                        &$crate::density::Univariate::pdf(self),
                        *x,
                    )
                }
            }
        )+
    };
}

pub(crate) use univariate_density;

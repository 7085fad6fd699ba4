//! Closed-form probability distributions.
//!
//! - Univariate families: ChiSquare, NegativeBinomial, Pareto, Poisson and
//!   Uniform, each with PDF/CDF views, moments, sampling and a parameter
//!   vector codec.
//! - [`MultivariateGaussian`] and the weighted [`MixtureDensityModel`].
//! - Maximum-likelihood estimators, including EM for Gaussian mixtures.
//!
//! Special functions come from `cfd-math`.

pub mod density;
pub mod domain;
pub mod error;
pub mod estimate;
pub mod gaussian;
pub mod mixture;
pub mod univariate;
pub mod vector;

pub use density::{Density, DiscreteSupport, ProbabilityFunction, Sampler, Univariate};
pub use domain::{IntegerDomain, DOMAIN_TAIL_EPSILON, MAX_DOMAIN_LAST};
pub use error::{DistError, Result};
pub use estimate::{
    estimate_family, ChiSquareEstimator, FitConfig, GaussianMixtureConfig, GaussianMixtureFitter,
    MaximumLikelihood, MixtureFit, NegativeBinomialEstimator, ParetoEstimator, PoissonEstimator,
    UniformEstimator, WeightedSamples,
};
pub use gaussian::MultivariateGaussian;
pub use mixture::MixtureDensityModel;
pub use univariate::*;
pub use vector::{ParameterVector, Parameterized};

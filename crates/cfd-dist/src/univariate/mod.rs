//! Closed-form univariate families and a runtime-selected wrapper.
//!
//! Each family lives in its own module with free evaluators
//! (`poisson_pmf`, `pareto_cdf`, ...), a validated parameter struct and
//! `Copy` PDF/CDF views. [`UnivariateDistribution`] dispatches over all of
//! them for callers that pick the family at runtime (the CLI, configs).

mod chi_square;
mod negative_binomial;
mod pareto;
mod poisson;
mod uniform;

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use serde::{Deserialize, Serialize};

pub use chi_square::{chi_square_cdf, chi_square_pdf, ChiSquare, ChiSquareCdf, ChiSquarePdf};
pub use negative_binomial::{
    negative_binomial_cdf, negative_binomial_pmf, NegativeBinomial, NegativeBinomialCdf,
    NegativeBinomialPmf,
};
pub use pareto::{pareto_cdf, pareto_pdf, Pareto, ParetoCdf, ParetoPdf};
pub use poisson::{poisson_cdf, poisson_pmf, Poisson, PoissonCdf, PoissonPmf};
pub use uniform::{uniform_cdf, uniform_pdf, Uniform, UniformCdf, UniformPdf};

use crate::density::{
    univariate_density, Density, DiscreteSupport, ProbabilityFunction, Sampler, Univariate,
};
use crate::domain::IntegerDomain;
use crate::error::Result;
use crate::vector::{ParameterVector, Parameterized};

univariate_density!(ChiSquare, NegativeBinomial, Pareto, Poisson, Uniform);

/// Selector for the univariate families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    ChiSquare,
    NegativeBinomial,
    Pareto,
    Poisson,
    Uniform,
}

impl Family {
    pub const ALL: [Family; 5] = [
        Family::ChiSquare,
        Family::NegativeBinomial,
        Family::Pareto,
        Family::Poisson,
        Family::Uniform,
    ];

    /// Length of the family's parameter vector.
    pub fn arity(self) -> usize {
        self.parameter_names().len()
    }

    pub fn is_discrete(self) -> bool {
        matches!(self, Family::NegativeBinomial | Family::Poisson)
    }

    /// Parameter names in parameter-vector order.
    pub fn parameter_names(self) -> &'static [&'static str] {
        match self {
            Family::ChiSquare => &["degrees_of_freedom"],
            Family::NegativeBinomial => &["r", "p"],
            Family::Pareto => &["shape", "scale", "shift"],
            Family::Poisson => &["rate"],
            Family::Uniform => &["min", "max"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Family::ChiSquare => "chi_square",
            Family::NegativeBinomial => "negative_binomial",
            Family::Pareto => "pareto",
            Family::Poisson => "poisson",
            Family::Uniform => "uniform",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Family {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chi_square" | "chi-square" | "chisquare" | "chi2" => Ok(Family::ChiSquare),
            "negative_binomial" | "negative-binomial" | "negbin" | "nb" => {
                Ok(Family::NegativeBinomial)
            }
            "pareto" => Ok(Family::Pareto),
            "poisson" => Ok(Family::Poisson),
            "uniform" => Ok(Family::Uniform),
            other => Err(format!(
                "unknown family '{other}' (expected one of: chi_square, negative_binomial, pareto, poisson, uniform)"
            )),
        }
    }
}

/// One of the univariate families, chosen at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum UnivariateDistribution {
    ChiSquare(ChiSquare),
    NegativeBinomial(NegativeBinomial),
    Pareto(Pareto),
    Poisson(Poisson),
    Uniform(Uniform),
}

macro_rules! dispatch {
    ($self:expr, $d:ident => $body:expr) => {
        match $self {
            UnivariateDistribution::ChiSquare($d) => $body,
            UnivariateDistribution::NegativeBinomial($d) => $body,
            UnivariateDistribution::Pareto($d) => $body,
            UnivariateDistribution::Poisson($d) => $body,
            UnivariateDistribution::Uniform($d) => $body,
        }
    };
}

impl UnivariateDistribution {
    /// The family's default-parameter distribution.
    pub fn default_for(family: Family) -> Self {
        match family {
            Family::ChiSquare => Self::ChiSquare(ChiSquare::default()),
            Family::NegativeBinomial => Self::NegativeBinomial(NegativeBinomial::default()),
            Family::Pareto => Self::Pareto(Pareto::default()),
            Family::Poisson => Self::Poisson(Poisson::default()),
            Family::Uniform => Self::Uniform(Uniform::default()),
        }
    }

    /// Build a distribution of `family` by decoding `vector`.
    pub fn from_parameters(family: Family, vector: &ParameterVector) -> Result<Self> {
        let mut dist = Self::default_for(family);
        dist.decode(Some(vector))?;
        Ok(dist)
    }

    pub fn family(&self) -> Family {
        match self {
            Self::ChiSquare(_) => Family::ChiSquare,
            Self::NegativeBinomial(_) => Family::NegativeBinomial,
            Self::Pareto(_) => Family::Pareto,
            Self::Poisson(_) => Family::Poisson,
            Self::Uniform(_) => Family::Uniform,
        }
    }

    /// Density (or mass) at `x`.
    pub fn pdf_at(&self, x: f64) -> f64 {
        dispatch!(self, d => d.pdf().evaluate(x))
    }

    pub fn cdf_at(&self, x: f64) -> f64 {
        dispatch!(self, d => d.cdf().evaluate(x))
    }

    pub fn mean(&self) -> f64 {
        dispatch!(self, d => d.mean())
    }

    pub fn variance(&self) -> f64 {
        dispatch!(self, d => d.variance())
    }

    /// Enumerable support for the discrete families, `None` otherwise.
    pub fn domain(&self) -> Option<IntegerDomain> {
        match self {
            Self::NegativeBinomial(d) => Some(d.cdf().domain()),
            Self::Poisson(d) => Some(d.cdf().domain()),
            _ => None,
        }
    }
}

impl Parameterized for UnivariateDistribution {
    fn arity(&self) -> usize {
        dispatch!(self, d => d.arity())
    }

    fn parameters(&self) -> ParameterVector {
        dispatch!(self, d => d.parameters())
    }

    fn apply_parameters(&mut self, values: &[f64]) -> Result<()> {
        dispatch!(self, d => d.apply_parameters(values))
    }
}

impl Density for UnivariateDistribution {
    type Point = f64;

    fn density(&self, x: &f64) -> f64 {
        self.pdf_at(*x)
    }
}

impl Sampler for UnivariateDistribution {
    type Output = f64;

    fn sample(&self, rng: &mut dyn RngCore) -> Result<f64> {
        dispatch!(self, d => d.sample(rng))
    }
}

macro_rules! impl_from_family {
    ($($variant:ident),+) => {
        $(
            impl From<$variant> for UnivariateDistribution {
                fn from(d: $variant) -> Self {
                    UnivariateDistribution::$variant(d)
                }
            }
        )+
    };
}

impl_from_family!(ChiSquare, NegativeBinomial, Pareto, Poisson, Uniform);

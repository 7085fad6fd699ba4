//! Maximum-likelihood estimation from (optionally weighted) samples.
//!
//! Every univariate family has an estimator implementing
//! [`MaximumLikelihood`]. Closed-form estimators (Uniform, Poisson, Pareto)
//! are exact; ChiSquare and NegativeBinomial solve a one-dimensional score
//! equation iteratively under [`FitConfig`]. Gaussian mixtures are fitted by
//! expectation-maximization in [`mixture`].

pub mod mixture;
mod univariate;

use serde::{Deserialize, Serialize};

use crate::error::{DistError, Result};

pub use mixture::{GaussianMixtureConfig, GaussianMixtureFitter, MixtureFit};
pub use univariate::{
    estimate_family, ChiSquareEstimator, NegativeBinomialEstimator, ParetoEstimator,
    PoissonEstimator, UniformEstimator,
};

/// Iteration controls shared by the iterative estimators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Upper bound on solver iterations.
    pub max_iterations: usize,
    /// Convergence tolerance on the solved quantity.
    pub tolerance: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-10,
        }
    }
}

/// Validated sample collection with per-sample weights.
///
/// Invariants: non-empty, equal lengths, finite values, finite
/// non-negative weights with a strictly positive total.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedSamples {
    values: Vec<f64>,
    weights: Vec<f64>,
    total_weight: f64,
}

impl WeightedSamples {
    /// Every sample weighted 1.
    pub fn unweighted(values: &[f64]) -> Result<Self> {
        Self::new(values.to_vec(), vec![1.0; values.len()])
    }

    pub fn new(values: Vec<f64>, weights: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(DistError::InvalidSample("no samples".to_string()));
        }
        if values.len() != weights.len() {
            return Err(DistError::InvalidSample(format!(
                "{} samples but {} weights",
                values.len(),
                weights.len()
            )));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(DistError::InvalidSample(format!("non-finite sample {bad}")));
        }
        if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(DistError::InvalidSample(format!(
                "weight {bad} must be finite and >= 0"
            )));
        }
        let total_weight: f64 = weights.iter().sum();
        if total_weight <= 0.0 || !total_weight.is_finite() {
            return Err(DistError::InvalidSample(
                "total weight must be positive".to_string(),
            ));
        }
        Ok(Self {
            values,
            weights,
            total_weight,
        })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// `(value, weight)` pairs with strictly positive weight.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values
            .iter()
            .zip(&self.weights)
            .map(|(&x, &w)| (x, w))
            .filter(|&(_, w)| w > 0.0)
    }

    pub fn mean(&self) -> f64 {
        self.weighted_mean_of(|x| x)
    }

    /// Weighted mean of `f(x)`.
    pub fn weighted_mean_of(&self, f: impl Fn(f64) -> f64) -> f64 {
        self.iter().map(|(x, w)| w * f(x)).sum::<f64>() / self.total_weight
    }

    /// Weighted population variance (divides by the total weight).
    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        self.weighted_mean_of(|x| (x - mean) * (x - mean))
    }

    /// Smallest sample with positive weight.
    pub fn min(&self) -> f64 {
        self.iter().map(|(x, _)| x).fold(f64::INFINITY, f64::min)
    }

    /// Largest sample with positive weight.
    pub fn max(&self) -> f64 {
        self.iter().map(|(x, _)| x).fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Estimator producing a fitted distribution from samples.
pub trait MaximumLikelihood {
    type Output;

    fn fit_weighted(&self, samples: &WeightedSamples) -> Result<Self::Output>;

    /// Fit with every sample weighted 1.
    fn fit(&self, samples: &[f64]) -> Result<Self::Output> {
        let samples = WeightedSamples::unweighted(samples)?;
        self.fit_weighted(&samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_collections() {
        assert!(WeightedSamples::unweighted(&[]).is_err());
        assert!(WeightedSamples::unweighted(&[1.0, f64::NAN]).is_err());
        assert!(WeightedSamples::new(vec![1.0, 2.0], vec![1.0]).is_err());
        assert!(WeightedSamples::new(vec![1.0, 2.0], vec![1.0, -1.0]).is_err());
        assert!(WeightedSamples::new(vec![1.0, 2.0], vec![0.0, 0.0]).is_err());
    }

    #[test]
    fn weighted_moments() {
        let s = WeightedSamples::new(vec![1.0, 3.0, 100.0], vec![1.0, 3.0, 0.0]).unwrap();
        assert_eq!(s.total_weight(), 4.0);
        assert_eq!(s.mean(), 2.5);
        assert_eq!(s.variance(), (1.5 * 1.5 + 3.0 * 0.5 * 0.5) / 4.0);
        assert_eq!(s.min(), 1.0);
        assert_eq!(s.max(), 3.0);
    }

    #[test]
    fn fit_config_defaults_fill_missing_fields() {
        let cfg: FitConfig = serde_json::from_str(r#"{"max_iterations": 7}"#).unwrap();
        assert_eq!(cfg.max_iterations, 7);
        assert_eq!(cfg.tolerance, FitConfig::default().tolerance);
    }
}

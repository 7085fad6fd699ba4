//! Finite mixture density model.
//!
//! A mixture holds an ordered list of component densities and a parallel
//! list of prior weights. Weights are non-negative with a positive total but
//! need not sum to one; the density normalizes by the raw weight sum:
//!
//! ```text
//! f(x) = Σ wᵢ fᵢ(x) / Σ wᵢ
//! ```

use cfd_math::log_sum_exp;
use rand::{Rng, RngCore};
use serde::Serialize;

use crate::density::{Density, Sampler};
use crate::error::{DistError, Result};
use crate::vector::{ParameterVector, Parameterized};

fn ensure_weight(value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DistError::invalid("weight", value, "must be finite and >= 0"))
    }
}

fn ensure_weights(weights: &[f64]) -> Result<()> {
    weights.iter().try_for_each(|&w| ensure_weight(w))?;
    let total: f64 = weights.iter().sum();
    if total > 0.0 && total.is_finite() {
        Ok(())
    } else {
        Err(DistError::invalid("weight sum", total, "must be finite and > 0"))
    }
}

/// Weighted mixture of component densities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MixtureDensityModel<T> {
    components: Vec<T>,
    weights: Vec<f64>,
}

impl<T> MixtureDensityModel<T> {
    /// Mixture with every weight set to 1.
    pub fn new(components: Vec<T>) -> Result<Self> {
        if components.is_empty() {
            return Err(DistError::EmptyMixture);
        }
        let weights = vec![1.0; components.len()];
        Ok(Self {
            components,
            weights,
        })
    }

    /// Mixture with a copy of `weights`, which must match `components` in length.
    pub fn with_weights(components: Vec<T>, weights: &[f64]) -> Result<Self> {
        if components.is_empty() {
            return Err(DistError::EmptyMixture);
        }
        if components.len() != weights.len() {
            return Err(DistError::MixtureShape {
                components: components.len(),
                weights: weights.len(),
            });
        }
        ensure_weights(weights)?;
        Ok(Self {
            components,
            weights: weights.to_vec(),
        })
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[T] {
        &self.components
    }

    pub fn component(&self, index: usize) -> Option<&T> {
        self.components.get(index)
    }

    pub fn component_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.components.len();
        self.components
            .get_mut(index)
            .ok_or(DistError::IndexOutOfRange { index, len })
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Replace one weight. Rejected if it would leave the weight sum at zero.
    pub fn set_weight(&mut self, index: usize, weight: f64) -> Result<()> {
        let len = self.weights.len();
        if index >= len {
            return Err(DistError::IndexOutOfRange { index, len });
        }
        ensure_weight(weight)?;
        let rest: f64 = self
            .weights
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != index)
            .map(|(_, w)| w)
            .sum();
        if rest + weight <= 0.0 {
            return Err(DistError::invalid("weight sum", rest + weight, "must be > 0"));
        }
        self.weights[index] = weight;
        Ok(())
    }

    /// Raw, unnormalized sum of the prior weights.
    pub fn prior_weight_sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Weights scaled to sum to one.
    pub fn normalized_weights(&self) -> Vec<f64> {
        let total = self.prior_weight_sum();
        self.weights.iter().map(|w| w / total).collect()
    }
}

impl<T: Density> MixtureDensityModel<T> {
    /// Posterior probability of each component having generated `x`.
    ///
    /// Falls back to the normalized priors where every component has zero
    /// density at `x`. Where some weighted components have infinite density
    /// (point masses), they share the responsibility equally.
    pub fn responsibilities(&self, x: &T::Point) -> Vec<f64> {
        let log_joint: Vec<f64> = self
            .components
            .iter()
            .zip(&self.weights)
            .map(|(c, &w)| {
                if w > 0.0 {
                    w.ln() + c.log_density(x)
                } else {
                    f64::NEG_INFINITY
                }
            })
            .collect();

        let infinite = log_joint.iter().filter(|&&l| l == f64::INFINITY).count();
        if infinite > 0 {
            let share = 1.0 / infinite as f64;
            return log_joint
                .iter()
                .map(|&l| if l == f64::INFINITY { share } else { 0.0 })
                .collect();
        }

        let log_total = log_sum_exp(&log_joint);
        if log_total == f64::NEG_INFINITY {
            return self.normalized_weights();
        }
        log_joint.iter().map(|l| (l - log_total).exp()).collect()
    }
}

impl<T: Density> Density for MixtureDensityModel<T> {
    type Point = T::Point;

    fn density(&self, x: &T::Point) -> f64 {
        let weighted: f64 = self
            .components
            .iter()
            .zip(&self.weights)
            .filter(|&(_, &w)| w > 0.0)
            .map(|(c, &w)| w * c.density(x))
            .sum();
        weighted / self.prior_weight_sum()
    }

    fn log_density(&self, x: &T::Point) -> f64 {
        let log_joint: Vec<f64> = self
            .components
            .iter()
            .zip(&self.weights)
            .filter(|&(_, &w)| w > 0.0)
            .map(|(c, &w)| w.ln() + c.log_density(x))
            .collect();
        log_sum_exp(&log_joint) - self.prior_weight_sum().ln()
    }
}

impl<T: Sampler> Sampler for MixtureDensityModel<T> {
    type Output = T::Output;

    /// Picks a component with probability proportional to its weight, then
    /// samples it.
    fn sample(&self, rng: &mut dyn RngCore) -> Result<T::Output> {
        let target = rng.random::<f64>() * self.prior_weight_sum();
        let mut cumulative = 0.0;
        let mut chosen = None;
        for (i, &w) in self.weights.iter().enumerate() {
            if w <= 0.0 {
                continue;
            }
            chosen = Some(i);
            cumulative += w;
            if target < cumulative {
                break;
            }
        }
        let index = chosen.ok_or_else(|| {
            DistError::Sampling("mixture has no component with positive weight".to_string())
        })?;
        self.components[index].sample(rng)
    }
}

/// The parameter vector of a mixture is its weight array.
impl<T> Parameterized for MixtureDensityModel<T> {
    fn arity(&self) -> usize {
        self.weights.len()
    }

    fn parameters(&self) -> ParameterVector {
        ParameterVector::from(self.weights.as_slice())
    }

    fn apply_parameters(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != self.weights.len() {
            return Err(DistError::VectorLength {
                expected: self.weights.len(),
                actual: values.len(),
            });
        }
        ensure_weights(values)?;
        self.weights.copy_from_slice(values);
        Ok(())
    }
}

//! Estimators for the univariate families.

use cfd_math::{digamma, trigamma};
use tracing::{debug, warn};

use super::{FitConfig, MaximumLikelihood, WeightedSamples};
use crate::error::{DistError, Result};
use crate::univariate::{
    ChiSquare, Family, NegativeBinomial, Pareto, Poisson, Uniform, UnivariateDistribution,
};

/// Euler–Mascheroni constant, -ψ(1).
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Bracket expansion steps before the NegativeBinomial solver gives up.
const MAX_BRACKET_STEPS: usize = 64;

fn estimation_failed(family: Family, reason: String) -> DistError {
    warn!(%family, %reason, "estimation failed");
    DistError::Estimation(reason)
}

/// Uniform bounds from the smallest and largest weighted samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformEstimator;

impl MaximumLikelihood for UniformEstimator {
    type Output = Uniform;

    fn fit_weighted(&self, samples: &WeightedSamples) -> Result<Uniform> {
        let fitted = Uniform::new(samples.min(), samples.max())?;
        debug!(min = fitted.min(), max = fitted.max(), "uniform fit");
        Ok(fitted)
    }
}

/// Poisson rate from the weighted mean.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoissonEstimator;

impl MaximumLikelihood for PoissonEstimator {
    type Output = Poisson;

    fn fit_weighted(&self, samples: &WeightedSamples) -> Result<Poisson> {
        if let Some((x, _)) = samples.iter().find(|&(x, _)| x < 0.0) {
            return Err(DistError::InvalidSample(format!(
                "poisson samples must be >= 0, got {x}"
            )));
        }
        let rate = samples.mean();
        if rate <= 0.0 {
            return Err(estimation_failed(
                Family::Poisson,
                "all samples are zero; rate must be positive".to_string(),
            ));
        }
        debug!(rate, n = samples.len(), "poisson fit");
        Poisson::new(rate)
    }
}

/// Degrees of freedom by solving ψ(k/2) = E[ln x] - ln 2.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChiSquareEstimator {
    pub config: FitConfig,
}

impl ChiSquareEstimator {
    pub fn new(config: FitConfig) -> Self {
        Self { config }
    }
}

/// Starting point for inverting the digamma function (Minka 2000).
fn inverse_digamma_guess(y: f64) -> f64 {
    if y >= -2.22 {
        y.exp() + 0.5
    } else {
        -1.0 / (y + EULER_GAMMA)
    }
}

impl MaximumLikelihood for ChiSquareEstimator {
    type Output = ChiSquare;

    fn fit_weighted(&self, samples: &WeightedSamples) -> Result<ChiSquare> {
        if let Some((x, _)) = samples.iter().find(|&(x, _)| x <= 0.0) {
            return Err(DistError::InvalidSample(format!(
                "chi-square samples must be > 0, got {x}"
            )));
        }
        let target = samples.weighted_mean_of(f64::ln) - std::f64::consts::LN_2;

        let mut a = inverse_digamma_guess(target);
        for iteration in 1..=self.config.max_iterations {
            let step = (digamma(a) - target) / trigamma(a);
            let mut next = a - step;
            // Halve toward zero instead of stepping out of the domain.
            if next.is_nan() || next <= 0.0 {
                next = 0.5 * a;
            }
            let converged = (next - a).abs() <= self.config.tolerance * a;
            a = next;
            if converged {
                debug!(dof = 2.0 * a, iteration, "chi-square fit converged");
                return ChiSquare::new(2.0 * a);
            }
        }
        Err(estimation_failed(
            Family::ChiSquare,
            format!(
                "newton solver did not converge in {} iterations",
                self.config.max_iterations
            ),
        ))
    }
}

/// Pareto shape and scale for a known shift.
#[derive(Debug, Clone, Copy)]
pub struct ParetoEstimator {
    pub shift: f64,
}

impl Default for ParetoEstimator {
    fn default() -> Self {
        Self {
            shift: Pareto::DEFAULT_SHIFT,
        }
    }
}

impl ParetoEstimator {
    pub fn with_shift(shift: f64) -> Self {
        Self { shift }
    }
}

impl MaximumLikelihood for ParetoEstimator {
    type Output = Pareto;

    fn fit_weighted(&self, samples: &WeightedSamples) -> Result<Pareto> {
        let scale = samples.min() - self.shift;
        if scale <= 0.0 {
            return Err(DistError::InvalidSample(format!(
                "pareto samples must exceed the shift {}",
                self.shift
            )));
        }
        let log_excess: f64 = samples
            .iter()
            .map(|(x, w)| w * ((x - self.shift) / scale).ln())
            .sum();
        if log_excess <= 0.0 {
            return Err(estimation_failed(
                Family::Pareto,
                "every sample sits at the scale; shape is unbounded".to_string(),
            ));
        }
        let shape = samples.total_weight() / log_excess;
        debug!(shape, scale, shift = self.shift, "pareto fit");
        Pareto::new(shape, scale, self.shift)
    }
}

/// NegativeBinomial `(r, p)` from the profile-likelihood score in `r`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegativeBinomialEstimator {
    pub config: FitConfig,
}

impl NegativeBinomialEstimator {
    pub fn new(config: FitConfig) -> Self {
        Self { config }
    }
}

/// d/dr of the log-likelihood with `p` profiled out at `mean / (r + mean)`.
fn negative_binomial_score(samples: &WeightedSamples, mean: f64, r: f64) -> f64 {
    let digamma_r = digamma(r);
    let sum: f64 = samples
        .iter()
        .map(|(x, w)| w * (digamma(x + r) - digamma_r))
        .sum();
    sum + samples.total_weight() * (r / (r + mean)).ln()
}

impl MaximumLikelihood for NegativeBinomialEstimator {
    type Output = NegativeBinomial;

    fn fit_weighted(&self, samples: &WeightedSamples) -> Result<NegativeBinomial> {
        if let Some((x, _)) = samples.iter().find(|&(x, _)| x < 0.0 || x.fract() != 0.0) {
            return Err(DistError::InvalidSample(format!(
                "negative binomial samples must be non-negative integers, got {x}"
            )));
        }
        let mean = samples.mean();
        if mean == 0.0 {
            debug!("all samples zero; fitting point mass at 0");
            return NegativeBinomial::new(NegativeBinomial::DEFAULT_R, 0.0);
        }
        let variance = samples.variance();
        if variance <= mean {
            return Err(estimation_failed(
                Family::NegativeBinomial,
                format!("samples are not overdispersed (mean {mean}, variance {variance})"),
            ));
        }

        // The score is positive near 0 and negative for large r; bracket the
        // sign change around the method-of-moments estimate.
        let score = |r: f64| negative_binomial_score(samples, mean, r);
        let start = mean * mean / (variance - mean);
        let (mut lo, mut hi) = (start, start);
        let mut steps = 0;
        while score(lo) <= 0.0 {
            lo *= 0.5;
            steps += 1;
            if steps > MAX_BRACKET_STEPS {
                return Err(estimation_failed(
                    Family::NegativeBinomial,
                    "could not bracket r from below".to_string(),
                ));
            }
        }
        steps = 0;
        while score(hi) > 0.0 {
            hi *= 2.0;
            steps += 1;
            if steps > MAX_BRACKET_STEPS {
                return Err(estimation_failed(
                    Family::NegativeBinomial,
                    "score stays positive; r diverges".to_string(),
                ));
            }
        }

        // Bisection on ln r.
        let (mut log_lo, mut log_hi) = (lo.ln(), hi.ln());
        let mut iterations = 0;
        while log_hi - log_lo > self.config.tolerance && iterations < self.config.max_iterations {
            let mid = 0.5 * (log_lo + log_hi);
            if score(mid.exp()) > 0.0 {
                log_lo = mid;
            } else {
                log_hi = mid;
            }
            iterations += 1;
        }
        if log_hi - log_lo > self.config.tolerance {
            return Err(estimation_failed(
                Family::NegativeBinomial,
                format!(
                    "bisection on r did not converge in {} iterations",
                    self.config.max_iterations
                ),
            ));
        }
        let r = (0.5 * (log_lo + log_hi)).exp();
        let p = mean / (r + mean);
        debug!(r, p, iterations, "negative binomial fit");
        NegativeBinomial::new(r, p)
    }
}

/// Fit `family` with its default estimator settings under `config`.
pub fn estimate_family(
    family: Family,
    samples: &WeightedSamples,
    config: FitConfig,
) -> Result<UnivariateDistribution> {
    let fitted: UnivariateDistribution = match family {
        Family::ChiSquare => ChiSquareEstimator::new(config).fit_weighted(samples)?.into(),
        Family::NegativeBinomial => NegativeBinomialEstimator::new(config)
            .fit_weighted(samples)?
            .into(),
        Family::Pareto => ParetoEstimator::default().fit_weighted(samples)?.into(),
        Family::Poisson => PoissonEstimator.fit_weighted(samples)?.into(),
        Family::Uniform => UniformEstimator.fit_weighted(samples)?.into(),
    };
    Ok(fitted)
}

//! Multivariate Gaussian, the component type for fitted mixtures.
//!
//! The covariance is stored row-major and factored once at construction
//! (Cholesky, `Σ = L Lᵀ`); density evaluation is then a triangular solve.

use rand::{Rng, RngCore};
use rand_distr::StandardNormal;
use serde::Serialize;

use crate::density::{Density, Sampler};
use crate::error::{DistError, Result};

const LN_2PI: f64 = 1.837_877_066_409_345_5;

/// Relative tolerance for the covariance symmetry check.
const SYMMETRY_TOL: f64 = 1e-9;

/// Gaussian with mean `μ` and covariance `Σ` in `d` dimensions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultivariateGaussian {
    mean: Vec<f64>,
    /// Row-major `d × d`.
    covariance: Vec<f64>,
    #[serde(skip)]
    cholesky: Vec<f64>,
    #[serde(skip)]
    log_norm: f64,
}

/// Lower-triangular `L` with `a = L Lᵀ`, row-major. `None` unless `a` is
/// positive definite.
fn cholesky(a: &[f64], d: usize) -> Option<Vec<f64>> {
    let mut l = vec![0.0; d * d];
    for i in 0..d {
        for j in 0..=i {
            let mut sum = a[i * d + j];
            for k in 0..j {
                sum -= l[i * d + k] * l[j * d + k];
            }
            if i == j {
                if sum <= 0.0 || !sum.is_finite() {
                    return None;
                }
                l[i * d + i] = sum.sqrt();
            } else {
                l[i * d + j] = sum / l[j * d + j];
            }
        }
    }
    Some(l)
}

impl MultivariateGaussian {
    /// Validates dimensions, finiteness, symmetry and positive definiteness.
    pub fn new(mean: Vec<f64>, covariance: Vec<f64>) -> Result<Self> {
        let d = mean.len();
        if d == 0 {
            return Err(DistError::DimensionMismatch {
                expected: 1,
                actual: 0,
            });
        }
        if covariance.len() != d * d {
            return Err(DistError::DimensionMismatch {
                expected: d * d,
                actual: covariance.len(),
            });
        }
        if mean.iter().chain(&covariance).any(|v| !v.is_finite()) {
            return Err(DistError::NotPositiveDefinite);
        }
        for i in 0..d {
            for j in (i + 1)..d {
                let (a, b) = (covariance[i * d + j], covariance[j * d + i]);
                if (a - b).abs() > SYMMETRY_TOL * a.abs().max(b.abs()).max(1.0) {
                    return Err(DistError::NotPositiveDefinite);
                }
            }
        }
        let cholesky = cholesky(&covariance, d).ok_or(DistError::NotPositiveDefinite)?;
        let log_det: f64 = (0..d).map(|i| cholesky[i * d + i].ln()).sum::<f64>() * 2.0;
        let log_norm = -0.5 * (d as f64 * LN_2PI + log_det);
        Ok(Self {
            mean,
            covariance,
            cholesky,
            log_norm,
        })
    }

    /// `N(μ, σ² I)`.
    pub fn isotropic(mean: Vec<f64>, variance: f64) -> Result<Self> {
        let d = mean.len();
        let mut covariance = vec![0.0; d * d];
        for i in 0..d {
            covariance[i * d + i] = variance;
        }
        Self::new(mean, covariance)
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Row-major covariance matrix.
    pub fn covariance(&self) -> &[f64] {
        &self.covariance
    }

    pub fn dimension(&self) -> usize {
        self.mean.len()
    }

    /// Log density at `x`, or `DimensionMismatch` if `x` has the wrong length.
    pub fn try_log_density(&self, x: &[f64]) -> Result<f64> {
        let d = self.dimension();
        if x.len() != d {
            return Err(DistError::DimensionMismatch {
                expected: d,
                actual: x.len(),
            });
        }
        // Forward substitution: L z = x - μ, quadratic form is |z|².
        let mut z = vec![0.0; d];
        let mut quad = 0.0;
        for i in 0..d {
            let mut sum = x[i] - self.mean[i];
            for k in 0..i {
                sum -= self.cholesky[i * d + k] * z[k];
            }
            z[i] = sum / self.cholesky[i * d + i];
            quad += z[i] * z[i];
        }
        Ok(self.log_norm - 0.5 * quad)
    }
}

impl Density for MultivariateGaussian {
    type Point = [f64];

    /// NaN when `x` has the wrong dimension.
    fn density(&self, x: &[f64]) -> f64 {
        self.log_density(x).exp()
    }

    fn log_density(&self, x: &[f64]) -> f64 {
        self.try_log_density(x).unwrap_or(f64::NAN)
    }
}

impl Sampler for MultivariateGaussian {
    type Output = Vec<f64>;

    /// `μ + L z` with `z` standard normal.
    fn sample(&self, rng: &mut dyn RngCore) -> Result<Vec<f64>> {
        let d = self.dimension();
        let z: Vec<f64> = (0..d).map(|_| rng.sample::<f64, _>(StandardNormal)).collect();
        let x = (0..d)
            .map(|i| {
                self.mean[i]
                    + (0..=i)
                        .map(|k| self.cholesky[i * d + k] * z[k])
                        .sum::<f64>()
            })
            .collect();
        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn standard_normal_density() {
        let g = MultivariateGaussian::isotropic(vec![0.0], 1.0).unwrap();
        assert!(approx_eq(g.density(&[0.0]), 0.398_942_280_401_432_7, 1e-15));
        assert!(approx_eq(g.log_density(&[1.0]), -0.5 * LN_2PI - 0.5, 1e-14));
    }

    #[test]
    fn correlated_density_matches_closed_form() {
        // Σ = [[2, 1], [1, 2]], det 3, Σ⁻¹ = [[2, -1], [-1, 2]] / 3
        let g = MultivariateGaussian::new(vec![1.0, -1.0], vec![2.0, 1.0, 1.0, 2.0]).unwrap();
        let (dx, dy) = (1.0, 2.0);
        let quad = (2.0 * dx * dx - 2.0 * dx * dy + 2.0 * dy * dy) / 3.0;
        let expected = -LN_2PI - 0.5 * 3.0f64.ln() - 0.5 * quad;
        assert!(approx_eq(g.log_density(&[2.0, 1.0]), expected, 1e-13));
    }

    #[test]
    fn rejects_bad_covariance() {
        assert_eq!(
            MultivariateGaussian::new(vec![0.0, 0.0], vec![1.0, 0.0, 0.0]),
            Err(DistError::DimensionMismatch {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            MultivariateGaussian::new(vec![0.0, 0.0], vec![1.0, 2.0, 2.0, 1.0]),
            Err(DistError::NotPositiveDefinite)
        );
        assert_eq!(
            MultivariateGaussian::new(vec![0.0, 0.0], vec![1.0, 0.5, 0.0, 1.0]),
            Err(DistError::NotPositiveDefinite)
        );
    }

    #[test]
    fn wrong_point_dimension() {
        let g = MultivariateGaussian::isotropic(vec![0.0, 0.0], 1.0).unwrap();
        assert!(g.density(&[0.0]).is_nan());
        assert!(matches!(
            g.try_log_density(&[0.0, 0.0, 0.0]),
            Err(DistError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn sample_moments() {
        let g = MultivariateGaussian::new(vec![3.0, -2.0], vec![1.0, 0.6, 0.6, 2.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let n = 20_000;
        let draws = g.sample_n(&mut rng, n).unwrap();
        let mean_x = draws.iter().map(|p| p[0]).sum::<f64>() / n as f64;
        let mean_y = draws.iter().map(|p| p[1]).sum::<f64>() / n as f64;
        let cov_xy = draws
            .iter()
            .map(|p| (p[0] - mean_x) * (p[1] - mean_y))
            .sum::<f64>()
            / n as f64;
        assert!(approx_eq(mean_x, 3.0, 0.05));
        assert!(approx_eq(mean_y, -2.0, 0.05));
        assert!(approx_eq(cov_xy, 0.6, 0.06));
    }
}

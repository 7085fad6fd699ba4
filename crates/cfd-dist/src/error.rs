//! Error types for distribution construction, decoding and estimation.

use thiserror::Error;

/// Result type for distribution operations.
pub type Result<T> = std::result::Result<T, DistError>;

/// Errors raised by distributions, mixtures and estimators.
///
/// Every error is raised before any state is mutated: a rejected setter,
/// decode or weight update leaves the target exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistError {
    /// A parameter lies outside its family's valid domain.
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Parameter-vector decode received no vector.
    #[error("parameter vector is missing")]
    MissingVector,

    /// Parameter-vector decode received the wrong number of entries.
    #[error("parameter vector has {actual} entries, expected {expected}")]
    VectorLength { expected: usize, actual: usize },

    /// Mixture weights and components have different lengths.
    #[error("mixture has {components} components but {weights} weights")]
    MixtureShape { components: usize, weights: usize },

    /// Mixture constructed without components.
    #[error("mixture requires at least one component")]
    EmptyMixture,

    /// Index outside a mixture's component range.
    #[error("index {index} out of range for {len} components")]
    IndexOutOfRange { index: usize, len: usize },

    /// Sample collection rejected by an estimator.
    #[error("invalid sample: {0}")]
    InvalidSample(String),

    /// Estimator could not produce a valid fit.
    #[error("estimation failed: {0}")]
    Estimation(String),

    /// Point or matrix dimension does not match the distribution.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Covariance is not symmetric positive definite.
    #[error("covariance matrix is not symmetric positive definite")]
    NotPositiveDefinite,

    /// The random source or sampler rejected the request.
    #[error("sampling failed: {0}")]
    Sampling(String),
}

impl DistError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        DistError::InvalidParameter {
            name,
            value,
            reason,
        }
    }

    /// Stable numeric code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            DistError::InvalidParameter { .. } => 20,
            DistError::MissingVector => 21,
            DistError::VectorLength { .. } => 22,
            DistError::MixtureShape { .. } => 23,
            DistError::EmptyMixture => 24,
            DistError::IndexOutOfRange { .. } => 25,
            DistError::InvalidSample(_) => 30,
            DistError::Estimation(_) => 31,
            DistError::DimensionMismatch { .. } => 40,
            DistError::NotPositiveDefinite => 41,
            DistError::Sampling(_) => 50,
        }
    }
}

/// Fails with `InvalidParameter` unless `value` is finite and strictly positive.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DistError::invalid(name, value, "must be finite and > 0"))
    }
}

/// Fails with `InvalidParameter` unless `value` is finite.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DistError::invalid(name, value, "must be finite"))
    }
}

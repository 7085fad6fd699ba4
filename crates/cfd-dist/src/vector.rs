//! Parameter-vector codec.
//!
//! Every distribution encodes its free parameters as a fixed-length ordered
//! vector of `f64` and can be restored from one:
//!
//! | Distribution | Vector order |
//! |---|---|
//! | ChiSquare | `[degrees_of_freedom]` |
//! | NegativeBinomial | `[r, p]` |
//! | Pareto | `[shape, scale, shift]` |
//! | Poisson | `[rate]` |
//! | Uniform | `[min, max]` |
//! | MixtureDensityModel | `[weight_0, ..., weight_{n-1}]` |

use serde::{Deserialize, Serialize};

use crate::error::{DistError, Result};

/// Ordered, fixed-length sequence of real parameters.
///
/// Serializes as a plain JSON array.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterVector(Vec<f64>);

impl ParameterVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Vector of `dimension` zeros.
    pub fn zeros(dimension: usize) -> Self {
        Self(vec![0.0; dimension])
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// Overwrite the entry at `index`.
    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        let len = self.0.len();
        match self.0.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(DistError::IndexOutOfRange { index, len }),
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for ParameterVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl From<&[f64]> for ParameterVector {
    fn from(values: &[f64]) -> Self {
        Self(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for ParameterVector {
    fn from(values: [f64; N]) -> Self {
        Self(values.to_vec())
    }
}

impl std::fmt::Display for ParameterVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]")
    }
}

/// Types whose free parameters round-trip through a [`ParameterVector`].
pub trait Parameterized {
    /// Number of entries in the encoded vector.
    fn arity(&self) -> usize;

    /// Encode the current parameters in the documented order.
    fn parameters(&self) -> ParameterVector;

    /// Validate every value, then overwrite the parameters.
    ///
    /// Implementations must leave `self` untouched on error.
    fn apply_parameters(&mut self, values: &[f64]) -> Result<()>;

    /// Decode a vector produced by [`Parameterized::parameters`].
    ///
    /// Fails on a missing vector or a length different from
    /// [`Parameterized::arity`]; no partial mutation occurs.
    fn decode(&mut self, vector: Option<&ParameterVector>) -> Result<()> {
        let vector = vector.ok_or(DistError::MissingVector)?;
        let expected = self.arity();
        if vector.dimension() != expected {
            return Err(DistError::VectorLength {
                expected,
                actual: vector.dimension(),
            });
        }
        self.apply_parameters(vector.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Pair {
        a: f64,
        b: f64,
    }

    impl Parameterized for Pair {
        fn arity(&self) -> usize {
            2
        }

        fn parameters(&self) -> ParameterVector {
            ParameterVector::from([self.a, self.b])
        }

        fn apply_parameters(&mut self, values: &[f64]) -> Result<()> {
            let &[a, b] = values else {
                return Err(DistError::VectorLength {
                    expected: 2,
                    actual: values.len(),
                });
            };
            if b < 0.0 {
                return Err(DistError::invalid("b", b, "must be >= 0"));
            }
            self.a = a;
            self.b = b;
            Ok(())
        }
    }

    #[test]
    fn indexed_access() {
        let mut v = ParameterVector::zeros(3);
        assert_eq!(v.dimension(), 3);
        v.set(1, 2.5).unwrap();
        assert_eq!(v.get(1), Some(2.5));
        assert_eq!(v.get(3), None);
        assert!(matches!(
            v.set(3, 1.0),
            Err(DistError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn decode_rejects_missing_vector() {
        let mut p = Pair { a: 1.0, b: 2.0 };
        assert_eq!(p.decode(None), Err(DistError::MissingVector));
        assert_eq!(p, Pair { a: 1.0, b: 2.0 });
    }

    #[test]
    fn decode_rejects_wrong_length_without_mutation() {
        let mut p = Pair { a: 1.0, b: 2.0 };
        let short = ParameterVector::from([9.0]);
        assert_eq!(
            p.decode(Some(&short)),
            Err(DistError::VectorLength {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(p, Pair { a: 1.0, b: 2.0 });
    }

    #[test]
    fn decode_rejects_invalid_value_without_partial_write() {
        let mut p = Pair { a: 1.0, b: 2.0 };
        let bad = ParameterVector::from([5.0, -1.0]);
        assert!(p.decode(Some(&bad)).is_err());
        assert_eq!(p, Pair { a: 1.0, b: 2.0 });
    }

    #[test]
    fn serializes_as_plain_array() {
        let v = ParameterVector::from([10.0, 0.4]);
        assert_eq!(serde_json::to_string(&v).unwrap(), "[10.0,0.4]");
        let back: ParameterVector = serde_json::from_str("[1.5, 2]").unwrap();
        assert_eq!(back.as_slice(), &[1.5, 2.0]);
        assert_eq!(v.to_string(), "[10, 0.4]");
    }
}

//! Finite integer supports for the discrete families.

use std::ops::RangeInclusive;

use serde::Serialize;
use tracing::warn;

/// Enumeration stops once the cumulative mass reaches `1 - DOMAIN_TAIL_EPSILON`.
pub const DOMAIN_TAIL_EPSILON: f64 = 1e-12;

/// Hard upper bound on the last enumerated point.
pub const MAX_DOMAIN_LAST: i64 = 1 << 30;

/// Contiguous, enumerable integer support `first..=last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct IntegerDomain {
    first: i64,
    last: i64,
}

impl IntegerDomain {
    /// Domain `first..=last`; the bounds are swapped if given inverted.
    pub fn new(first: i64, last: i64) -> Self {
        Self {
            first: first.min(last),
            last: first.max(last),
        }
    }

    pub fn first(&self) -> i64 {
        self.first
    }

    pub fn last(&self) -> i64 {
        self.last
    }

    /// Number of points in the domain (always at least one).
    pub fn len(&self) -> usize {
        (self.last - self.first) as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, k: i64) -> bool {
        (self.first..=self.last).contains(&k)
    }

    pub fn iter(&self) -> RangeInclusive<i64> {
        self.first..=self.last
    }

    /// Support `0..=last` where `last` is the smallest point whose CDF
    /// reaches `1 - DOMAIN_TAIL_EPSILON`.
    ///
    /// `cdf` must be non-decreasing. The search gallops then bisects, so
    /// the CDF is evaluated O(log last) times.
    pub(crate) fn from_cdf<F>(cdf: F) -> Self
    where
        F: Fn(i64) -> f64,
    {
        let target = 1.0 - DOMAIN_TAIL_EPSILON;
        if cdf(0) >= target {
            return Self::new(0, 0);
        }

        // Invariant: cdf(lo) < target.
        let mut lo = 0;
        let mut hi = 1;
        while cdf(hi) < target {
            if hi >= MAX_DOMAIN_LAST {
                warn!(
                    last = MAX_DOMAIN_LAST,
                    cdf_at_last = cdf(MAX_DOMAIN_LAST),
                    "integer domain truncated before mass saturated"
                );
                return Self::new(0, MAX_DOMAIN_LAST);
            }
            lo = hi;
            hi = (hi * 2).min(MAX_DOMAIN_LAST);
        }

        // Invariant: cdf(lo) < target <= cdf(hi).
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if cdf(mid) >= target {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        Self::new(0, hi)
    }
}

impl IntoIterator for IntegerDomain {
    type Item = i64;
    type IntoIter = RangeInclusive<i64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &IntegerDomain {
    type Item = i64;
    type IntoIter = RangeInclusive<i64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

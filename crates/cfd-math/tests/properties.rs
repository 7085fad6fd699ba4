//! Property-based tests for cfd-math special functions.
//!
//! Uses proptest to verify identities hold across many random inputs.

use proptest::prelude::*;
use cfd_math::{
    beta_reg, digamma, gamma_p, gamma_q, log_beta, log_gamma, log_sum_exp,
    trigamma,
};

/// Tolerance for floating point comparisons.
const TOL: f64 = 1e-10;

/// Extended tolerance where the Lanczos approximation contributes error.
const LGAMMA_TOL: f64 = 1e-8;

/// Helper to check approximate equality.
fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    if a.is_infinite() && b.is_infinite() {
        return a.signum() == b.signum();
    }
    if a.is_infinite() || b.is_infinite() {
        return false;
    }
    (a - b).abs() <= tol.max(tol * a.abs().max(b.abs()))
}

// ============================================================================
// log_sum_exp properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Order of the inputs does not matter.
    #[test]
    fn log_sum_exp_commutative(a in -100.0..100.0f64, b in -100.0..100.0f64) {
        let ab = log_sum_exp(&[a, b]);
        let ba = log_sum_exp(&[b, a]);
        prop_assert!(approx_eq(ab, ba, TOL), "lse([{},{}])={} != {}", a, b, ab, ba);
    }

    /// No overflow for large arguments, result bounded below by the max.
    #[test]
    fn log_sum_exp_no_overflow(a in 500.0..700.0f64, b in 500.0..700.0f64) {
        let result = log_sum_exp(&[a, b]);
        prop_assert!(result.is_finite(), "lse([{},{}]) should be finite", a, b);
        prop_assert!(result >= a.max(b) - TOL);
        prop_assert!(result <= a.max(b) + 2.0f64.ln() + TOL);
    }
}

// ============================================================================
// log_gamma / log_beta properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Recurrence: log_gamma(x+1) = log_gamma(x) + ln(x).
    #[test]
    fn log_gamma_recurrence(x in 0.1..100.0f64) {
        let lhs = log_gamma(x + 1.0);
        let rhs = log_gamma(x) + x.ln();
        prop_assert!(approx_eq(lhs, rhs, LGAMMA_TOL), "lg({})={} vs {}", x + 1.0, lhs, rhs);
    }

    /// log_beta is symmetric.
    #[test]
    fn log_beta_symmetric(a in 0.1..50.0f64, b in 0.1..50.0f64) {
        prop_assert!(approx_eq(log_beta(a, b), log_beta(b, a), LGAMMA_TOL));
    }
}

// ============================================================================
// Polygamma properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Recurrence: digamma(x+1) = digamma(x) + 1/x.
    #[test]
    fn digamma_recurrence(x in 0.05..200.0f64) {
        let lhs = digamma(x + 1.0);
        let rhs = digamma(x) + 1.0 / x;
        prop_assert!(approx_eq(lhs, rhs, TOL), "psi({})={} vs {}", x + 1.0, lhs, rhs);
    }

    /// Trigamma is positive and decreasing on the positive axis.
    #[test]
    fn trigamma_positive_decreasing(x in 0.05..200.0f64) {
        let t0 = trigamma(x);
        let t1 = trigamma(x + 0.5);
        prop_assert!(t0 > 0.0 && t1 > 0.0);
        prop_assert!(t1 < t0, "trigamma({})={} should be < trigamma({})={}", x + 0.5, t1, x, t0);
    }
}

// ============================================================================
// Incomplete gamma / beta properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// P and Q are complementary probabilities.
    #[test]
    fn gamma_p_q_complement(a in 0.05..80.0f64, x in 0.0..160.0f64) {
        let p = gamma_p(a, x);
        let q = gamma_q(a, x);
        prop_assert!((0.0..=1.0).contains(&p) && (0.0..=1.0).contains(&q));
        prop_assert!(approx_eq(p + q, 1.0, 1e-12), "P+Q at ({},{}) = {}", a, x, p + q);
    }

    /// P(a, x) is non-decreasing in x.
    #[test]
    fn gamma_p_monotone(a in 0.05..50.0f64, x in 0.0..100.0f64, dx in 0.0..10.0f64) {
        prop_assert!(gamma_p(a, x + dx) + 1e-12 >= gamma_p(a, x));
    }

    /// I_x(a, b) = 1 - I_{1-x}(b, a).
    #[test]
    fn beta_reg_symmetry(x in 0.001..0.999f64, a in 0.1..40.0f64, b in 0.1..40.0f64) {
        let lhs = beta_reg(x, a, b);
        let rhs = 1.0 - beta_reg(1.0 - x, b, a);
        prop_assert!(approx_eq(lhs, rhs, 1e-10), "I_{}({},{})={} vs {}", x, a, b, lhs, rhs);
    }
}

// ============================================================================
// Edge case tests
// ============================================================================

#[test]
fn edge_case_empty_log_sum_exp() {
    assert_eq!(log_sum_exp(&[]), f64::NEG_INFINITY);
}

#[test]
fn edge_case_nan_propagation() {
    assert!(log_sum_exp(&[1.0, f64::NAN]).is_nan());
    assert!(log_gamma(f64::NAN).is_nan());
    assert!(digamma(f64::NAN).is_nan());
    assert!(gamma_p(f64::NAN, 1.0).is_nan());
    assert!(beta_reg(0.5, f64::NAN, 1.0).is_nan());
}

#[test]
fn edge_case_log_gamma_negative_integers() {
    assert!(log_gamma(0.0).is_nan());
    assert!(log_gamma(-1.0).is_nan());
    assert!(log_gamma(-10.0).is_nan());
}

//! Magnitude-dependent slack for tolerance comparisons.
//!
//! Coordinates in projected reference systems routinely reach 10^6 to 10^7.
//! At these magnitudes a value computed through a different sequence of
//! floating-point operations may differ from the "same" value by several
//! units in the last place. The significance epsilon bounds that drift so
//! that a point lying within tolerance of an endpoint is not rejected
//! because of rounding.

/// Number of units in the last place of the largest operand that are
/// considered noise.
const SIGNIFICANCE_ULPS: f64 = 64.0;

/// Returns the significance epsilon for a set of operand values.
///
/// The result scales with the largest absolute value (at least 1.0), so it is
/// about `1.4e-14` for unit-scale data and about `3.7e-8` for coordinates
/// around `2.6e6`.
#[must_use]
pub fn significance_epsilon(values: &[f64]) -> f64 {
    let magnitude = values
        .iter()
        .filter(|v| v.is_finite())
        .fold(1.0_f64, |acc, v| acc.max(v.abs()));
    magnitude * f64::EPSILON * SIGNIFICANCE_ULPS
}

/// Returns `true` if `a` and `b` differ by at most `tolerance` plus the
/// significance epsilon of both values.
#[must_use]
pub fn are_equal(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance + significance_epsilon(&[a, b])
}

/// Returns `true` if `value` is within `tolerance` of zero, allowing for the
/// significance epsilon of `reference`.
#[must_use]
pub fn is_within(value: f64, tolerance: f64, reference: f64) -> bool {
    value.abs() <= tolerance + significance_epsilon(&[reference])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn epsilon_grows_with_magnitude() {
        let small = significance_epsilon(&[1.0, 2.0]);
        let large = significance_epsilon(&[2_600_000.0, 1_200_000.0]);
        assert!(small < 1e-13);
        assert!(large > 1e-8);
        assert!(large < 1e-7);
    }

    #[test]
    fn epsilon_ignores_non_finite() {
        let eps = significance_epsilon(&[f64::NAN, f64::INFINITY, 3.0]);
        assert!((eps - 3.0 * f64::EPSILON * SIGNIFICANCE_ULPS).abs() < 1e-20);
    }

    #[test]
    fn equality_tolerates_rounding_at_large_magnitude() {
        let a = 2_600_000.1;
        let b = a + 3.0 * f64::EPSILON * a;
        assert!(are_equal(a, b, 0.0));
        assert!(!are_equal(a, a + 1e-3, 0.0));
    }

    #[test]
    fn within_uses_reference_magnitude() {
        assert!(is_within(1e-9, 0.0, 2_600_000.0));
        assert!(!is_within(1e-9, 0.0, 1.0));
        assert!(is_within(0.01, 0.01, 1.0));
    }
}

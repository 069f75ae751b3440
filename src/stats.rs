//! Standard normal distribution helpers.
//!
//! Thin wrappers over the complementary error function from `statrs`. Values
//! are accurate to about 1e-11 absolute; far tails keep their relative
//! precision instead of rounding to zero:
//!
//! - [`norm_cdf`]: Φ(x)
//! - [`norm_sf`]: 1 - Φ(x)
//! - [`norm_ppf`]: Φ⁻¹(p)
//! - [`norm_isf`]: Φ⁻¹(1 - p)
//! - [`critical_value`]: the z cut-off for a significance level and tail type

use std::f64::consts::SQRT_2;

use statrs::function::erf::{erfc, erfc_inv};

use crate::option::Alternative;

/// Cumulative distribution function of the standard normal.
#[must_use]
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Survival function of the standard normal.
#[must_use]
pub fn norm_sf(x: f64) -> f64 {
    0.5 * erfc(x / SQRT_2)
}

/// Quantile function of the standard normal.
///
/// Returns `-inf`/`inf` at 0 and 1, NaN outside `[0, 1]`.
#[must_use]
pub fn norm_ppf(p: f64) -> f64 {
    -norm_isf(p)
}

/// Inverse survival function of the standard normal.
#[must_use]
pub fn norm_isf(p: f64) -> f64 {
    if !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    SQRT_2 * erfc_inv(2.0 * p)
}

/// Critical value of a z-test: `z_{1-α/2}` when two-sided, `z_{1-α}` when
/// one-sided.
///
/// ```
/// use statpower::option::Alternative;
/// use statpower::stats::critical_value;
///
/// assert!((critical_value(0.05, Alternative::TwoSided) - 1.959_964).abs() < 1e-6);
/// assert!((critical_value(0.05, Alternative::OneSided) - 1.644_854).abs() < 1e-6);
/// ```
#[must_use]
pub fn critical_value(alpha: f64, alternative: Alternative) -> f64 {
    match alternative {
        Alternative::TwoSided => norm_isf(alpha / 2.0),
        Alternative::OneSided => norm_isf(alpha),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_cdf_known_values() {
        assert!(close(norm_cdf(0.0), 0.5, 1e-15));
        assert!(close(norm_cdf(1.959_963_984_540_054), 0.975, 1e-10));
        assert!(close(norm_cdf(-1.0), 0.158_655_253_931_457_05, 1e-10));
        assert!(close(norm_sf(1.0), 0.158_655_253_931_457_05, 1e-10));
        assert!(close(norm_cdf(-1.0), norm_sf(1.0), 1e-15));
    }

    #[test]
    fn test_tails_keep_precision() {
        // 1 - cdf(10) would round to zero
        assert!(norm_sf(10.0) > 0.0);
        assert!(close(norm_sf(10.0) / 7.619_853_024_160_527e-24, 1.0, 1e-8));
        assert_eq!(norm_sf(10.0), norm_cdf(-10.0));
    }

    #[test]
    fn test_quantiles() {
        assert!(close(norm_ppf(0.975), 1.959_963_984_540_054, 1e-9));
        assert!(close(norm_isf(0.025), 1.959_963_984_540_054, 1e-9));
        assert!(close(norm_ppf(0.5), 0.0, 1e-12));
        assert!(norm_isf(1.5).is_nan());
        for p in [1e-8, 0.01, 0.2, 0.5, 0.9, 0.999] {
            assert!(close(norm_cdf(norm_ppf(p)), p, 1e-9 * p.max(1e-3)));
        }
    }

    #[test]
    fn test_critical_value() {
        assert!(close(
            critical_value(0.05, Alternative::TwoSided),
            norm_isf(0.025),
            1e-15
        ));
        assert!(close(
            critical_value(0.1, Alternative::OneSided),
            1.281_551_565_544_600_4,
            1e-9
        ));
    }
}

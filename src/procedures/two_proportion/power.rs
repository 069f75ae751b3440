//! Power functions of the two-sample proportion z-tests.

use crate::error::Result;
use crate::numeric::{Alpha, Proportion, Size};
use crate::option::{option_enum, Alternative};
use crate::stats::{critical_value, norm_cdf, norm_sf};

use super::GroupSizes;

option_enum! {
    /// Test statistic used for the two-sample proportion test.
    #[derive(Default)]
    pub enum TestType("two-proportion test type") {
        /// Z-test with the pooled variance under the null.
        #[default]
        ZTestPooled => ["Z_TEST_POOLED"],
        /// Z-test with the unpooled variance.
        ZTestUnpooled => ["Z_TEST_UNPOOLED"],
        /// Pooled z-test with continuity correction.
        ZTestCcPooled => ["Z_TEST_CC_POOLED"],
        /// Unpooled z-test with continuity correction.
        ZTestCcUnpooled => ["Z_TEST_CC_UNPOOLED"],
    }
}

impl TestType {
    fn pooled(self) -> bool {
        matches!(self, Self::ZTestPooled | Self::ZTestCcPooled)
    }

    fn continuity_corrected(self) -> bool {
        matches!(self, Self::ZTestCcPooled | Self::ZTestCcUnpooled)
    }
}

/// Achieved power; inputs are assumed to lie in their domains.
pub(crate) fn achieved_power(
    sizes: GroupSizes,
    alpha: f64,
    treatment_proportion: f64,
    reference_proportion: f64,
    alternative: Alternative,
    test_type: TestType,
) -> f64 {
    let (n1, n2) = (sizes.treatment, sizes.reference);
    let (p1, p2) = (treatment_proportion, reference_proportion);
    let delta = p1 - p2;

    let sd_alternative = (p1 * (1.0 - p1) / n1 + p2 * (1.0 - p2) / n2).sqrt();
    let sd_null = if test_type.pooled() {
        let pooled = (n1 * p1 + n2 * p2) / (n1 + n2);
        (pooled * (1.0 - pooled) * (1.0 / n1 + 1.0 / n2)).sqrt()
    } else {
        sd_alternative
    };
    let correction = if test_type.continuity_corrected() {
        (1.0 / n1 + 1.0 / n2) / 2.0
    } else {
        0.0
    };

    let z = critical_value(alpha, alternative);
    let upper = norm_sf((z * sd_null + correction - delta) / sd_alternative);
    let lower = norm_cdf((-z * sd_null - correction - delta) / sd_alternative);

    match alternative {
        Alternative::TwoSided => upper + lower,
        Alternative::OneSided if delta >= 0.0 => upper,
        Alternative::OneSided => lower,
    }
}

/// Power of the two-sample proportion test.
///
/// # Errors
///
/// Returns an error if any input lies outside its domain.
///
/// # Example
///
/// ```
/// use statpower::option::Alternative;
/// use statpower::procedures::two_proportion::{power, TestType};
///
/// let achieved = power(50.0, 50.0, 0.05, 0.80, 0.95, Alternative::TwoSided, TestType::ZTestPooled).unwrap();
/// assert!((achieved - 0.62402759).abs() < 1e-8);
/// ```
pub fn power(
    treatment_size: f64,
    reference_size: f64,
    alpha: f64,
    treatment_proportion: f64,
    reference_proportion: f64,
    alternative: Alternative,
    test_type: TestType,
) -> Result<f64> {
    let sizes = GroupSizes::new(
        Size::new(treatment_size)?.get(),
        Size::new(reference_size)?.get(),
    );
    Ok(achieved_power(
        sizes,
        Alpha::new(alpha)?.get(),
        Proportion::new(treatment_proportion)?.get(),
        Proportion::new(reference_proportion)?.get(),
        alternative,
        test_type,
    ))
}

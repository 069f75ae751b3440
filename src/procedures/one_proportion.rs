//! One-sample proportion test.
//!
//! Tests H0: p = p0 against a single binomial proportion p1, observed on
//! `size` subjects. Any one of size, alpha, power, the null proportion or
//! the actual proportion can be solved for.
//!
//! # Example
//!
//! ```
//! use statpower::option::Alternative;
//! use statpower::procedures::one_proportion::{self, OneProportion, TestType};
//!
//! // Scalar entry point
//! let size = one_proportion::solve_for_sample_size(
//!     0.05, 0.80, 0.80, 0.95, Alternative::TwoSided, TestType::ExactTest,
//! ).unwrap();
//! assert_eq!(size, 42);
//!
//! // Builder with full output
//! let solution = OneProportion::new()
//!     .alpha(0.05)
//!     .power(0.80)
//!     .null_proportion(0.80)
//!     .proportion(0.95)
//!     .dropout_rate(0.10)
//!     .solve()
//!     .unwrap();
//! assert_eq!(solution.sample_size(), 42);
//! assert_eq!(solution.size_include_dropouts, 47);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::check_search_direction;
use crate::error::{Error, Result};
use crate::numeric::{
    ceil_size, inflate_for_dropout, Alpha, AlphaTag, Bounded, Domain, DropOutRate, PowerTag,
    Proportion, ProportionTag, Size, SizeTag,
};
use crate::option::{option_enum, Alternative, SearchDirection};
use crate::param::{find_unknown, Param};
use crate::solver::{find_root, SolverConfig};
use crate::stats::{critical_value, norm_cdf, norm_sf};
use crate::table::PowerCurve;

option_enum! {
    /// Test statistic used for the one-sample proportion test.
    #[derive(Default)]
    pub enum TestType("one-proportion test type") {
        /// Exact binomial test, evaluated through its normal approximation
        /// with the null variance.
        #[default]
        ExactTest => ["EXACT_TEST"],
        /// Z-test with the standard error under the null proportion.
        ZTestUsingSP0 => ["Z_TEST_USING_S_P0"],
        /// As [`TestType::ZTestUsingSP0`] with continuity correction.
        ZTestUsingSP0Cc => ["Z_TEST_USING_S_P0_CC"],
        /// Z-test with the standard error of the sample proportion.
        ZTestUsingSPhat => ["Z_TEST_USING_S_PHAT"],
        /// As [`TestType::ZTestUsingSPhat`] with continuity correction.
        ZTestUsingSPhatCc => ["Z_TEST_USING_S_PHAT_CC"],
    }
}

impl TestType {
    fn uses_sample_variance(self) -> bool {
        matches!(self, Self::ZTestUsingSPhat | Self::ZTestUsingSPhatCc)
    }

    fn continuity_corrected(self) -> bool {
        matches!(self, Self::ZTestUsingSP0Cc | Self::ZTestUsingSPhatCc)
    }
}

option_enum! {
    /// The parameter being solved for.
    pub enum Target("target") {
        /// Number of subjects.
        Size => ["size", "sample_size"],
        /// Significance level.
        Alpha => ["alpha"],
        /// Statistical power.
        Power => ["power"],
        /// Proportion under the null hypothesis.
        NullProportion => ["null_proportion", "nullproportion"],
        /// Actual proportion.
        Proportion => ["proportion"],
    }
}

/// Achieved power; inputs are assumed to lie in their domains.
fn achieved_power(
    size: f64,
    alpha: f64,
    null_proportion: f64,
    proportion: f64,
    alternative: Alternative,
    test_type: TestType,
) -> f64 {
    let (p0, p1) = (null_proportion, proportion);
    let s0 = (p0 * (1.0 - p0) / size).sqrt();
    let s1 = (p1 * (1.0 - p1) / size).sqrt();
    let null_sd = if test_type.uses_sample_variance() { s1 } else { s0 };
    let correction = if test_type.continuity_corrected() {
        1.0 / (2.0 * size)
    } else {
        0.0
    };

    let z = critical_value(alpha, alternative);
    let upper = norm_sf((p0 - p1 + correction + z * null_sd) / s1);
    let lower = norm_cdf((p0 - p1 - correction - z * null_sd) / s1);

    match alternative {
        Alternative::TwoSided => upper + lower,
        Alternative::OneSided if p1 >= p0 => upper,
        Alternative::OneSided => lower,
    }
}

/// Power of the one-sample proportion test.
///
/// # Errors
///
/// Returns an error if any input lies outside its domain.
///
/// # Example
///
/// ```
/// use statpower::option::Alternative;
/// use statpower::procedures::one_proportion::{power, TestType};
///
/// let achieved = power(42.0, 0.05, 0.80, 0.95, Alternative::TwoSided, TestType::ExactTest).unwrap();
/// assert!((achieved - 0.80598).abs() < 1e-5);
/// ```
pub fn power(
    size: f64,
    alpha: f64,
    null_proportion: f64,
    proportion: f64,
    alternative: Alternative,
    test_type: TestType,
) -> Result<f64> {
    Ok(achieved_power(
        Size::new(size)?.get(),
        Alpha::new(alpha)?.get(),
        Proportion::new(null_proportion)?.get(),
        Proportion::new(proportion)?.get(),
        alternative,
        test_type,
    ))
}

/// Parameter values at which the power function is evaluated.
#[derive(Debug, Clone, Copy)]
struct Point {
    size: f64,
    alpha: f64,
    power: f64,
    null_proportion: f64,
    proportion: f64,
}

impl Point {
    fn with(mut self, target: Target, value: f64) -> Self {
        *self.slot(target) = value;
        self
    }

    fn slot(&mut self, target: Target) -> &mut f64 {
        match target {
            Target::Size => &mut self.size,
            Target::Alpha => &mut self.alpha,
            Target::Power => &mut self.power,
            Target::NullProportion => &mut self.null_proportion,
            Target::Proportion => &mut self.proportion,
        }
    }

    fn achieved(&self, alternative: Alternative, test_type: TestType) -> f64 {
        achieved_power(
            self.size,
            self.alpha,
            self.null_proportion,
            self.proportion,
            alternative,
            test_type,
        )
    }
}

/// Validated value of `param`, NaN while it is the unknown.
fn value_of<D: Domain>(param: Param) -> Result<f64> {
    Ok(param.bounded::<D>()?.map_or(f64::NAN, Bounded::get))
}

/// One-sample proportion design.
///
/// Setters are infallible; every value is validated by [`OneProportion::solve`].
/// All five parameters start out unknown, and exactly one must remain so.
///
/// ```
/// use statpower::option::{Alternative, SearchDirection};
/// use statpower::procedures::one_proportion::{OneProportion, Target, TestType};
///
/// let solution = OneProportion::new()
///     .size(42.0)
///     .alpha(0.05)
///     .power(0.80)
///     .null_proportion(0.80)
///     .alternative(Alternative::OneSided)
///     .test_type(TestType::ZTestUsingSP0Cc)
///     .search_direction(SearchDirection::Greater)
///     .solve()
///     .unwrap();
///
/// assert_eq!(solution.target, Target::Proportion);
/// assert!((solution.value() - 0.9434).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OneProportion {
    size: Param,
    alpha: Param,
    power: Param,
    null_proportion: Param,
    proportion: Param,
    alternative: Alternative,
    test_type: TestType,
    search_direction: Option<SearchDirection>,
    dropout_rate: f64,
    solver: SolverConfig,
}

impl OneProportion {
    /// Create a design with every parameter unknown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sample size.
    #[must_use]
    pub fn size(mut self, size: impl Into<Param>) -> Self {
        self.size = size.into();
        self
    }

    /// Set the significance level.
    #[must_use]
    pub fn alpha(mut self, alpha: impl Into<Param>) -> Self {
        self.alpha = alpha.into();
        self
    }

    /// Set the requested power.
    #[must_use]
    pub fn power(mut self, power: impl Into<Param>) -> Self {
        self.power = power.into();
        self
    }

    /// Set the proportion under the null hypothesis.
    #[must_use]
    pub fn null_proportion(mut self, null_proportion: impl Into<Param>) -> Self {
        self.null_proportion = null_proportion.into();
        self
    }

    /// Set the actual proportion.
    #[must_use]
    pub fn proportion(mut self, proportion: impl Into<Param>) -> Self {
        self.proportion = proportion.into();
        self
    }

    /// Set the alternative hypothesis. Default is two-sided.
    #[must_use]
    pub fn alternative(mut self, alternative: Alternative) -> Self {
        self.alternative = alternative;
        self
    }

    /// Set the test statistic. Default is the exact test.
    #[must_use]
    pub fn test_type(mut self, test_type: TestType) -> Self {
        self.test_type = test_type;
        self
    }

    /// Set the side to search on; required when solving for a proportion.
    #[must_use]
    pub fn search_direction(mut self, search_direction: SearchDirection) -> Self {
        self.search_direction = Some(search_direction);
        self
    }

    /// Set the expected dropout rate used to inflate the reported size.
    #[must_use]
    pub fn dropout_rate(mut self, dropout_rate: f64) -> Self {
        self.dropout_rate = dropout_rate;
        self
    }

    /// Override the root search tolerances.
    #[must_use]
    pub fn solver_config(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// The parameter left unknown.
    ///
    /// # Errors
    ///
    /// [`Error::TargetNotExist`] if every parameter is fixed,
    /// [`Error::TargetNotUnique`] if more than one is unknown.
    pub fn target(&self) -> Result<Target> {
        find_unknown(&[
            (Target::Size, "size", self.size),
            (Target::Alpha, "alpha", self.alpha),
            (Target::Power, "power", self.power),
            (Target::NullProportion, "null_proportion", self.null_proportion),
            (Target::Proportion, "proportion", self.proportion),
        ])?
        .ok_or(Error::TargetNotExist)
    }

    /// Solve for the unknown parameter.
    ///
    /// # Errors
    ///
    /// - Target errors from [`OneProportion::target`]
    /// - Domain errors for any fixed value out of range
    /// - [`Error::ParameterEmpty`] if a proportion is solved for without a
    ///   search direction, [`Error::SearchDirectionNotApplicable`] if one is
    ///   given for any other target
    /// - [`Error::SolutionNotFound`] if no value reaches the requested power
    pub fn solve(&self) -> Result<OneProportionSolution> {
        let target = self.target()?;
        let search_direction = check_search_direction(
            target.as_str(),
            matches!(target, Target::NullProportion | Target::Proportion),
            self.search_direction,
        )?;
        let dropout_rate = DropOutRate::new(self.dropout_rate)?;

        let point = Point {
            size: value_of::<SizeTag>(self.size)?,
            alpha: value_of::<AlphaTag>(self.alpha)?,
            power: value_of::<PowerTag>(self.power)?,
            null_proportion: value_of::<ProportionTag>(self.null_proportion)?,
            proportion: value_of::<ProportionTag>(self.proportion)?,
        };
        debug!(design = "one proportion", %target, "solving");

        let (alternative, test_type) = (self.alternative, self.test_type);
        let value = match target {
            Target::Power => point.achieved(alternative, test_type),
            _ => {
                let (lower, upper) = match (target, search_direction) {
                    (Target::Size, _) => Size::pseudo_bound(),
                    (Target::Alpha, _) => Alpha::pseudo_bound(),
                    (Target::NullProportion, Some(direction)) => {
                        direction.bracket(point.proportion, Proportion::pseudo_bound())
                    }
                    (Target::Proportion, Some(direction)) => {
                        direction.bracket(point.null_proportion, Proportion::pseudo_bound())
                    }
                    _ => {
                        return Err(Error::ParameterEmpty {
                            name: "search direction",
                        })
                    }
                };
                find_root(
                    target.as_str(),
                    |x| point.with(target, x).achieved(alternative, test_type) - point.power,
                    lower,
                    upper,
                    &self.solver,
                )?
            }
        };

        let point = point.with(target, value);
        Ok(OneProportionSolution {
            target,
            size: point.size,
            alpha: point.alpha,
            power: point.power,
            null_proportion: point.null_proportion,
            proportion: point.proportion,
            alternative,
            test_type,
            search_direction,
            dropout_rate: dropout_rate.get(),
            size_include_dropouts: inflate_for_dropout(point.size, dropout_rate),
        })
    }
}

impl PowerCurve for OneProportion {
    fn name(&self) -> &'static str {
        "one proportion"
    }

    fn power_at(&self, size: f64, alpha: f64) -> Result<f64> {
        power(
            size,
            alpha,
            self.null_proportion.require::<ProportionTag>()?.get(),
            self.proportion.require::<ProportionTag>()?.get(),
            self.alternative,
            self.test_type,
        )
    }
}

/// Full output of a one-sample proportion solve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OneProportionSolution {
    /// The parameter that was solved for.
    pub target: Target,
    /// Sample size before rounding.
    pub size: f64,
    /// Significance level.
    pub alpha: f64,
    /// Power; achieved power when it was the target.
    pub power: f64,
    /// Proportion under the null hypothesis.
    pub null_proportion: f64,
    /// Actual proportion.
    pub proportion: f64,
    /// Alternative hypothesis.
    pub alternative: Alternative,
    /// Test statistic.
    pub test_type: TestType,
    /// Side searched when a proportion was the target.
    pub search_direction: Option<SearchDirection>,
    /// Expected dropout rate.
    pub dropout_rate: f64,
    /// Rounded size inflated for dropouts.
    pub size_include_dropouts: u64,
}

impl OneProportionSolution {
    /// The solved value.
    #[must_use]
    pub fn value(&self) -> f64 {
        match self.target {
            Target::Size => self.size,
            Target::Alpha => self.alpha,
            Target::Power => self.power,
            Target::NullProportion => self.null_proportion,
            Target::Proportion => self.proportion,
        }
    }

    /// Sample size rounded up to whole subjects.
    #[must_use]
    pub fn sample_size(&self) -> u64 {
        ceil_size(self.size)
    }
}

/// Smallest sample size reaching `power`.
///
/// # Errors
///
/// See [`OneProportion::solve`].
pub fn solve_for_sample_size(
    alpha: f64,
    power: f64,
    null_proportion: f64,
    proportion: f64,
    alternative: Alternative,
    test_type: TestType,
) -> Result<u64> {
    OneProportion::new()
        .alpha(alpha)
        .power(power)
        .null_proportion(null_proportion)
        .proportion(proportion)
        .alternative(alternative)
        .test_type(test_type)
        .solve()
        .map(|solution| solution.sample_size())
}

/// Significance level at which `size` subjects reach `power`.
///
/// # Errors
///
/// See [`OneProportion::solve`].
pub fn solve_for_alpha(
    size: f64,
    power: f64,
    null_proportion: f64,
    proportion: f64,
    alternative: Alternative,
    test_type: TestType,
) -> Result<f64> {
    OneProportion::new()
        .size(size)
        .power(power)
        .null_proportion(null_proportion)
        .proportion(proportion)
        .alternative(alternative)
        .test_type(test_type)
        .solve()
        .map(|solution| solution.alpha)
}

/// Power achieved by `size` subjects.
///
/// # Errors
///
/// See [`OneProportion::solve`].
pub fn solve_for_power(
    size: f64,
    alpha: f64,
    null_proportion: f64,
    proportion: f64,
    alternative: Alternative,
    test_type: TestType,
) -> Result<f64> {
    OneProportion::new()
        .size(size)
        .alpha(alpha)
        .null_proportion(null_proportion)
        .proportion(proportion)
        .alternative(alternative)
        .test_type(test_type)
        .solve()
        .map(|solution| solution.power)
}

/// Null proportion, on the `search_direction` side of `proportion`, at
/// which the test reaches `power`.
///
/// # Errors
///
/// See [`OneProportion::solve`].
#[allow(clippy::too_many_arguments)]
pub fn solve_for_null_proportion(
    size: f64,
    alpha: f64,
    power: f64,
    proportion: f64,
    alternative: Alternative,
    test_type: TestType,
    search_direction: SearchDirection,
) -> Result<f64> {
    OneProportion::new()
        .size(size)
        .alpha(alpha)
        .power(power)
        .proportion(proportion)
        .alternative(alternative)
        .test_type(test_type)
        .search_direction(search_direction)
        .solve()
        .map(|solution| solution.null_proportion)
}

/// Actual proportion, on the `search_direction` side of `null_proportion`,
/// detectable with `power`.
///
/// # Errors
///
/// See [`OneProportion::solve`].
#[allow(clippy::too_many_arguments)]
pub fn solve_for_proportion(
    size: f64,
    alpha: f64,
    power: f64,
    null_proportion: f64,
    alternative: Alternative,
    test_type: TestType,
    search_direction: SearchDirection,
) -> Result<f64> {
    OneProportion::new()
        .size(size)
        .alpha(alpha)
        .power(power)
        .null_proportion(null_proportion)
        .alternative(alternative)
        .test_type(test_type)
        .search_direction(search_direction)
        .solve()
        .map(|solution| solution.proportion)
}

//! Two-sample proportion test.
//!
//! Compares a treatment proportion p1 with a reference proportion p2 from
//! two independent groups. The group sizes follow a [`GroupAllocation`];
//! when alpha, power and both proportions are fixed, the sample size is the
//! target.
//!
//! # Example
//!
//! ```
//! use statpower::option::Alternative;
//! use statpower::procedures::two_proportion::{self, GroupAllocation, TwoProportion, TestType};
//!
//! let (treatment, reference) = two_proportion::solve_for_sample_size(
//!     0.05,
//!     0.80,
//!     0.80,
//!     0.95,
//!     Alternative::TwoSided,
//!     TestType::ZTestPooled,
//!     &GroupAllocation::new().ratio_of_treatment_to_reference(2.0),
//! )
//! .unwrap();
//! assert_eq!((treatment, reference), (120, 60));
//!
//! let solution = TwoProportion::new()
//!     .alpha(0.05)
//!     .power(0.80)
//!     .treatment_proportion(0.80)
//!     .reference_proportion(0.95)
//!     .dropout_rate(0.10)
//!     .solve()
//!     .unwrap();
//! assert_eq!(solution.sample_sizes(), (76, 76));
//! assert_eq!(solution.sizes_include_dropouts(), (85, 85));
//! ```

mod allocation;
mod power;

pub use allocation::{AllocationForSize, GroupAllocation, GroupAllocationOption, GroupSizes};
pub use power::{power, TestType};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::check_search_direction;
use crate::error::{Error, Result};
use crate::numeric::{
    ceil_size, inflate_for_dropout, Alpha, AlphaTag, Bounded, Domain, DropOutRate, PowerTag,
    Proportion, ProportionTag, Size,
};
use crate::option::{option_enum, Alternative, SearchDirection};
use crate::param::{find_unknown, Param};
use crate::solver::{find_root, SolverConfig};
use crate::table::PowerCurve;
use power::achieved_power;

option_enum! {
    /// The parameter being solved for.
    pub enum Target("target") {
        /// Group sizes.
        Size => ["size", "sample_size"],
        /// Significance level.
        Alpha => ["alpha"],
        /// Statistical power.
        Power => ["power"],
        /// Proportion in the treatment group.
        TreatmentProportion => ["treatment_proportion"],
        /// Proportion in the reference group.
        ReferenceProportion => ["reference_proportion"],
    }
}

/// Parameter values at which the power function is evaluated.
#[derive(Debug, Clone, Copy)]
struct Point {
    alpha: f64,
    power: f64,
    treatment_proportion: f64,
    reference_proportion: f64,
}

impl Point {
    fn with(mut self, target: Target, value: f64) -> Self {
        match target {
            Target::Alpha => self.alpha = value,
            Target::Power => self.power = value,
            Target::TreatmentProportion => self.treatment_proportion = value,
            Target::ReferenceProportion => self.reference_proportion = value,
            Target::Size => {}
        }
        self
    }

    fn achieved(&self, sizes: GroupSizes, alternative: Alternative, test_type: TestType) -> f64 {
        achieved_power(
            sizes,
            self.alpha,
            self.treatment_proportion,
            self.reference_proportion,
            alternative,
            test_type,
        )
    }
}

fn value_of<D: Domain>(param: Param) -> Result<f64> {
    Ok(param.bounded::<D>()?.map_or(f64::NAN, Bounded::get))
}

/// Two-sample proportion design.
///
/// Alpha, power and the two proportions start out unknown; at most one may
/// remain so. With none unknown the group sizes are solved for, which
/// requires an allocation that leaves them open.
///
/// ```
/// use statpower::option::SearchDirection;
/// use statpower::procedures::two_proportion::{GroupAllocation, Target, TwoProportion};
///
/// let solution = TwoProportion::new()
///     .alpha(0.05)
///     .power(0.80)
///     .reference_proportion(0.95)
///     .group_allocation(GroupAllocation::new().equal().size_of_total(100.0))
///     .search_direction(SearchDirection::Less)
///     .solve()
///     .unwrap();
///
/// assert_eq!(solution.target, Target::TreatmentProportion);
/// assert!((solution.value() - 0.75312953).abs() < 1e-8);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TwoProportion {
    alpha: Param,
    power: Param,
    treatment_proportion: Param,
    reference_proportion: Param,
    alternative: Alternative,
    test_type: TestType,
    group_allocation: GroupAllocation,
    search_direction: Option<SearchDirection>,
    dropout_rate: f64,
    solver: SolverConfig,
}

impl TwoProportion {
    /// Create a design with every parameter unknown and equal allocation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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

    /// Set the treatment proportion.
    #[must_use]
    pub fn treatment_proportion(mut self, proportion: impl Into<Param>) -> Self {
        self.treatment_proportion = proportion.into();
        self
    }

    /// Set the reference proportion.
    #[must_use]
    pub fn reference_proportion(mut self, proportion: impl Into<Param>) -> Self {
        self.reference_proportion = proportion.into();
        self
    }

    /// Set the alternative hypothesis. Default is two-sided.
    #[must_use]
    pub fn alternative(mut self, alternative: Alternative) -> Self {
        self.alternative = alternative;
        self
    }

    /// Set the test statistic. Default is the pooled z-test.
    #[must_use]
    pub fn test_type(mut self, test_type: TestType) -> Self {
        self.test_type = test_type;
        self
    }

    /// Set how subjects are split between the groups.
    #[must_use]
    pub fn group_allocation(mut self, group_allocation: GroupAllocation) -> Self {
        self.group_allocation = group_allocation;
        self
    }

    /// Set the side to search on; required when solving for a proportion.
    #[must_use]
    pub fn search_direction(mut self, search_direction: SearchDirection) -> Self {
        self.search_direction = Some(search_direction);
        self
    }

    /// Set the expected dropout rate used to inflate the reported sizes.
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
    /// [`Error::TargetNotUnique`] if more than one parameter is unknown,
    /// [`Error::TargetNotExist`] if none is and the allocation pins both
    /// group sizes.
    pub fn target(&self) -> Result<Target> {
        let unknown = find_unknown(&[
            (Target::Alpha, "alpha", self.alpha),
            (Target::Power, "power", self.power),
            (
                Target::TreatmentProportion,
                "treatment_proportion",
                self.treatment_proportion,
            ),
            (
                Target::ReferenceProportion,
                "reference_proportion",
                self.reference_proportion,
            ),
        ])?;
        match unknown {
            Some(target) => Ok(target),
            None if self.group_allocation.for_size().is_err()
                && self.group_allocation.group_sizes().is_ok() =>
            {
                Err(Error::TargetNotExist)
            }
            None => Ok(Target::Size),
        }
    }

    /// Solve for the unknown parameter.
    ///
    /// # Errors
    ///
    /// - Target errors from [`TwoProportion::target`]
    /// - Domain errors for any fixed value out of range
    /// - [`Error::AllocationConfig`] if the allocation does not fit the target
    /// - [`Error::ParameterEmpty`] if a proportion is solved for without a
    ///   search direction, [`Error::SearchDirectionNotApplicable`] if one is
    ///   given for any other target
    /// - [`Error::SolutionNotFound`] if no value reaches the requested power
    pub fn solve(&self) -> Result<TwoProportionSolution> {
        let target = self.target()?;
        let search_direction = check_search_direction(
            target.as_str(),
            matches!(
                target,
                Target::TreatmentProportion | Target::ReferenceProportion
            ),
            self.search_direction,
        )?;
        let dropout_rate = DropOutRate::new(self.dropout_rate)?;

        let point = Point {
            alpha: value_of::<AlphaTag>(self.alpha)?,
            power: value_of::<PowerTag>(self.power)?,
            treatment_proportion: value_of::<ProportionTag>(self.treatment_proportion)?,
            reference_proportion: value_of::<ProportionTag>(self.reference_proportion)?,
        };
        debug!(design = "two proportion", %target, "solving");

        let (alternative, test_type) = (self.alternative, self.test_type);
        let (sizes, point) = if target == Target::Size {
            let allocation = self.group_allocation.for_size()?;
            let (lower, upper) = Size::pseudo_bound();
            let trial = find_root(
                target.as_str(),
                |x| point.achieved(allocation.expand(x), alternative, test_type) - point.power,
                lower,
                upper,
                &self.solver,
            )?;
            (allocation.expand(trial), point)
        } else {
            let sizes = self.group_allocation.group_sizes()?;
            let value = match (target, search_direction) {
                (Target::Power, _) => point.achieved(sizes, alternative, test_type),
                (Target::Alpha, _) => {
                    let (lower, upper) = Alpha::pseudo_bound();
                    self.search(target, point, sizes, lower, upper)?
                }
                (Target::TreatmentProportion, Some(direction)) => {
                    let (lower, upper) =
                        direction.bracket(point.reference_proportion, Proportion::pseudo_bound());
                    self.search(target, point, sizes, lower, upper)?
                }
                (Target::ReferenceProportion, Some(direction)) => {
                    let (lower, upper) =
                        direction.bracket(point.treatment_proportion, Proportion::pseudo_bound());
                    self.search(target, point, sizes, lower, upper)?
                }
                _ => {
                    return Err(Error::ParameterEmpty {
                        name: "search direction",
                    })
                }
            };
            (sizes, point.with(target, value))
        };

        Ok(TwoProportionSolution {
            target,
            treatment_size: sizes.treatment,
            reference_size: sizes.reference,
            alpha: point.alpha,
            power: point.power,
            treatment_proportion: point.treatment_proportion,
            reference_proportion: point.reference_proportion,
            alternative,
            test_type,
            group_allocation: self.group_allocation,
            search_direction,
            dropout_rate: dropout_rate.get(),
            treatment_size_include_dropouts: inflate_for_dropout(sizes.treatment, dropout_rate),
            reference_size_include_dropouts: inflate_for_dropout(sizes.reference, dropout_rate),
        })
    }

    fn search(
        &self,
        target: Target,
        point: Point,
        sizes: GroupSizes,
        lower: f64,
        upper: f64,
    ) -> Result<f64> {
        find_root(
            target.as_str(),
            |x| point.with(target, x).achieved(sizes, self.alternative, self.test_type) - point.power,
            lower,
            upper,
            &self.solver,
        )
    }
}

impl PowerCurve for TwoProportion {
    fn name(&self) -> &'static str {
        "two proportion"
    }

    /// `size` is the total, split by the allocation: equally, by its ratio,
    /// or as the complement of a fixed group.
    fn power_at(&self, size: f64, alpha: f64) -> Result<f64> {
        let total = Size::new(size)?.get();
        let sizes = match self.group_allocation.for_size()? {
            AllocationForSize::Equal => GroupSizes::new(total / 2.0, total / 2.0),
            ratio @ AllocationForSize::Ratio(_) => ratio.expand(total),
            AllocationForSize::FixedTreatment(treatment) => {
                GroupSizes::new(treatment, Size::new(total - treatment)?.get())
            }
            AllocationForSize::FixedReference(reference) => {
                GroupSizes::new(Size::new(total - reference)?.get(), reference)
            }
        };
        power(
            sizes.treatment,
            sizes.reference,
            alpha,
            self.treatment_proportion.require::<ProportionTag>()?.get(),
            self.reference_proportion.require::<ProportionTag>()?.get(),
            self.alternative,
            self.test_type,
        )
    }
}

/// Full output of a two-sample proportion solve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TwoProportionSolution {
    /// The parameter that was solved for.
    pub target: Target,
    /// Treatment group size before rounding.
    pub treatment_size: f64,
    /// Reference group size before rounding.
    pub reference_size: f64,
    /// Significance level.
    pub alpha: f64,
    /// Power; achieved power when it was the target.
    pub power: f64,
    /// Proportion in the treatment group.
    pub treatment_proportion: f64,
    /// Proportion in the reference group.
    pub reference_proportion: f64,
    /// Alternative hypothesis.
    pub alternative: Alternative,
    /// Test statistic.
    pub test_type: TestType,
    /// The allocation as given.
    pub group_allocation: GroupAllocation,
    /// Side searched when a proportion was the target.
    pub search_direction: Option<SearchDirection>,
    /// Expected dropout rate.
    pub dropout_rate: f64,
    /// Rounded treatment size inflated for dropouts.
    pub treatment_size_include_dropouts: u64,
    /// Rounded reference size inflated for dropouts.
    pub reference_size_include_dropouts: u64,
}

impl TwoProportionSolution {
    /// The solved value; the unrounded total when sizes were solved for.
    #[must_use]
    pub fn value(&self) -> f64 {
        match self.target {
            Target::Size => self.treatment_size + self.reference_size,
            Target::Alpha => self.alpha,
            Target::Power => self.power,
            Target::TreatmentProportion => self.treatment_proportion,
            Target::ReferenceProportion => self.reference_proportion,
        }
    }

    /// Group sizes rounded up to whole subjects, treatment first.
    #[must_use]
    pub fn sample_sizes(&self) -> (u64, u64) {
        (ceil_size(self.treatment_size), ceil_size(self.reference_size))
    }

    /// Rounded group sizes inflated for dropouts, treatment first.
    #[must_use]
    pub fn sizes_include_dropouts(&self) -> (u64, u64) {
        (
            self.treatment_size_include_dropouts,
            self.reference_size_include_dropouts,
        )
    }
}

/// Smallest group sizes reaching `power`, treatment first.
///
/// # Errors
///
/// See [`TwoProportion::solve`]; an allocation pinning both groups is an
/// [`Error::AllocationConfig`].
pub fn solve_for_sample_size(
    alpha: f64,
    power: f64,
    treatment_proportion: f64,
    reference_proportion: f64,
    alternative: Alternative,
    test_type: TestType,
    group_allocation: &GroupAllocation,
) -> Result<(u64, u64)> {
    group_allocation.for_size()?;
    TwoProportion::new()
        .alpha(alpha)
        .power(power)
        .treatment_proportion(treatment_proportion)
        .reference_proportion(reference_proportion)
        .alternative(alternative)
        .test_type(test_type)
        .group_allocation(*group_allocation)
        .solve()
        .map(|solution| solution.sample_sizes())
}

/// Significance level at which the allocated groups reach `power`.
///
/// # Errors
///
/// See [`TwoProportion::solve`].
pub fn solve_for_alpha(
    power: f64,
    treatment_proportion: f64,
    reference_proportion: f64,
    alternative: Alternative,
    test_type: TestType,
    group_allocation: &GroupAllocation,
) -> Result<f64> {
    TwoProportion::new()
        .power(power)
        .treatment_proportion(treatment_proportion)
        .reference_proportion(reference_proportion)
        .alternative(alternative)
        .test_type(test_type)
        .group_allocation(*group_allocation)
        .solve()
        .map(|solution| solution.alpha)
}

/// Power achieved by the allocated groups.
///
/// # Errors
///
/// See [`TwoProportion::solve`].
pub fn solve_for_power(
    alpha: f64,
    treatment_proportion: f64,
    reference_proportion: f64,
    alternative: Alternative,
    test_type: TestType,
    group_allocation: &GroupAllocation,
) -> Result<f64> {
    TwoProportion::new()
        .alpha(alpha)
        .treatment_proportion(treatment_proportion)
        .reference_proportion(reference_proportion)
        .alternative(alternative)
        .test_type(test_type)
        .group_allocation(*group_allocation)
        .solve()
        .map(|solution| solution.power)
}

/// Treatment proportion, on the `search_direction` side of
/// `reference_proportion`, detectable with `power`.
///
/// # Errors
///
/// See [`TwoProportion::solve`].
pub fn solve_for_treatment_proportion(
    alpha: f64,
    power: f64,
    reference_proportion: f64,
    alternative: Alternative,
    test_type: TestType,
    group_allocation: &GroupAllocation,
    search_direction: SearchDirection,
) -> Result<f64> {
    TwoProportion::new()
        .alpha(alpha)
        .power(power)
        .reference_proportion(reference_proportion)
        .alternative(alternative)
        .test_type(test_type)
        .group_allocation(*group_allocation)
        .search_direction(search_direction)
        .solve()
        .map(|solution| solution.treatment_proportion)
}

/// Reference proportion, on the `search_direction` side of
/// `treatment_proportion`, detectable with `power`.
///
/// # Errors
///
/// See [`TwoProportion::solve`].
pub fn solve_for_reference_proportion(
    alpha: f64,
    power: f64,
    treatment_proportion: f64,
    alternative: Alternative,
    test_type: TestType,
    group_allocation: &GroupAllocation,
    search_direction: SearchDirection,
) -> Result<f64> {
    TwoProportion::new()
        .alpha(alpha)
        .power(power)
        .treatment_proportion(treatment_proportion)
        .alternative(alternative)
        .test_type(test_type)
        .group_allocation(*group_allocation)
        .search_direction(search_direction)
        .solve()
        .map(|solution| solution.reference_proportion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    use Alternative::{OneSided, TwoSided};
    use SearchDirection::{Greater, Less};
    use TestType::{ZTestCcPooled, ZTestCcUnpooled, ZTestPooled, ZTestUnpooled};

    fn allocations_for_size() -> [(GroupAllocation, (u64, u64), (u64, u64)); 7] {
        [
            (GroupAllocation::new().equal(), (76, 76), (85, 85)),
            (GroupAllocation::new().size_of_treatment(70.0), (70, 79), (78, 88)),
            (GroupAllocation::new().size_of_reference(70.0), (85, 70), (95, 78)),
            (
                GroupAllocation::new().ratio_of_treatment_to_reference(2.0),
                (120, 60),
                (134, 67),
            ),
            (
                GroupAllocation::new().ratio_of_reference_to_treatment(2.0),
                (52, 104),
                (58, 116),
            ),
            (GroupAllocation::new().percent_of_treatment(0.8), (205, 52), (228, 58)),
            (GroupAllocation::new().percent_of_reference(0.8), (40, 159), (45, 177)),
        ]
    }

    fn total_of(size: f64) -> GroupAllocation {
        GroupAllocation::new().equal().size_of_total(size)
    }

    /// Every allocation in the order of [`allocations_for_size`].
    fn allocations() -> [GroupAllocation; 7] {
        allocations_for_size().map(|(allocation, _, _)| allocation)
    }

    #[test]
    fn test_solve_for_sample_size() {
        // (alternative, test type, reference proportion, sizes per allocation)
        let cases: [(Alternative, TestType, f64, [(u64, u64); 7]); 6] = [
            (
                TwoSided,
                ZTestPooled,
                0.95,
                [(76, 76), (70, 79), (85, 70), (120, 60), (52, 104), (205, 52), (40, 159)],
            ),
            (
                TwoSided,
                ZTestUnpooled,
                0.95,
                [(73, 73), (70, 82), (74, 70), (89, 45), (65, 129), (123, 31), (60, 240)],
            ),
            (
                TwoSided,
                ZTestCcPooled,
                0.95,
                [(88, 88), (70, 107), (135, 70), (139, 70), (62, 124), (237, 60), (48, 191)],
            ),
            (
                TwoSided,
                ZTestCcUnpooled,
                0.95,
                [(86, 86), (70, 209), (93, 70), (109, 55), (74, 148), (154, 39), (69, 273)],
            ),
            (
                OneSided,
                ZTestPooled,
                0.95,
                [(60, 60), (70, 53), (49, 70), (93, 47), (42, 83), (157, 40), (32, 128)],
            ),
            (
                OneSided,
                ZTestUnpooled,
                0.65,
                [(107, 107), (70, 169), (412, 70), (169, 85), (76, 151), (295, 74), (60, 239)],
            ),
        ];
        for (alternative, test_type, reference_proportion, expected) in cases {
            for (allocation, expected) in allocations().into_iter().zip(expected) {
                let sizes = solve_for_sample_size(
                    0.05,
                    0.80,
                    0.80,
                    reference_proportion,
                    alternative,
                    test_type,
                    &allocation,
                )
                .unwrap();
                assert_eq!(sizes, expected, "{alternative} {test_type} {allocation:?}");
            }
        }
    }

    #[test]
    fn test_dropouts() {
        for (allocation, expected, with_dropouts) in allocations_for_size() {
            let solution = TwoProportion::new()
                .alpha(0.05)
                .power(0.80)
                .treatment_proportion(0.80)
                .reference_proportion(0.95)
                .group_allocation(allocation)
                .dropout_rate(0.10)
                .solve()
                .unwrap();
            assert_eq!(solution.target, Target::Size);
            assert_eq!(solution.sample_sizes(), expected);
            assert_eq!(solution.sizes_include_dropouts(), with_dropouts, "{allocation:?}");
        }
    }

    #[test]
    fn test_invalid_allocation_for_size() {
        let cases = [
            GroupAllocation::new().equal().size_of_total(100.0),
            GroupAllocation::new().size_of_treatment(100.0).size_of_reference(100.0),
        ];
        for allocation in cases {
            assert!(matches!(
                solve_for_sample_size(0.08, 0.80, 0.80, 0.95, TwoSided, ZTestPooled, &allocation),
                Err(Error::AllocationConfig { .. })
            ));
        }
    }

    #[test]
    fn test_no_solution() {
        let result = solve_for_sample_size(
            1e-10,
            0.999_999_999_9,
            0.50,
            0.499_999_999_99,
            TwoSided,
            ZTestPooled,
            &GroupAllocation::new().equal(),
        );
        assert!(matches!(result, Err(Error::SolutionNotFound { .. })));
    }

    #[test]
    fn test_solve_for_alpha() {
        let cases = [
            (0.14752498, total_of(100.0)),
            (0.01696612, GroupAllocation::new().equal().size_of_each(100.0)),
            (0.01696612, GroupAllocation::new().equal().size_of_treatment(100.0)),
            (0.01696612, GroupAllocation::new().equal().size_of_reference(100.0)),
            (
                0.18362176,
                GroupAllocation::new().size_of_total(100.0).size_of_treatment(30.0),
            ),
            (
                0.21624494,
                GroupAllocation::new().size_of_total(100.0).size_of_reference(30.0),
            ),
            (
                0.25704323,
                GroupAllocation::new()
                    .size_of_total(100.0)
                    .ratio_of_treatment_to_reference(3.0),
            ),
            (
                0.21840194,
                GroupAllocation::new()
                    .size_of_total(100.0)
                    .ratio_of_reference_to_treatment(3.0),
            ),
            (
                0.31499795,
                GroupAllocation::new().size_of_total(100.0).percent_of_treatment(0.8),
            ),
            (
                0.2719625,
                GroupAllocation::new().size_of_total(100.0).percent_of_reference(0.8),
            ),
            (0.01696612, GroupAllocation::new().size_of_each(100.0)),
            (
                0.01696612,
                GroupAllocation::new().size_of_treatment(100.0).size_of_reference(100.0),
            ),
            (
                0.23283863,
                GroupAllocation::new()
                    .size_of_treatment(100.0)
                    .ratio_of_treatment_to_reference(4.0),
            ),
            (
                0.00014764,
                GroupAllocation::new()
                    .size_of_treatment(100.0)
                    .ratio_of_reference_to_treatment(4.0),
            ),
            (
                0.23283863,
                GroupAllocation::new().size_of_treatment(100.0).percent_of_treatment(0.8),
            ),
            (
                0.00014764,
                GroupAllocation::new().size_of_treatment(100.0).percent_of_reference(0.8),
            ),
            (
                0.00289295,
                GroupAllocation::new()
                    .size_of_reference(100.0)
                    .ratio_of_treatment_to_reference(4.0),
            ),
            (
                0.18177707,
                GroupAllocation::new()
                    .size_of_reference(100.0)
                    .ratio_of_reference_to_treatment(4.0),
            ),
            (
                0.00289295,
                GroupAllocation::new().size_of_reference(100.0).percent_of_treatment(0.8),
            ),
            (
                0.18177707,
                GroupAllocation::new().size_of_reference(100.0).percent_of_reference(0.8),
            ),
        ];
        for (expected, allocation) in cases {
            let alpha =
                solve_for_alpha(0.80, 0.80, 0.95, TwoSided, ZTestPooled, &allocation).unwrap();
            assert!(
                (alpha - expected).abs() < 5e-9,
                "{allocation:?}: expected {expected}, got {alpha}"
            );
        }
    }

    #[test]
    fn test_invalid_allocation_for_alpha() {
        let cases = [
            GroupAllocation::new().ratio_of_treatment_to_reference(2.0),
            GroupAllocation::new()
                .ratio_of_treatment_to_reference(2.0)
                .percent_of_treatment(0.5),
            GroupAllocation::new()
                .size_of_total(100.0)
                .ratio_of_treatment_to_reference(2.0)
                .percent_of_treatment(0.5),
        ];
        for allocation in cases {
            assert!(matches!(
                solve_for_alpha(0.80, 0.80, 0.95, TwoSided, ZTestPooled, &allocation),
                Err(Error::AllocationConfig { .. })
            ));
        }
    }

    #[test]
    fn test_solve_for_power() {
        let power = solve_for_power(0.05, 0.80, 0.95, TwoSided, ZTestPooled, &total_of(100.0))
            .unwrap();
        assert!((power - 0.62402759).abs() < 5e-9);
    }

    #[test]
    fn test_solve_for_proportions() {
        let treatment = solve_for_treatment_proportion(
            0.05,
            0.80,
            0.95,
            TwoSided,
            ZTestPooled,
            &total_of(100.0),
            Less,
        )
        .unwrap();
        assert!((treatment - 0.75312953).abs() < 5e-9);

        let treatment = solve_for_treatment_proportion(
            0.05,
            0.80,
            0.85,
            TwoSided,
            ZTestPooled,
            &total_of(100.0),
            Greater,
        )
        .unwrap();
        assert!((treatment - 0.99712574).abs() < 5e-9);

        let reference = solve_for_reference_proportion(
            0.05,
            0.80,
            0.95,
            TwoSided,
            ZTestPooled,
            &total_of(100.0),
            Less,
        )
        .unwrap();
        assert!((reference - 0.75312953).abs() < 5e-9);

        let reference = solve_for_reference_proportion(
            0.05,
            0.80,
            0.85,
            TwoSided,
            ZTestPooled,
            &total_of(100.0),
            Greater,
        )
        .unwrap();
        assert!((reference - 0.99712574).abs() < 5e-9);
    }

    #[test]
    fn test_proportion_without_solution() {
        assert!(matches!(
            solve_for_treatment_proportion(
                0.05,
                0.80,
                0.95,
                TwoSided,
                ZTestPooled,
                &total_of(100.0),
                Greater,
            ),
            Err(Error::SolutionNotFound { .. })
        ));
        assert!(matches!(
            solve_for_reference_proportion(
                0.05,
                0.80,
                0.95,
                TwoSided,
                ZTestPooled,
                &total_of(100.0),
                Greater,
            ),
            Err(Error::SolutionNotFound { .. })
        ));
    }

    #[test]
    fn test_target_detection() {
        let design = TwoProportion::new()
            .alpha(0.05)
            .treatment_proportion(0.80)
            .reference_proportion(0.95);
        assert_eq!(design.target().unwrap(), Target::Power);

        let design = TwoProportion::new().treatment_proportion(0.80).reference_proportion(0.95);
        assert!(matches!(design.target(), Err(Error::TargetNotUnique { .. })));

        let complete = TwoProportion::new()
            .alpha(0.05)
            .power(0.80)
            .treatment_proportion(0.80)
            .reference_proportion(0.95);
        assert_eq!(complete.target().unwrap(), Target::Size);
        let pinned = complete.group_allocation(total_of(100.0));
        assert_eq!(pinned.solve().unwrap_err(), Error::TargetNotExist);
    }

    #[test]
    fn test_search_direction_rules() {
        let missing = TwoProportion::new()
            .alpha(0.05)
            .power(0.80)
            .reference_proportion(0.95)
            .group_allocation(total_of(100.0));
        assert!(matches!(missing.solve(), Err(Error::ParameterEmpty { .. })));

        let extra = TwoProportion::new()
            .power(0.80)
            .treatment_proportion(0.80)
            .reference_proportion(0.95)
            .group_allocation(total_of(100.0))
            .search_direction(Greater);
        assert!(matches!(
            extra.solve(),
            Err(Error::SearchDirectionNotApplicable { target: "alpha" })
        ));
    }

    #[test]
    fn test_full_output() {
        let solution = TwoProportion::new()
            .power(0.80)
            .treatment_proportion(0.80)
            .reference_proportion(0.95)
            .group_allocation(GroupAllocation::new().size_of_total(100.0).size_of_treatment(30.0))
            .dropout_rate(0.2)
            .solve()
            .unwrap();
        assert_eq!(solution.target, Target::Alpha);
        assert!((solution.value() - 0.18362176).abs() < 5e-9);
        assert_eq!((solution.treatment_size, solution.reference_size), (30.0, 70.0));
        assert_eq!(solution.sample_sizes(), (30, 70));
        assert_eq!(solution.sizes_include_dropouts(), (38, 88));
        assert_eq!(solution.power, 0.80);
    }

    #[test]
    fn test_power_curve() {
        let design = TwoProportion::new()
            .treatment_proportion(0.80)
            .reference_proportion(0.95);
        let achieved = design.power_at(100.0, 0.05).unwrap();
        assert!((achieved - 0.62402759).abs() < 5e-9);

        let by_ratio = design
            .clone()
            .group_allocation(GroupAllocation::new().ratio_of_treatment_to_reference(3.0));
        let expected = power(75.0, 25.0, 0.05, 0.80, 0.95, TwoSided, ZTestPooled).unwrap();
        assert!((by_ratio.power_at(100.0, 0.05).unwrap() - expected).abs() < 1e-12);

        let fixed = design.group_allocation(GroupAllocation::new().size_of_treatment(30.0));
        let expected = power(30.0, 70.0, 0.05, 0.80, 0.95, TwoSided, ZTestPooled).unwrap();
        assert!((fixed.power_at(100.0, 0.05).unwrap() - expected).abs() < 1e-12);
        assert!(fixed.power_at(20.0, 0.05).is_err());
    }

    proptest! {
        #[test]
        fn sample_size_grows_with_power(low in 0.2f64..0.9, step in 0.0f64..0.09) {
            let equal = GroupAllocation::new();
            let smaller = solve_for_sample_size(0.05, low, 0.80, 0.95, TwoSided, ZTestPooled, &equal).unwrap();
            let larger = solve_for_sample_size(0.05, low + step, 0.80, 0.95, TwoSided, ZTestPooled, &equal).unwrap();
            prop_assert!(smaller.0 <= larger.0);
        }

        #[test]
        fn solved_sizes_reach_requested_power(
            target in 0.5f64..0.95,
            alpha in 0.01f64..0.1,
            treatment_proportion in 0.1f64..0.9,
            shift in 0.05f64..0.4,
            two_sided in any::<bool>(),
            test_type in prop::sample::select(TestType::ALL.to_vec()),
            ratio in 0.25f64..4.0,
            fixed in 20u32..300,
            layout in 0usize..3,
        ) {
            let reference_proportion = treatment_proportion + shift;
            prop_assume!(reference_proportion < 0.95);
            let alternative = if two_sided { TwoSided } else { OneSided };
            let allocation = match layout {
                0 => GroupAllocation::new().ratio_of_treatment_to_reference(ratio),
                1 => GroupAllocation::new().size_of_treatment(f64::from(fixed)),
                _ => GroupAllocation::new().size_of_reference(f64::from(fixed)),
            };

            // A fixed arm can cap the reachable power.
            let solved = solve_for_sample_size(
                alpha,
                target,
                treatment_proportion,
                reference_proportion,
                alternative,
                test_type,
                &allocation,
            );
            prop_assume!(solved.is_ok());
            let (treatment, reference) = solved.unwrap();

            let achieved = power(
                treatment as f64,
                reference as f64,
                alpha,
                treatment_proportion,
                reference_proportion,
                alternative,
                test_type,
            )
            .unwrap();
            prop_assert!(achieved >= target - 1e-8, "{achieved} < {target}");
        }
    }
}

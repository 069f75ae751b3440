//! Group allocation for two-group designs.
//!
//! A [`GroupAllocation`] is a sparse specification of how subjects are
//! split between the treatment and the reference group. Which fields are
//! populated decides how it resolves:
//!
//! - When the sample size is the target, it resolves to an
//!   [`AllocationForSize`]: equal arms, one arm fixed, or a fixed ratio.
//! - For every other target it must pin both arms and resolves to
//!   [`GroupSizes`].
//!
//! Combinations that are ambiguous or contradictory are rejected with
//! [`Error::AllocationConfig`] before any search starts.
//!
//! ```
//! use statpower::procedures::two_proportion::GroupAllocation;
//!
//! let allocation = GroupAllocation::new().size_of_total(100.0).size_of_treatment(30.0);
//! let sizes = allocation.group_sizes().unwrap();
//! assert_eq!((sizes.treatment, sizes.reference), (30.0, 70.0));
//!
//! // Both arms given: nothing left for a size search
//! let pinned = GroupAllocation::new().size_of_treatment(100.0).size_of_reference(100.0);
//! assert!(pinned.for_size().is_err());
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::numeric::{Percent, Ratio, Size};
use crate::option::option_enum;

option_enum! {
    /// One field of a group allocation.
    pub enum GroupAllocationOption("group allocation option") {
        /// Both groups have the same size.
        Equal => ["EQUAL"],
        /// Total size over both groups.
        SizeOfTotal => ["SIZE_OF_TOTAL"],
        /// Size of each group.
        SizeOfEach => ["SIZE_OF_EACH"],
        /// Size of the treatment group.
        SizeOfTreatment => ["SIZE_OF_TREATMENT"],
        /// Size of the reference group.
        SizeOfReference => ["SIZE_OF_REFERENCE"],
        /// Treatment size divided by reference size.
        RatioOfTreatmentToReference => ["RATIO_OF_TREATMENT_TO_REFERENCE"],
        /// Reference size divided by treatment size.
        RatioOfReferenceToTreatment => ["RATIO_OF_REFERENCE_TO_TREATMENT"],
        /// Share of the total in the treatment group.
        PercentOfTreatment => ["PERCENT_OF_TREATMENT"],
        /// Share of the total in the reference group.
        PercentOfReference => ["PERCENT_OF_REFERENCE"],
    }
}

impl GroupAllocationOption {
    /// Whether this option fixes the proportion between the two groups.
    #[must_use]
    pub fn is_relative(self) -> bool {
        matches!(
            self,
            Self::RatioOfTreatmentToReference
                | Self::RatioOfReferenceToTreatment
                | Self::PercentOfTreatment
                | Self::PercentOfReference
        )
    }
}

/// Sparse allocation specification; see the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupAllocation {
    equal: bool,
    size_of_total: Option<f64>,
    size_of_each: Option<f64>,
    size_of_treatment: Option<f64>,
    size_of_reference: Option<f64>,
    ratio_of_treatment_to_reference: Option<f64>,
    ratio_of_reference_to_treatment: Option<f64>,
    percent_of_treatment: Option<f64>,
    percent_of_reference: Option<f64>,
}

/// How two group sizes relate while the sample size is searched for.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AllocationForSize {
    /// Both groups grow together.
    Equal,
    /// The treatment group is fixed; the reference group is searched.
    FixedTreatment(f64),
    /// The reference group is fixed; the treatment group is searched.
    FixedReference(f64),
    /// The total is searched and split by this treatment:reference ratio.
    Ratio(f64),
}

impl AllocationForSize {
    /// Expand a trial value of the search variable into group sizes.
    ///
    /// The search variable is the size of each group for
    /// [`AllocationForSize::Equal`], the free group's size when one group is
    /// fixed, and the total for [`AllocationForSize::Ratio`].
    #[must_use]
    pub fn expand(self, trial: f64) -> GroupSizes {
        match self {
            Self::Equal => GroupSizes::new(trial, trial),
            Self::FixedTreatment(treatment) => GroupSizes::new(treatment, trial),
            Self::FixedReference(reference) => GroupSizes::new(trial, reference),
            Self::Ratio(ratio) => split_total(trial, ratio),
        }
    }
}

/// Concrete sizes of both groups.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupSizes {
    /// Size of the treatment group.
    pub treatment: f64,
    /// Size of the reference group.
    pub reference: f64,
}

impl GroupSizes {
    /// Pair up two group sizes.
    #[must_use]
    pub fn new(treatment: f64, reference: f64) -> Self {
        Self {
            treatment,
            reference,
        }
    }

    /// Total over both groups.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.treatment + self.reference
    }
}

fn split_total(total: f64, ratio: f64) -> GroupSizes {
    GroupSizes::new(total * ratio / (1.0 + ratio), total / (1.0 + ratio))
}

/// Treatment:reference ratio implied by a relative option.
fn treatment_ratio(option: GroupAllocationOption, value: f64) -> Result<f64> {
    use GroupAllocationOption as O;
    match option {
        O::RatioOfTreatmentToReference => Ok(Ratio::new(value)?.get()),
        O::RatioOfReferenceToTreatment => Ok(1.0 / Ratio::new(value)?.get()),
        O::PercentOfTreatment => {
            let percent = Percent::new(value)?.get();
            Ok(percent / (1.0 - percent))
        }
        O::PercentOfReference => {
            let percent = Percent::new(value)?.get();
            Ok((1.0 - percent) / percent)
        }
        _ => Err(Error::allocation(format!("{option} does not fix a ratio"))),
    }
}

fn size(value: f64) -> Result<f64> {
    Ok(Size::new(value)?.get())
}

impl GroupAllocation {
    /// An empty specification; equal allocation when solving for size.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for equal group sizes.
    #[must_use]
    pub fn equal(mut self) -> Self {
        self.equal = true;
        self
    }

    /// Set the total size over both groups.
    #[must_use]
    pub fn size_of_total(mut self, size: f64) -> Self {
        self.size_of_total = Some(size);
        self
    }

    /// Set the size of each group.
    #[must_use]
    pub fn size_of_each(mut self, size: f64) -> Self {
        self.size_of_each = Some(size);
        self
    }

    /// Set the size of the treatment group.
    #[must_use]
    pub fn size_of_treatment(mut self, size: f64) -> Self {
        self.size_of_treatment = Some(size);
        self
    }

    /// Set the size of the reference group.
    #[must_use]
    pub fn size_of_reference(mut self, size: f64) -> Self {
        self.size_of_reference = Some(size);
        self
    }

    /// Set the treatment:reference ratio.
    #[must_use]
    pub fn ratio_of_treatment_to_reference(mut self, ratio: f64) -> Self {
        self.ratio_of_treatment_to_reference = Some(ratio);
        self
    }

    /// Set the reference:treatment ratio.
    #[must_use]
    pub fn ratio_of_reference_to_treatment(mut self, ratio: f64) -> Self {
        self.ratio_of_reference_to_treatment = Some(ratio);
        self
    }

    /// Set the share of the total in the treatment group.
    #[must_use]
    pub fn percent_of_treatment(mut self, percent: f64) -> Self {
        self.percent_of_treatment = Some(percent);
        self
    }

    /// Set the share of the total in the reference group.
    #[must_use]
    pub fn percent_of_reference(mut self, percent: f64) -> Self {
        self.percent_of_reference = Some(percent);
        self
    }

    /// Set a field by option; `value` is ignored for
    /// [`GroupAllocationOption::Equal`].
    #[must_use]
    pub fn with(self, option: GroupAllocationOption, value: f64) -> Self {
        use GroupAllocationOption as O;
        match option {
            O::Equal => self.equal(),
            O::SizeOfTotal => self.size_of_total(value),
            O::SizeOfEach => self.size_of_each(value),
            O::SizeOfTreatment => self.size_of_treatment(value),
            O::SizeOfReference => self.size_of_reference(value),
            O::RatioOfTreatmentToReference => self.ratio_of_treatment_to_reference(value),
            O::RatioOfReferenceToTreatment => self.ratio_of_reference_to_treatment(value),
            O::PercentOfTreatment => self.percent_of_treatment(value),
            O::PercentOfReference => self.percent_of_reference(value),
        }
    }

    /// Populated fields in declaration order.
    #[must_use]
    pub fn options(&self) -> Vec<(GroupAllocationOption, f64)> {
        use GroupAllocationOption as O;
        let mut options: Vec<_> = self.equal.then_some((O::Equal, 0.0)).into_iter().collect();
        options.extend(
            [
                (O::SizeOfTotal, self.size_of_total),
                (O::SizeOfEach, self.size_of_each),
                (O::SizeOfTreatment, self.size_of_treatment),
                (O::SizeOfReference, self.size_of_reference),
                (O::RatioOfTreatmentToReference, self.ratio_of_treatment_to_reference),
                (O::RatioOfReferenceToTreatment, self.ratio_of_reference_to_treatment),
                (O::PercentOfTreatment, self.percent_of_treatment),
                (O::PercentOfReference, self.percent_of_reference),
            ]
            .into_iter()
            .filter_map(|(option, value)| value.map(|value| (option, value))),
        );
        options
    }

    fn describe(&self) -> String {
        let options = self.options();
        if options.is_empty() {
            return "no allocation fields".to_string();
        }
        options
            .iter()
            .map(|(option, _)| option.as_str())
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// Resolve for a sample size search.
    ///
    /// Accepts nothing or `EQUAL` alone (equal arms), one group's size
    /// alone, or one ratio or percent alone.
    ///
    /// # Errors
    ///
    /// [`Error::AllocationConfig`] for any other combination, or a domain
    /// error if a value is out of range.
    pub fn for_size(&self) -> Result<AllocationForSize> {
        use GroupAllocationOption as O;
        let resolved = match self.options().as_slice() {
            [] | [(O::Equal, _)] => AllocationForSize::Equal,
            [(O::SizeOfTreatment, n)] => AllocationForSize::FixedTreatment(size(*n)?),
            [(O::SizeOfReference, n)] => AllocationForSize::FixedReference(size(*n)?),
            [(option, value)] if option.is_relative() => {
                AllocationForSize::Ratio(treatment_ratio(*option, *value)?)
            }
            _ => {
                return Err(Error::allocation(format!(
                    "{} cannot be used when solving for the sample size",
                    self.describe()
                )))
            }
        };
        debug!(allocation = ?resolved, "allocation resolved for size search");
        Ok(resolved)
    }

    /// Resolve to the sizes of both groups.
    ///
    /// | Fields | Treatment | Reference |
    /// |--------|-----------|-----------|
    /// | total (optionally with `EQUAL`) | total / 2 | total / 2 |
    /// | each, treatment or reference size n (optionally with `EQUAL`) | n | n |
    /// | total + treatment size n | n | total - n |
    /// | total + reference size n | total - n | n |
    /// | total + ratio or percent | by ratio | by ratio |
    /// | treatment + reference | as given | as given |
    /// | one group's size + ratio or percent | as given / by ratio | by ratio / as given |
    ///
    /// # Errors
    ///
    /// [`Error::AllocationConfig`] for any other combination, or a domain
    /// error if a value (including a derived complement) is out of range.
    pub fn group_sizes(&self) -> Result<GroupSizes> {
        use GroupAllocationOption as O;
        let sizes = match self.options().as_slice() {
            [(O::Equal, _), (O::SizeOfTotal, total)] | [(O::SizeOfTotal, total)] => {
                let half = size(*total)? / 2.0;
                GroupSizes::new(half, half)
            }
            [(O::Equal, _), (O::SizeOfEach | O::SizeOfTreatment | O::SizeOfReference, n)]
            | [(O::SizeOfEach | O::SizeOfTreatment | O::SizeOfReference, n)] => {
                let n = size(*n)?;
                GroupSizes::new(n, n)
            }
            [(O::SizeOfTotal, total), (O::SizeOfTreatment, n)] => {
                let n = size(*n)?;
                GroupSizes::new(n, size(size(*total)? - n)?)
            }
            [(O::SizeOfTotal, total), (O::SizeOfReference, n)] => {
                let n = size(*n)?;
                GroupSizes::new(size(size(*total)? - n)?, n)
            }
            [(O::SizeOfTotal, total), (option, value)] if option.is_relative() => {
                split_total(size(*total)?, treatment_ratio(*option, *value)?)
            }
            [(O::SizeOfTreatment, treatment), (O::SizeOfReference, reference)] => {
                GroupSizes::new(size(*treatment)?, size(*reference)?)
            }
            [(O::SizeOfTreatment, n), (option, value)] if option.is_relative() => {
                let n = size(*n)?;
                GroupSizes::new(n, size(n / treatment_ratio(*option, *value)?)?)
            }
            [(O::SizeOfReference, n), (option, value)] if option.is_relative() => {
                let n = size(*n)?;
                GroupSizes::new(size(n * treatment_ratio(*option, *value)?)?, n)
            }
            _ => {
                return Err(Error::allocation(format!(
                    "{} does not determine both group sizes",
                    self.describe()
                )))
            }
        };
        debug!(
            treatment = sizes.treatment,
            reference = sizes.reference,
            "allocation resolved to group sizes"
        );
        Ok(sizes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_sizes(allocation: GroupAllocation, treatment: f64, reference: f64) {
        let sizes = allocation.group_sizes().unwrap();
        assert!((sizes.treatment - treatment).abs() < 1e-9, "{sizes:?}");
        assert!((sizes.reference - reference).abs() < 1e-9, "{sizes:?}");
    }

    #[test]
    fn test_options_order() {
        let allocation = GroupAllocation::new()
            .percent_of_reference(0.2)
            .size_of_total(100.0)
            .equal();
        assert_eq!(
            allocation.options(),
            vec![
                (GroupAllocationOption::Equal, 0.0),
                (GroupAllocationOption::SizeOfTotal, 100.0),
                (GroupAllocationOption::PercentOfReference, 0.2),
            ]
        );
        assert_eq!(allocation.describe(), "EQUAL | SIZE_OF_TOTAL | PERCENT_OF_REFERENCE");
    }

    #[test]
    fn test_for_size() {
        assert_eq!(GroupAllocation::new().for_size().unwrap(), AllocationForSize::Equal);
        assert_eq!(GroupAllocation::new().equal().for_size().unwrap(), AllocationForSize::Equal);
        assert_eq!(
            GroupAllocation::new().size_of_treatment(70.0).for_size().unwrap(),
            AllocationForSize::FixedTreatment(70.0)
        );
        assert_eq!(
            GroupAllocation::new().size_of_reference(70.0).for_size().unwrap(),
            AllocationForSize::FixedReference(70.0)
        );

        let ratios = [
            (GroupAllocation::new().ratio_of_treatment_to_reference(2.0), 2.0),
            (GroupAllocation::new().ratio_of_reference_to_treatment(2.0), 0.5),
            (GroupAllocation::new().percent_of_treatment(0.8), 4.0),
            (GroupAllocation::new().percent_of_reference(0.8), 0.25),
        ];
        for (allocation, expected) in ratios {
            match allocation.for_size().unwrap() {
                AllocationForSize::Ratio(ratio) => assert!((ratio - expected).abs() < 1e-12),
                other => panic!("expected a ratio, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_for_size_rejects_pinned_or_mixed() {
        let rejected = [
            GroupAllocation::new().equal().size_of_total(100.0),
            GroupAllocation::new().size_of_total(100.0),
            GroupAllocation::new().size_of_each(100.0),
            GroupAllocation::new().size_of_treatment(100.0).size_of_reference(100.0),
            GroupAllocation::new()
                .ratio_of_treatment_to_reference(2.0)
                .percent_of_treatment(0.5),
            GroupAllocation::new().equal().ratio_of_treatment_to_reference(2.0),
        ];
        for allocation in rejected {
            assert!(
                matches!(allocation.for_size(), Err(Error::AllocationConfig { .. })),
                "{allocation:?}"
            );
        }
    }

    #[test]
    fn test_group_sizes() {
        assert_sizes(GroupAllocation::new().equal().size_of_total(100.0), 50.0, 50.0);
        assert_sizes(GroupAllocation::new().size_of_total(100.0), 50.0, 50.0);
        assert_sizes(GroupAllocation::new().equal().size_of_each(100.0), 100.0, 100.0);
        assert_sizes(GroupAllocation::new().size_of_each(100.0), 100.0, 100.0);
        assert_sizes(GroupAllocation::new().equal().size_of_treatment(100.0), 100.0, 100.0);
        assert_sizes(GroupAllocation::new().equal().size_of_reference(100.0), 100.0, 100.0);
        assert_sizes(
            GroupAllocation::new().size_of_total(100.0).size_of_treatment(30.0),
            30.0,
            70.0,
        );
        assert_sizes(
            GroupAllocation::new().size_of_total(100.0).size_of_reference(30.0),
            70.0,
            30.0,
        );
        assert_sizes(
            GroupAllocation::new()
                .size_of_total(100.0)
                .ratio_of_treatment_to_reference(3.0),
            75.0,
            25.0,
        );
        assert_sizes(
            GroupAllocation::new()
                .size_of_total(100.0)
                .ratio_of_reference_to_treatment(3.0),
            25.0,
            75.0,
        );
        assert_sizes(
            GroupAllocation::new().size_of_total(100.0).percent_of_treatment(0.8),
            80.0,
            20.0,
        );
        assert_sizes(
            GroupAllocation::new().size_of_total(100.0).percent_of_reference(0.8),
            20.0,
            80.0,
        );
        assert_sizes(
            GroupAllocation::new().size_of_treatment(100.0).size_of_reference(60.0),
            100.0,
            60.0,
        );
        assert_sizes(
            GroupAllocation::new()
                .size_of_treatment(100.0)
                .ratio_of_treatment_to_reference(4.0),
            100.0,
            25.0,
        );
        assert_sizes(
            GroupAllocation::new().size_of_treatment(100.0).percent_of_reference(0.8),
            100.0,
            400.0,
        );
        assert_sizes(
            GroupAllocation::new()
                .size_of_reference(100.0)
                .ratio_of_treatment_to_reference(4.0),
            400.0,
            100.0,
        );
        assert_sizes(
            GroupAllocation::new().size_of_reference(100.0).percent_of_reference(0.8),
            25.0,
            100.0,
        );
    }

    #[test]
    fn test_group_sizes_rejects() {
        let rejected = [
            GroupAllocation::new(),
            GroupAllocation::new().equal(),
            GroupAllocation::new().ratio_of_treatment_to_reference(2.0),
            GroupAllocation::new()
                .ratio_of_treatment_to_reference(2.0)
                .percent_of_treatment(0.5),
            GroupAllocation::new()
                .size_of_total(100.0)
                .ratio_of_treatment_to_reference(2.0)
                .percent_of_treatment(0.5),
            GroupAllocation::new()
                .size_of_total(100.0)
                .size_of_treatment(30.0)
                .size_of_reference(70.0),
            GroupAllocation::new()
                .size_of_treatment(100.0)
                .size_of_reference(100.0)
                .ratio_of_treatment_to_reference(1.0),
        ];
        for allocation in rejected {
            assert!(
                matches!(allocation.group_sizes(), Err(Error::AllocationConfig { .. })),
                "{allocation:?}"
            );
        }
    }

    #[test]
    fn test_domain_errors() {
        // Complement must stay positive
        assert!(matches!(
            GroupAllocation::new()
                .size_of_total(100.0)
                .size_of_treatment(100.0)
                .group_sizes(),
            Err(Error::NotInDomain { name: "sample size", .. })
        ));
        assert!(matches!(
            GroupAllocation::new().percent_of_treatment(1.0).for_size(),
            Err(Error::NotInDomain { name: "percent", .. })
        ));
        assert!(matches!(
            GroupAllocation::new().size_of_treatment(-3.0).for_size(),
            Err(Error::NotInDomain { .. })
        ));
    }

    #[test]
    fn test_expand() {
        assert_eq!(AllocationForSize::Equal.expand(40.0), GroupSizes::new(40.0, 40.0));
        assert_eq!(
            AllocationForSize::FixedTreatment(70.0).expand(40.0),
            GroupSizes::new(70.0, 40.0)
        );
        assert_eq!(
            AllocationForSize::FixedReference(70.0).expand(40.0),
            GroupSizes::new(40.0, 70.0)
        );
        let sizes = AllocationForSize::Ratio(2.0).expand(90.0);
        assert!((sizes.treatment - 60.0).abs() < 1e-12);
        assert!((sizes.reference - 30.0).abs() < 1e-12);
        assert!((sizes.total() - 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_with_option() {
        let allocation = GroupAllocation::new()
            .with("size_of_total".parse().unwrap(), 100.0)
            .with(GroupAllocationOption::Equal, f64::NAN);
        assert_eq!(allocation, GroupAllocation::new().equal().size_of_total(100.0));
    }
}

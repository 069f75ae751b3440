//! # statpower
//!
//! Sample size and power calculations for proportion tests.
//!
//! ## Overview
//!
//! A power calculation ties together a handful of quantities: the sample
//! size, the significance level, the power and the effect being tested.
//! Given all but one of them, this library solves for the missing one.
//!
//! This library provides:
//! - One-sample proportion tests (exact and four z-test variants)
//! - Two-sample proportion tests (pooled/unpooled, with or without
//!   continuity correction) with flexible group allocation
//! - Dropout-inflated sample sizes
//! - Power tables over grids of sizes and significance levels
//! - Validated numeric domains with descriptive errors
//!
//! ## Quick Start
//!
//! Each design has scalar entry points that return just the solved value:
//!
//! ```rust
//! use statpower::prelude::*;
//!
//! let size = one_proportion::solve_for_sample_size(
//!     0.05,
//!     0.80,
//!     0.80,
//!     0.95,
//!     Alternative::TwoSided,
//!     one_proportion::TestType::ExactTest,
//! )
//! .unwrap();
//!
//! assert_eq!(size, 42);
//! ```
//!
//! Or use a builder and leave one parameter unset to get the full record:
//!
//! ```rust
//! use statpower::prelude::*;
//!
//! let solution = TwoProportion::new()
//!     .alpha(0.05)
//!     .power(0.80)
//!     .treatment_proportion(0.80)
//!     .reference_proportion(0.95)
//!     .group_allocation(GroupAllocation::new().ratio_of_treatment_to_reference(2.0))
//!     .dropout_rate(0.10)
//!     .solve()
//!     .unwrap();
//!
//! assert_eq!(solution.sample_sizes(), (120, 60));
//! assert_eq!(solution.sizes_include_dropouts(), (134, 67));
//! ```
//!
//! ## Features
//!
//! - `serde`: Enable serialization/deserialization of designs and solutions
//! - `parallel`: Enable parallel power tables using rayon
//! - `python`: Enable Python bindings via PyO3

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod numeric;
pub mod option;
pub mod param;
pub mod procedures;
#[cfg(feature = "python")]
pub mod python;
pub mod solver;
pub mod stats;
pub mod table;

#[cfg(feature = "parallel")]
pub mod parallel;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::numeric::{
        Alpha, Bounded, DropOutRate, Interval, Percent, Power, Proportion, Ratio, Size,
    };
    pub use crate::option::{Alternative, SearchDirection};
    pub use crate::param::Param;
    pub use crate::procedures::one_proportion::{self, OneProportion, OneProportionSolution};
    pub use crate::procedures::two_proportion::{
        self, GroupAllocation, GroupAllocationOption, GroupSizes, TwoProportion,
        TwoProportionSolution,
    };
    pub use crate::solver::SolverConfig;
    pub use crate::table::{power_table, PowerCurve, PowerTable};

    #[cfg(feature = "parallel")]
    pub use crate::parallel::par_power_table;
}

// Re-export commonly used items at crate root
pub use error::{Error, Result};
pub use option::{Alternative, SearchDirection};
pub use procedures::one_proportion::OneProportion;
pub use procedures::two_proportion::{GroupAllocation, TwoProportion};
pub use table::{power_table, PowerCurve, PowerTable};

#[cfg(feature = "parallel")]
pub use parallel::par_power_table;

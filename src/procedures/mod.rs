//! Hypothesis test designs.
//!
//! Each design bundles a closed-form power function with a builder that
//! leaves exactly one parameter unknown and solves for it.
//!
//! | Design | Module | Effect parameters |
//! |--------|--------|-------------------|
//! | One-sample proportion | [`one_proportion`] | null proportion, proportion |
//! | Two-sample proportion | [`two_proportion`] | treatment and reference proportions |

pub mod one_proportion;
pub mod two_proportion;

use crate::error::{Error, Result};
use crate::option::SearchDirection;

/// Check that a search direction is given exactly when the target needs one.
///
/// Effect parameters have a root on each side of the value they are
/// compared against; every other target has a single root.
pub(crate) fn check_search_direction(
    target: &'static str,
    needs_direction: bool,
    direction: Option<SearchDirection>,
) -> Result<Option<SearchDirection>> {
    match (needs_direction, direction) {
        (true, None) => Err(Error::ParameterEmpty {
            name: "search direction",
        }),
        (false, Some(_)) => Err(Error::SearchDirectionNotApplicable { target }),
        (_, direction) => Ok(direction),
    }
}

//! Error types for the statpower library.
//!
//! This module provides error handling using the `thiserror` crate, with
//! specific error variants for parameter validation, target detection,
//! group allocation and the numeric search.

use thiserror::Error;

use crate::numeric::Interval;

/// The main error type for the statpower library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============ Parameter Type Errors ============
    /// A parameter value is not of the expected kind.
    #[error("{name}: {message}")]
    ParameterType {
        /// Name of the offending parameter.
        name: &'static str,
        /// Description of what is wrong.
        message: String,
    },

    /// An option was given a spelling that names none of its members.
    #[error("unknown {kind} `{value}`, expected one of: {expected}")]
    UnknownOption {
        /// The option kind, e.g. `alternative`.
        kind: &'static str,
        /// The unrecognized spelling.
        value: String,
        /// Comma separated list of accepted spellings.
        expected: String,
    },

    // ============ Parameter Value Errors ============
    /// A numeric value lies outside its semantic domain.
    #[error("{name} = {value} is not in {domain}")]
    NotInDomain {
        /// Name of the quantity.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// The domain the value must lie in.
        domain: Interval,
    },

    /// Interval bounds do not describe a proper interval.
    #[error("invalid interval: {message}")]
    InvalidInterval {
        /// Description of what is invalid.
        message: String,
    },

    /// A required parameter was left unset.
    #[error("{name} must be specified")]
    ParameterEmpty {
        /// Name of the missing parameter.
        name: &'static str,
    },

    // ============ Target Errors ============
    /// Every parameter is fixed, there is nothing to solve for.
    #[error("no target parameter: every parameter is fixed")]
    TargetNotExist,

    /// More than one parameter was left unknown.
    #[error("target parameter is not unique: {candidates} are all unknown")]
    TargetNotUnique {
        /// The parameters that were left unknown.
        candidates: String,
    },

    /// A search direction was supplied for a target that is uniquely determined.
    #[error("search direction does not apply when solving for {target}")]
    SearchDirectionNotApplicable {
        /// The target being solved for.
        target: &'static str,
    },

    // ============ Allocation Errors ============
    /// The group allocation fields are ambiguous or contradictory.
    #[error("invalid group allocation: {message}")]
    AllocationConfig {
        /// Description of the rejected combination.
        message: String,
    },

    // ============ Calculation Errors ============
    /// The bracketing search could not find a root.
    #[error("no solution found for {target}: {message}")]
    SolutionNotFound {
        /// The target being solved for.
        target: &'static str,
        /// Why the search failed.
        message: String,
    },
}

/// A specialized `Result` type for statpower operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Create a new `ParameterType` error.
    #[must_use]
    pub fn parameter_type(name: &'static str, message: impl Into<String>) -> Self {
        Self::ParameterType {
            name,
            message: message.into(),
        }
    }

    /// Create a new `AllocationConfig` error.
    #[must_use]
    pub fn allocation(message: impl Into<String>) -> Self {
        Self::AllocationConfig {
            message: message.into(),
        }
    }

    /// Create a new `SolutionNotFound` error.
    #[must_use]
    pub fn solution_not_found(target: &'static str, message: impl Into<String>) -> Self {
        Self::SolutionNotFound {
            target,
            message: message.into(),
        }
    }

    /// Whether this error stems from a value of the wrong kind rather than a
    /// value of the right kind in the wrong place.
    #[must_use]
    pub fn is_type_error(&self) -> bool {
        matches!(self, Self::ParameterType { .. } | Self::UnknownOption { .. })
    }
}

//! Fixed-or-unknown parameters and target detection.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::numeric::{Bounded, Domain};

/// A design parameter that is either fixed by the caller or left as the
/// unknown to solve for.
///
/// ```
/// use statpower::param::Param;
///
/// assert_eq!(Param::from(0.05), Param::Fixed(0.05));
/// assert_eq!(Param::from(None), Param::Unknown);
/// assert!(Param::default().is_unknown());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Param {
    /// The value is given.
    Fixed(f64),
    /// The value is the target.
    #[default]
    Unknown,
}

impl Param {
    /// Whether this parameter is the target.
    #[must_use]
    pub fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// The fixed value, if any.
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Fixed(value) => Some(value),
            Self::Unknown => None,
        }
    }

    /// Validate a fixed value against domain `D`; unknown stays `None`.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`Bounded::new`].
    pub fn bounded<D: Domain>(self) -> Result<Option<Bounded<D>>> {
        Bounded::from_option(self.value())
    }

    /// Validate a value that must be fixed once the target is known.
    ///
    /// # Errors
    ///
    /// [`Error::ParameterEmpty`] if unknown, otherwise the errors of
    /// [`Bounded::new`].
    pub fn require<D: Domain>(self) -> Result<Bounded<D>> {
        self.bounded::<D>()?
            .ok_or(Error::ParameterEmpty { name: D::NAME })
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Self::Fixed(value)
    }
}

impl From<Option<f64>> for Param {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Unknown, Self::Fixed)
    }
}

/// Pick the single unknown among named parameters.
///
/// Returns `Ok(None)` when every parameter is fixed, letting the caller
/// decide whether an implicit target applies.
///
/// # Errors
///
/// [`Error::TargetNotUnique`] when more than one parameter is unknown.
pub(crate) fn find_unknown<T: Copy>(params: &[(T, &'static str, Param)]) -> Result<Option<T>> {
    let unknown: Vec<_> = params.iter().filter(|(_, _, param)| param.is_unknown()).collect();
    match unknown.as_slice() {
        [] => Ok(None),
        [(target, _, _)] => Ok(Some(*target)),
        many => Err(Error::TargetNotUnique {
            candidates: many
                .iter()
                .map(|(_, name, _)| *name)
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

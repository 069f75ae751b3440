//! Real intervals with open or closed ends.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::MIN_FLOAT;
use crate::error::{Error, Result};

/// Relative tolerance used when comparing interval bounds.
const REL_TOLERANCE: f64 = 1e-9;

/// A real interval whose ends may each be open or closed.
///
/// Single-point intervals such as `[1, 1]` are not representable.
///
/// # Example
///
/// ```
/// use statpower::numeric::Interval;
///
/// let interval = Interval::new(0.0, 1.0, true, false).unwrap();
/// assert!(interval.contains(0.0));
/// assert!(interval.contains(0.5));
/// assert!(!interval.contains(1.0));
/// assert_eq!(interval.pseudo_bound(), (0.0, 1.0 - 1e-10));
/// assert_eq!(interval.to_string(), "[0, 1)");
/// ```
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval {
    lower: f64,
    upper: f64,
    lower_inclusive: bool,
    upper_inclusive: bool,
}

impl Interval {
    /// Create a new interval.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInterval`] if either bound is not finite or
    /// if `lower >= upper`.
    pub fn new(lower: f64, upper: f64, lower_inclusive: bool, upper_inclusive: bool) -> Result<Self> {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(Error::InvalidInterval {
                message: format!("bounds must be finite, got ({lower}, {upper})"),
            });
        }
        if lower >= upper {
            return Err(Error::InvalidInterval {
                message: format!("lower bound {lower} must be less than upper bound {upper}"),
            });
        }
        Ok(Self::from_parts(lower, upper, lower_inclusive, upper_inclusive))
    }

    /// Build an interval from bounds known to be valid.
    pub(crate) const fn from_parts(
        lower: f64,
        upper: f64,
        lower_inclusive: bool,
        upper_inclusive: bool,
    ) -> Self {
        Self {
            lower,
            upper,
            lower_inclusive,
            upper_inclusive,
        }
    }

    /// Lower bound.
    #[must_use]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper bound.
    #[must_use]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Whether the lower bound belongs to the interval.
    #[must_use]
    pub fn lower_inclusive(&self) -> bool {
        self.lower_inclusive
    }

    /// Whether the upper bound belongs to the interval.
    #[must_use]
    pub fn upper_inclusive(&self) -> bool {
        self.upper_inclusive
    }

    /// Check whether `value` lies in the interval.
    ///
    /// NaN is never contained.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        let above = if self.lower_inclusive {
            value >= self.lower
        } else {
            value > self.lower
        };
        let below = if self.upper_inclusive {
            value <= self.upper
        } else {
            value < self.upper
        };
        above && below
    }

    /// Lower bound nudged inward by `eps` when it is exclusive.
    ///
    /// When `eps` is lost to rounding (large bounds), the bound moves by one
    /// representable step instead.
    #[must_use]
    pub fn pseudo_lower(&self, eps: f64) -> f64 {
        if self.lower_inclusive {
            return self.lower;
        }
        let nudged = self.lower + eps;
        if nudged > self.lower {
            nudged
        } else {
            step_up(self.lower)
        }
    }

    /// Upper bound nudged inward by `eps` when it is exclusive.
    #[must_use]
    pub fn pseudo_upper(&self, eps: f64) -> f64 {
        if self.upper_inclusive {
            return self.upper;
        }
        let nudged = self.upper - eps;
        if nudged < self.upper {
            nudged
        } else {
            -step_up(-self.upper)
        }
    }

    /// Pseudo bounds with a custom epsilon.
    #[must_use]
    pub fn pseudo_bound_with(&self, eps: f64) -> (f64, f64) {
        (self.pseudo_lower(eps), self.pseudo_upper(eps))
    }

    /// Pseudo bounds with the default epsilon [`MIN_FLOAT`].
    ///
    /// These are safe search limits: they never touch an exclusive edge.
    #[must_use]
    pub fn pseudo_bound(&self) -> (f64, f64) {
        self.pseudo_bound_with(MIN_FLOAT)
    }
}

/// The next representable value above a finite `x`.
fn step_up(x: f64) -> f64 {
    if x == 0.0 {
        f64::from_bits(1)
    } else if x > 0.0 {
        f64::from_bits(x.to_bits() + 1)
    } else {
        f64::from_bits(x.to_bits() - 1)
    }
}

fn is_close(a: f64, b: f64) -> bool {
    a == b || (a - b).abs() <= REL_TOLERANCE * a.abs().max(b.abs())
}

impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        is_close(self.lower, other.lower)
            && is_close(self.upper, other.upper)
            && self.lower_inclusive == other.lower_inclusive
            && self.upper_inclusive == other.upper_inclusive
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.lower_inclusive { '[' } else { '(' };
        let close = if self.upper_inclusive { ']' } else { ')' };
        write!(f, "{open}{}, {}{close}", self.lower, self.upper)
    }
}

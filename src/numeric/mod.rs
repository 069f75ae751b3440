//! Domain-constrained numeric values.
//!
//! Every quantity that enters a power analysis (significance level, power,
//! proportions, sample sizes, ...) has a valid range. This module provides a
//! single value type, [`Bounded`], parameterized by a domain tag that fixes
//! that range. Construction validates the value once; afterwards it behaves
//! as a plain `f64` and arithmetic yields plain `f64` results.
//!
//! ## Overview
//!
//! - [`Interval`]: Open, closed or half-open real interval
//! - [`Domain`]: Trait implemented by the domain tags
//! - [`Bounded`]: A validated value in a domain
//! - [`Alpha`], [`Power`], [`Proportion`], [`Size`], ...: Aliases per quantity
//!
//! ## Example
//!
//! ```
//! use statpower::numeric::{Alpha, Size};
//!
//! let alpha = Alpha::new(0.05).unwrap();
//! let size = Size::new(42.0).unwrap();
//! assert_eq!(alpha * 2.0, 0.1);
//! assert_eq!(size + alpha, 42.05);
//!
//! assert!(Alpha::new(1.8).is_err());
//! assert_eq!(Alpha::pseudo_bound(), (1e-10, 1.0 - 1e-10));
//! ```

mod interval;

pub use interval::Interval;

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::error::{Error, Result};

/// Smallest magnitude used to nudge search limits off exclusive bounds.
pub const MIN_FLOAT: f64 = 1e-10;

/// Largest magnitude representable by any domain.
pub const MAX_FLOAT: f64 = 1e10;

/// A semantic domain: a name and the interval its values must lie in.
pub trait Domain: Send + Sync + 'static {
    /// Human readable name used in error messages.
    const NAME: &'static str;

    /// The valid range.
    const INTERVAL: Interval;
}

/// A finite real value that lies in the domain `D`.
///
/// # Example
///
/// ```
/// use statpower::numeric::{DropOutRate, Proportion};
///
/// assert!(DropOutRate::new(0.0).is_ok());       // [0, 1)
/// assert!(DropOutRate::new(1.0).is_err());
/// assert!(Proportion::new(0.0).is_err());       // (0, 1)
/// assert_eq!(Proportion::from_option(None).unwrap(), None);
/// ```
#[repr(transparent)]
pub struct Bounded<D: Domain> {
    value: f64,
    domain: PhantomData<D>,
}

impl<D: Domain> Bounded<D> {
    /// Validate `value` against the domain.
    ///
    /// # Errors
    ///
    /// - [`Error::ParameterType`] if `value` is NaN or infinite
    /// - [`Error::NotInDomain`] if `value` lies outside the domain
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::parameter_type(
                D::NAME,
                format!("{value} is not a real number"),
            ));
        }
        if !D::INTERVAL.contains(value) {
            return Err(Error::NotInDomain {
                name: D::NAME,
                value,
                domain: D::INTERVAL,
            });
        }
        Ok(Self {
            value,
            domain: PhantomData,
        })
    }

    /// Validate an optional value; `None` passes through unchanged.
    ///
    /// # Errors
    ///
    /// Same as [`Bounded::new`] for `Some` values.
    pub fn from_option(value: Option<f64>) -> Result<Option<Self>> {
        value.map(Self::new).transpose()
    }

    /// Parse text at an input boundary.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParameterType`] if `text` is not a number, otherwise
    /// the errors of [`Bounded::new`].
    pub fn parse(text: &str) -> Result<Self> {
        let value: f64 = text.trim().parse().map_err(|_| {
            Error::parameter_type(D::NAME, format!("`{text}` is not a real number"))
        })?;
        Self::new(value)
    }

    /// The wrapped value.
    #[must_use]
    pub fn get(self) -> f64 {
        self.value
    }

    /// The domain interval.
    #[must_use]
    pub fn domain() -> Interval {
        D::INTERVAL
    }

    /// The domain name.
    #[must_use]
    pub fn name() -> &'static str {
        D::NAME
    }

    /// Search limits strictly inside any exclusive domain edge.
    #[must_use]
    pub fn pseudo_bound() -> (f64, f64) {
        D::INTERVAL.pseudo_bound()
    }
}

impl<D: Domain> Clone for Bounded<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: Domain> Copy for Bounded<D> {}

impl<D: Domain> fmt::Debug for Bounded<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", D::NAME, self.value)
    }
}

impl<D: Domain> fmt::Display for Bounded<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl<D: Domain> From<Bounded<D>> for f64 {
    fn from(value: Bounded<D>) -> Self {
        value.value
    }
}

impl<D: Domain> TryFrom<f64> for Bounded<D> {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl<D: Domain, E: Domain> PartialEq<Bounded<E>> for Bounded<D> {
    fn eq(&self, other: &Bounded<E>) -> bool {
        self.value == other.value
    }
}

impl<D: Domain> PartialEq<f64> for Bounded<D> {
    fn eq(&self, other: &f64) -> bool {
        self.value == *other
    }
}

impl<D: Domain, E: Domain> PartialOrd<Bounded<E>> for Bounded<D> {
    fn partial_cmp(&self, other: &Bounded<E>) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl<D: Domain> PartialOrd<f64> for Bounded<D> {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.value.partial_cmp(other)
    }
}

impl<D: Domain> Neg for Bounded<D> {
    type Output = f64;

    fn neg(self) -> f64 {
        -self.value
    }
}

macro_rules! impl_arithmetic {
    ($($trait:ident :: $method:ident),+ $(,)?) => {$(
        impl<D: Domain> $trait<f64> for Bounded<D> {
            type Output = f64;

            fn $method(self, rhs: f64) -> f64 {
                $trait::$method(self.value, rhs)
            }
        }

        impl<D: Domain> $trait<Bounded<D>> for f64 {
            type Output = f64;

            fn $method(self, rhs: Bounded<D>) -> f64 {
                $trait::$method(self, rhs.value)
            }
        }

        impl<D: Domain, E: Domain> $trait<Bounded<E>> for Bounded<D> {
            type Output = f64;

            fn $method(self, rhs: Bounded<E>) -> f64 {
                $trait::$method(self.value, rhs.value)
            }
        }
    )+};
}

impl_arithmetic!(Add::add, Sub::sub, Mul::mul, Div::div);

macro_rules! domains {
    ($(
        $(#[$meta:meta])*
        $tag:ident => $alias:ident, $name:literal, $interval:expr;
    )+) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $tag;

        impl Domain for $tag {
            const NAME: &'static str = $name;
            const INTERVAL: Interval = $interval;
        }

        $(#[$meta])*
        pub type $alias = Bounded<$tag>;
    )+};
}

domains! {
    /// Any representable real, `[-MAX_FLOAT, MAX_FLOAT]`.
    RealTag => Real, "real", Interval::from_parts(-MAX_FLOAT, MAX_FLOAT, true, true);
    /// Significance level, `(0, 1)`.
    AlphaTag => Alpha, "alpha", Interval::from_parts(0.0, 1.0, false, false);
    /// Statistical power, `(0, 1)`.
    PowerTag => Power, "power", Interval::from_parts(0.0, 1.0, false, false);
    /// Mean, `(-MAX_FLOAT, MAX_FLOAT)`.
    MeanTag => Mean, "mean", Interval::from_parts(-MAX_FLOAT, MAX_FLOAT, false, false);
    /// Standard deviation, `(0, MAX_FLOAT)`.
    StdTag => Std, "standard deviation", Interval::from_parts(0.0, MAX_FLOAT, false, false);
    /// Proportion, `(0, 1)`.
    ProportionTag => Proportion, "proportion", Interval::from_parts(0.0, 1.0, false, false);
    /// Percentage expressed as a fraction, `(0, 1)`.
    PercentTag => Percent, "percent", Interval::from_parts(0.0, 1.0, false, false);
    /// Ratio, `(0, MAX_FLOAT)`.
    RatioTag => Ratio, "ratio", Interval::from_parts(0.0, MAX_FLOAT, false, false);
    /// Sample size, `(0, MAX_FLOAT)`.
    SizeTag => Size, "sample size", Interval::from_parts(0.0, MAX_FLOAT, false, false);
    /// Dropout rate, `[0, 1)`.
    DropOutRateTag => DropOutRate, "dropout rate", Interval::from_parts(0.0, 1.0, true, false);
    /// Number of dropouts, `[0, MAX_FLOAT)`.
    DropOutSizeTag => DropOutSize, "dropout size", Interval::from_parts(0.0, MAX_FLOAT, true, false);
}

/// Tolerance for treating an inflated size as an exact integer.
const INTEGER_TOLERANCE: f64 = 1e-9;

/// Round a continuous sample size up to a whole number of subjects.
// Sizes are bounded by MAX_FLOAT, well inside u64.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn ceil_size(size: f64) -> u64 {
    let nearest = size.round();
    let rounded = if (size - nearest).abs() < INTEGER_TOLERANCE {
        nearest
    } else {
        size.ceil()
    };
    rounded.max(0.0) as u64
}

/// Inflate a size so that `size` subjects remain after `dropout_rate` leave.
///
/// The ideal size is rounded up first, then divided by the retention rate
/// and rounded up again.
///
/// ```
/// use statpower::numeric::{inflate_for_dropout, DropOutRate};
///
/// let rate = DropOutRate::new(0.10).unwrap();
/// assert_eq!(inflate_for_dropout(75.3, rate), 85);
/// assert_eq!(inflate_for_dropout(90.0, rate), 100);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn inflate_for_dropout(size: f64, dropout_rate: DropOutRate) -> u64 {
    let whole = ceil_size(size) as f64;
    ceil_size(whole / (1.0 - dropout_rate.get()))
}

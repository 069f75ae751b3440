//! Closed option enums shared by all test designs.
//!
//! Internally every option is a strict enum. Text spellings are only
//! accepted at the input boundary through [`std::str::FromStr`], which is
//! case-insensitive.
//!
//! ```
//! use statpower::option::{Alternative, SearchDirection};
//!
//! assert_eq!("two_sided".parse::<Alternative>().unwrap(), Alternative::TwoSided);
//! assert_eq!("Lower".parse::<SearchDirection>().unwrap(), SearchDirection::Less);
//! assert!("three_sided".parse::<Alternative>().is_err());
//! ```

/// Declare an option enum together with its accepted spellings.
///
/// The first spelling of each variant is canonical and used by `Display`.
/// `Default` is not derived; enums that have a natural default add
/// `#[derive(Default)]` and mark the variant with `#[default]`.
macro_rules! option_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($kind:literal) {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => [$canonical:literal $(, $alias:literal)*]
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Canonical spelling.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $canonical,)+
                }
            }

            fn spellings(self) -> &'static [&'static str] {
                match self {
                    $(Self::$variant => &[$canonical $(, $alias)*],)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::Error;

            fn from_str(text: &str) -> $crate::error::Result<Self> {
                let text = text.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|member| {
                        member
                            .spellings()
                            .iter()
                            .any(|spelling| spelling.eq_ignore_ascii_case(text))
                    })
                    .ok_or_else(|| $crate::error::Error::UnknownOption {
                        kind: $kind,
                        value: text.to_string(),
                        expected: Self::ALL
                            .iter()
                            .map(|member| member.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

pub(crate) use option_enum;

option_enum! {
    /// Alternative hypothesis.
    #[derive(Default)]
    pub enum Alternative("alternative") {
        /// Reject in both tails; alpha is split in two.
        #[default]
        TwoSided => ["TWO_SIDED"],
        /// Reject in the tail pointing in the direction of the effect.
        OneSided => ["ONE_SIDED"],
    }
}

option_enum! {
    /// Which side of a reference value to search when solving for an
    /// effect parameter that has two roots.
    pub enum SearchDirection("search direction") {
        /// Search below the reference value.
        Less => ["LESS", "LOWER"],
        /// Search above the reference value.
        Greater => ["GREATER", "UPPER"],
    }
}

impl SearchDirection {
    /// Narrow `domain` to the side of `pivot` this direction points to.
    #[must_use]
    pub fn bracket(self, pivot: f64, domain: (f64, f64)) -> (f64, f64) {
        match self {
            Self::Less => (domain.0, pivot),
            Self::Greater => (pivot, domain.1),
        }
    }
}

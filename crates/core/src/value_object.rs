//! Value primitives: constrained scalars that validate on construction.
//!
//! Each primitive is immutable once built. Invalid input never produces an
//! instance; it fails with a [`DomainError::Validation`] naming the rule. The
//! same rules apply when a primitive is deserialized.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Marker trait for value objects.
///
/// Value objects have no identity: two instances holding the same value are
/// interchangeable.
pub trait ValueObject: Clone + PartialEq + fmt::Debug {}

macro_rules! impl_text_primitive {
    ($(#[$meta:meta])* $t:ident, $msg:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $t(String);

        impl $t {
            pub fn new(value: impl Into<String>) -> DomainResult<Self> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(DomainError::validation($msg));
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $t {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ValueObject for $t {}
    };
}

macro_rules! impl_integer_primitive {
    ($(#[$meta:meta])* $t:ident, min = $min:expr, $msg:literal) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $t(i64);

        impl $t {
            pub fn new(value: i64) -> DomainResult<Self> {
                if value < $min {
                    return Err(DomainError::validation($msg));
                }
                Ok(Self(value))
            }

            pub fn value(self) -> i64 {
                self.0
            }
        }

        impl TryFrom<i64> for $t {
            type Error = DomainError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl ValueObject for $t {}
    };
}

impl_text_primitive!(
    /// Unique textual product identifier.
    Code,
    "Code cannot be empty"
);

impl_text_primitive!(
    /// Unique campaign name.
    CampaignName,
    "Name cannot be empty"
);

impl_integer_primitive!(
    /// Units on the shelf.
    Stock,
    min = 0,
    "Stock cannot be negative"
);

impl_integer_primitive!(
    /// Units requested by a single order.
    Quantity,
    min = 1,
    "Quantity must be positive"
);

impl_integer_primitive!(
    /// A span of simulated hours.
    Duration,
    min = 1,
    "Duration must be positive"
);

impl_integer_primitive!(
    /// Maximum price swing a campaign may apply, in price units.
    PriceManipulationLimit,
    min = 1,
    "Price manipulation limit must be positive"
);

impl_integer_primitive!(
    /// Campaign sales goal, in units.
    TargetSalesCount,
    min = 1,
    "Target sales count must be positive"
);

impl_integer_primitive!(
    /// Cumulative units ever requested against a product.
    Demand,
    min = 0,
    "Demand cannot be negative"
);

/// Unit price. Strictly positive and finite.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> DomainResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(DomainError::validation("Price must be positive"));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Price {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for f64 {
    fn from(value: Price) -> Self {
        value.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl ValueObject for Price {}

/// Campaign lifecycle status. `Ended` is terminal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Active,
    Ended,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Active => "Active",
            Status::Ended => "Ended",
        }
    }

    pub fn is_active(self) -> bool {
        self == Status::Active
    }
}

impl FromStr for Status {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err(DomainError::validation("Status cannot be empty")),
            "Active" => Ok(Status::Active),
            "Ended" => Ok(Status::Ended),
            _ => Err(DomainError::validation(
                "Status must be one of 'Active', 'Ended'",
            )),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ValueObject for Status {}

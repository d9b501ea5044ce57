//! Stock quantity.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reasons a quantity can be rejected.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    /// The text is not a whole number (or does not fit).
    #[error("quantity must be a whole number")]
    NotAWholeNumber,
    /// The value is below zero.
    #[error("quantity cannot be negative")]
    Negative,
}

/// Number of units a store has in stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// No stock.
    pub const ZERO: Self = Self(0);

    /// Create a quantity from a unit count.
    #[must_use]
    pub const fn new(units: u32) -> Self {
        Self(units)
    }

    /// Parse a quantity from form text.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Negative`] for values below zero and
    /// [`QuantityError::NotAWholeNumber`] for anything else that is not a
    /// 32-bit whole number.
    pub fn parse(s: &str) -> Result<Self, QuantityError> {
        let value: i64 = s.parse().map_err(|_| QuantityError::NotAWholeNumber)?;
        if value < 0 {
            return Err(QuantityError::Negative);
        }
        u32::try_from(value)
            .map(Self)
            .map_err(|_| QuantityError::NotAWholeNumber)
    }

    /// Clamp a signed count read from the store; negatives become zero.
    #[must_use]
    pub fn saturating_from_i64(value: i64) -> Self {
        Self(u32::try_from(value.max(0)).unwrap_or(u32::MAX))
    }

    /// The unit count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Whether any units are in stock.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u32> for Quantity {
    fn from(units: u32) -> Self {
        Self(units)
    }
}

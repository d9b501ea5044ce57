//! Non-negative product price using decimal arithmetic.
//!
//! Prices are entered as free text and stored remotely as a double. Holding
//! them as a [`Decimal`] in between keeps `12.99` from turning into
//! `12.989999...` when the catalog is rendered.

use core::fmt;
use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Reasons a price can be rejected.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceError {
    /// The text is not a decimal number.
    #[error("price must be a number")]
    NotANumber,
    /// The value is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// A valid number, but beyond what a price can hold.
    #[error("price is too large")]
    TooLarge,
}

/// A product price in pounds sterling.
///
/// The currency is implied: the catalog only ever shows `£`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount < Decimal::ZERO {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Parse a price from form text such as `"12.99"`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotANumber`] if the text is not a finite
    /// floating point literal, [`PriceError::Negative`] for values below
    /// zero, or [`PriceError::TooLarge`] past the range of [`Decimal`].
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        // `Decimal` accepts digit separators; plain float syntax does not.
        if s.contains('_') {
            return Err(PriceError::NotANumber);
        }
        let value: f64 = s.parse().map_err(|_| PriceError::NotANumber)?;
        if !value.is_finite() {
            return Err(PriceError::NotANumber);
        }
        if value < 0.0 {
            return Err(PriceError::Negative);
        }

        // Prefer the exact text so `1.005` is not read back as `1.00499...`.
        let amount = Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .ok()
            .or_else(|| Decimal::from_f64(value))
            .ok_or(PriceError::TooLarge)?;
        Self::new(amount)
    }

    /// Convert a floating point amount read from the store.
    ///
    /// Returns `None` for NaN, infinities and negative values.
    #[must_use]
    pub fn from_f64(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        Decimal::from_f64(amount).and_then(|d| Self::new(d).ok())
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount as a double, as written to the document store.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pence = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "{pence:.2}")
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_amounts() {
        assert_eq!(Price::parse("12.99").unwrap().to_string(), "12.99");
        assert_eq!(Price::parse("0").unwrap(), Price::ZERO);
        assert_eq!(Price::parse("5").unwrap().to_string(), "5.00");
    }

    #[test]
    fn test_parse_rejects_negative() {
        assert_eq!(Price::parse("-0.01"), Err(PriceError::Negative));
    }

    #[test]
    fn test_negative_zero_is_allowed() {
        assert!(Price::parse("-0.00").is_ok());
    }

    #[test]
    fn test_parse_rejects_non_numbers() {
        for input in ["abc", "12,99", "NaN", "inf", "£5"] {
            assert_eq!(Price::parse(input), Err(PriceError::NotANumber), "{input}");
        }
    }

    #[test]
    fn test_parse_rejects_digit_separators() {
        assert_eq!(Price::parse("1_000"), Err(PriceError::NotANumber));
    }

    #[test]
    fn test_parse_float_syntax() {
        assert_eq!(Price::parse(".5").unwrap().to_string(), "0.50");
        assert_eq!(Price::parse("1e2").unwrap().to_string(), "100.00");
    }

    #[test]
    fn test_huge_number_is_too_large_not_garbage() {
        assert_eq!(
            Price::parse("99999999999999999999999999999"),
            Err(PriceError::TooLarge)
        );
    }

    #[test]
    fn test_display_rounds_to_pence() {
        assert_eq!(Price::parse("999.999").unwrap().to_string(), "1000.00");
    }

    #[test]
    fn test_display_rounds_half_up() {
        assert_eq!(Price::parse("0.125").unwrap().to_string(), "0.13");
        assert_eq!(Price::parse("1.005").unwrap().to_string(), "1.01");
        assert_eq!(Price::parse("2.675").unwrap().to_string(), "2.68");
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(Price::from_f64(12.99).unwrap().to_string(), "12.99");
        assert!(Price::from_f64(-1.0).is_none());
        assert!(Price::from_f64(f64::NAN).is_none());
        assert!(Price::from_f64(f64::INFINITY).is_none());
    }

    #[test]
    fn test_to_f64() {
        let price = Price::parse("199.99").unwrap();
        assert!((price.to_f64() - 199.99).abs() < f64::EPSILON);
    }
}

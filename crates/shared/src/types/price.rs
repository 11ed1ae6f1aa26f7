//! Product price with fixed decimal precision.
//!
//! CRITICAL: Never use floating-point for prices.
//! This type wraps `rust_decimal::Decimal` and enforces the catalog's
//! storage format: at most 5 integer digits and 2 fractional digits.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of fractional digits a price may carry.
pub const PRICE_SCALE: u32 = 2;

/// Upper bound (exclusive) for the integer part of a price.
const PRICE_LIMIT: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

/// Errors raised when constructing a [`Price`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// Price is below zero.
    #[error("Price cannot be negative: {0}")]
    Negative(Decimal),

    /// Price has more than two fractional digits.
    #[error("Price {0} has more than {PRICE_SCALE} decimal places")]
    TooPrecise(Decimal),

    /// Price does not fit in five integer digits.
    #[error("Price {0} exceeds 99999.99")]
    TooLarge(Decimal),
}

/// A validated, non-negative product price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Validates and wraps a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is negative, has more than two
    /// fractional digits, or is 100000 or more.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        if amount.normalize().scale() > PRICE_SCALE {
            return Err(PriceError::TooPrecise(amount));
        }
        if amount >= PRICE_LIMIT {
            return Err(PriceError::TooLarge(amount));
        }
        let mut amount = amount;
        amount.rescale(PRICE_SCALE);
        Ok(Self(amount))
    }

    /// Returns the underlying decimal amount (always scale 2).
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the price is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

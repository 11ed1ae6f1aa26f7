//! Product validation errors.

use stockledger_shared::types::PriceError;
use thiserror::Error;

/// Errors raised when a product definition breaks catalog rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductRuleError {
    /// Name is blank or too long.
    #[error("Invalid product name: {0}")]
    InvalidName(String),

    /// Tax classification code is not 1 to 8 digits.
    #[error("Invalid tax classification code: {0:?}")]
    InvalidTaxCode(String),

    /// Price does not fit the catalog format.
    #[error("Invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    /// Minimum balance is negative.
    #[error("Minimum balance cannot be negative: {0}")]
    NegativeMinimumBalance(i32),
}

impl ProductRuleError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidName(_) => "INVALID_PRODUCT_NAME",
            Self::InvalidTaxCode(_) => "INVALID_TAX_CODE",
            Self::InvalidPrice(_) => "INVALID_PRICE",
            Self::NegativeMinimumBalance(_) => "NEGATIVE_MINIMUM_BALANCE",
        }
    }
}

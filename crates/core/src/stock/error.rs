//! Stock ledger error types.
//!
//! Validation errors are raised before anything is written and leave no
//! trace. `ConcurrentModification` and `Persistence` are raised after the
//! storage transaction has been rolled back, so the whole call can be retried.

use stockledger_shared::AppError;
use stockledger_shared::types::{MovementId, ProductId};
use thiserror::Error;

/// Errors that can occur while recording or reading stock movements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockError {
    // ========== Validation Errors ==========
    /// Movement has no line items.
    #[error("Movement must have at least one line item")]
    EmptyMovement,

    /// A quantity or resulting balance is negative or out of range.
    #[error(
        "Line item {line} has an invalid quantity ({quantity}) or resulting balance ({resulting_balance})"
    )]
    InvalidQuantity {
        /// Zero-based position of the offending line.
        line: usize,
        /// Submitted quantity.
        quantity: i64,
        /// Submitted resulting balance.
        resulting_balance: i64,
    },

    /// An outgoing movement references a product without stock.
    #[error("Product {0} has no stock and cannot leave the inventory")]
    IneligibleProduct(ProductId),

    /// A referenced product does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Reference number is not a positive integer.
    #[error("Reference number must be a positive integer, got {0}")]
    InvalidReferenceNumber(i64),

    // ========== Lookup Errors ==========
    /// Movement not found.
    #[error("Movement not found: {0}")]
    MovementNotFound(MovementId),

    // ========== Concurrency Errors ==========
    /// Another movement changed the product after it was read.
    #[error("Product {0} was modified concurrently, please retry")]
    ConcurrentModification(ProductId),

    // ========== Storage Errors ==========
    /// The storage transaction failed and was rolled back.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl StockError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyMovement => "EMPTY_MOVEMENT",
            Self::InvalidQuantity { .. } => "INVALID_QUANTITY",
            Self::IneligibleProduct(_) => "INELIGIBLE_PRODUCT",
            Self::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            Self::InvalidReferenceNumber(_) => "INVALID_REFERENCE_NUMBER",
            Self::MovementNotFound(_) => "MOVEMENT_NOT_FOUND",
            Self::ConcurrentModification(_) => "CONCURRENT_MODIFICATION",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::EmptyMovement
            | Self::InvalidQuantity { .. }
            | Self::InvalidReferenceNumber(_) => 400,

            // 404 Not Found
            Self::ProductNotFound(_) | Self::MovementNotFound(_) => 404,

            // 409 Conflict
            Self::ConcurrentModification(_) => 409,

            // 422 Unprocessable - business rule
            Self::IneligibleProduct(_) => 422,

            // 500 Internal Server Error
            Self::Persistence(_) => 500,
        }
    }

    /// Returns true if this error is a validation failure detected before
    /// any write.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyMovement
                | Self::InvalidQuantity { .. }
                | Self::IneligibleProduct(_)
                | Self::ProductNotFound(_)
                | Self::InvalidReferenceNumber(_)
        )
    }

    /// Returns true if resubmitting the same call may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification(_) | Self::Persistence(_))
    }
}

impl From<StockError> for AppError {
    fn from(err: StockError) -> Self {
        let message = err.to_string();
        match err {
            StockError::EmptyMovement
            | StockError::InvalidQuantity { .. }
            | StockError::InvalidReferenceNumber(_) => Self::Validation(message),
            StockError::IneligibleProduct(_) => Self::BusinessRule(message),
            StockError::ProductNotFound(_) | StockError::MovementNotFound(_) => {
                Self::NotFound(message)
            }
            StockError::ConcurrentModification(_) => Self::Conflict(message),
            StockError::Persistence(_) => Self::Database(message),
        }
    }
}

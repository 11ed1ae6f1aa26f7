//! Stock movement input and validation types.

use serde::{Deserialize, Serialize};
use stockledger_shared::types::{OperatorId, ProductId};
use thiserror::Error;

/// Movement direction.
///
/// Serializes as `in`/`out`; callers may also send `IN`/`OUT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Stock entering the inventory (entrada).
    #[serde(alias = "IN", alias = "In")]
    In,
    /// Stock leaving the inventory (saida).
    #[serde(alias = "OUT", alias = "Out")]
    Out,
}

/// Error returned when a direction string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown movement direction: {0:?}")]
pub struct ParseDirectionError(pub String);

impl Direction {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }

    /// Human readable label used by listings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::In => "Entrada",
            Self::Out => "Saída",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in" | "e" | "entrada" => Ok(Self::In),
            "out" | "s" | "saida" | "saída" => Ok(Self::Out),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// One line of a movement as submitted by the caller.
///
/// Values are wide signed integers so that malformed input can be reported
/// instead of being rejected by the type system at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemInput {
    /// Product moved by this line.
    pub product_id: ProductId,
    /// Amount moved.
    pub quantity: i64,
    /// Product balance after this line, computed by the caller.
    pub resulting_balance: i64,
}

impl LineItemInput {
    /// Creates a line item input.
    #[must_use]
    pub const fn new(product_id: ProductId, quantity: i64, resulting_balance: i64) -> Self {
        Self {
            product_id,
            quantity,
            resulting_balance,
        }
    }
}

/// Request to record a movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMovementInput {
    /// Movement direction.
    pub direction: Direction,
    /// Optional external invoice number.
    pub reference_number: Option<i64>,
    /// Operator performing the movement.
    pub performed_by: OperatorId,
    /// Line items in submission order (must be non-empty).
    pub items: Vec<LineItemInput>,
}

/// The state of a product the ledger needs for validation and apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductSnapshot {
    /// Product ID.
    pub id: ProductId,
    /// Balance at read time.
    pub balance: i32,
    /// Version at read time.
    pub version: i32,
}

/// A line item that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedLine {
    /// Product moved by this line.
    pub product_id: ProductId,
    /// Amount moved.
    pub quantity: i32,
    /// Product balance after this line.
    pub resulting_balance: i32,
    /// Product state observed during validation.
    pub observed: ProductSnapshot,
}

/// A movement that passed validation and is ready to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMovement {
    /// Movement direction.
    pub direction: Direction,
    /// Validated reference number.
    pub reference_number: Option<i32>,
    /// Operator performing the movement.
    pub performed_by: OperatorId,
    /// Line items in submission order.
    pub lines: Vec<ValidatedLine>,
}

/// One balance overwrite produced by applying a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceWrite {
    /// Product to update.
    pub product_id: ProductId,
    /// Version the product must still have for the write to apply.
    pub expected_version: i32,
    /// Balance to store.
    pub new_balance: i32,
    /// Version the product has after the write.
    pub new_version: i32,
}

//! Recorded movements and their line items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stockledger_shared::types::{LineItemId, MovementId, OperatorId, ProductId};

use super::reference::format_reference;
use super::types::Direction;

/// A committed stock movement header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    /// Unique identifier.
    pub id: MovementId,
    /// Movement direction.
    pub direction: Direction,
    /// Optional external invoice number.
    pub reference_number: Option<i32>,
    /// Operator who performed the movement.
    pub performed_by: OperatorId,
    /// Commit time; movements list newest first.
    pub created_at: DateTime<Utc>,
}

impl Movement {
    /// Display form of the reference number.
    #[must_use]
    pub fn formatted_reference(&self) -> String {
        format_reference(self.reference_number)
    }
}

impl std::fmt::Display for Movement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// A committed line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Unique identifier; increases with insertion order.
    pub id: LineItemId,
    /// Owning movement.
    pub movement_id: MovementId,
    /// Product moved.
    pub product_id: ProductId,
    /// Amount moved.
    pub quantity: i32,
    /// Product balance after this line.
    pub resulting_balance: i32,
}

/// A movement together with its line items in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementWithItems {
    /// Movement header.
    pub movement: Movement,
    /// Line items, oldest first.
    pub items: Vec<LineItem>,
}

impl MovementWithItems {
    /// Sum of the quantities of all lines.
    #[must_use]
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|item| i64::from(item.quantity)).sum()
    }
}

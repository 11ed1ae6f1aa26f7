//! Enums stored as string columns.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use stockledger_core::stock::Direction;

/// Movement direction column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(3))")]
pub enum MovementDirection {
    /// Entrada.
    #[sea_orm(string_value = "in")]
    In,
    /// Saida.
    #[sea_orm(string_value = "out")]
    Out,
}

impl From<Direction> for MovementDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::In => Self::In,
            Direction::Out => Self::Out,
        }
    }
}

impl From<MovementDirection> for Direction {
    fn from(direction: MovementDirection) -> Self {
        match direction {
            MovementDirection::In => Self::In,
            MovementDirection::Out => Self::Out,
        }
    }
}

//! Stock movements and the ledger update protocol.
//!
//! A movement (entrada or saida) groups one or more line items. Each line
//! names a product, the quantity moved and the balance the product has
//! afterwards. Recording a movement is all-or-nothing:
//! - validate the whole movement before any write
//! - persist the header and its lines
//! - overwrite each product's balance with its line's resulting balance,
//!   in submission order

pub mod error;
pub mod movement;
pub mod reference;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::StockError;
pub use movement::{LineItem, Movement, MovementWithItems};
pub use reference::{MISSING_REFERENCE, format_reference};
pub use service::StockLedgerService;
pub use types::{
    BalanceWrite, Direction, LineItemInput, ParseDirectionError, ProductSnapshot,
    RecordMovementInput, ValidatedLine, ValidatedMovement,
};

//! Product catalog rules.
//!
//! Products are created administratively and then only touched by the
//! stock ledger, which overwrites their balance. This module holds the
//! validation applied at creation time and the advisory stock checks.

pub mod error;
pub mod types;

pub use error::ProductRuleError;
pub use types::{NewProduct, Product, ValidatedProduct, MAX_NAME_LEN, MAX_TAX_CODE_LEN};

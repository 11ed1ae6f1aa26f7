//! Core business logic for Stockledger.
//!
//! This crate contains pure business logic with ZERO database dependencies.
//! All domain types, validation rules, and balance planning live here.
//!
//! # Modules
//!
//! - `product` - Product catalog rules (naming, tax codes, minimum balance)
//! - `stock` - Stock movements, line items and the ledger update protocol

pub mod product;
pub mod stock;

//! Shared types, errors, and configuration for Stockledger.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for products, movements, line items and operators
//! - Fixed-point `Price` type
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, ConcurrencyPolicy, DatabaseConfig, LedgerConfig};
pub use error::{AppError, AppResult};

//! Common types used across the application.

pub mod id;
pub mod price;

pub use id::*;
pub use price::{Price, PriceError};

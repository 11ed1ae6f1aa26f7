//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod movement;
pub mod product;

pub use movement::MovementRepository;
pub use product::{ProductError, ProductRepository};

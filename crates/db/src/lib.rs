//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Database migrations
//! - The product registry and the stock ledger engine

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{MovementRepository, ProductError, ProductRepository};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use stockledger_shared::DatabaseConfig;

/// Establishes a connection pool to the configured database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);

    tracing::debug!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Connecting to database"
    );

    Database::connect(options).await
}

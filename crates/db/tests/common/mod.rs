//! Shared fixtures for database integration tests.
//!
//! Every test gets its own SQLite database migrated with the real
//! migrator. `setup_db` is in-memory with a single pooled connection so the
//! database lives as long as the test. `setup_file_db` is file-backed so
//! several pooled connections can run transactions side by side.

#![allow(dead_code)]

use std::path::PathBuf;

use rust_decimal_macros::dec;
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait};
use stockledger_core::product::{NewProduct, Product};
use stockledger_core::stock::{Direction, LineItemInput, RecordMovementInput};
use stockledger_db::entities::{movement_items, movements};
use stockledger_db::migration::{Migrator, MigratorTrait};
use stockledger_db::ProductRepository;
use stockledger_shared::DatabaseConfig;
use stockledger_shared::types::{OperatorId, ProductId};

/// Connects to a fresh in-memory database and runs all migrations.
pub async fn setup_db() -> DatabaseConnection {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };

    let db = stockledger_db::connect(&config)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// A migrated SQLite database file, removed on drop.
pub struct FileDatabase {
    /// Pool over the database file.
    pub db: DatabaseConnection,
    path: PathBuf,
}

impl Drop for FileDatabase {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.path.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

/// Creates a fresh database file in WAL mode and runs all migrations.
pub async fn setup_file_db(max_connections: u32) -> FileDatabase {
    let path = std::env::temp_dir().join(format!("stockledger-{}.db", uuid::Uuid::new_v4()));
    let config = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", path.display()),
        max_connections,
        min_connections: 1,
    };

    let db = stockledger_db::connect(&config)
        .await
        .expect("Failed to open database file");
    db.execute_unprepared("PRAGMA journal_mode = WAL;")
        .await
        .expect("Failed to enable WAL");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    FileDatabase { db, path }
}

/// Creates a product with the given opening balance.
pub async fn create_product(db: &DatabaseConnection, name: &str, balance: i32) -> Product {
    ProductRepository::new(db.clone())
        .create(NewProduct {
            name: name.to_string(),
            tax_code: "84713012".to_string(),
            imported: false,
            price: dec!(19.90),
            balance,
            minimum_balance: 0,
        })
        .await
        .expect("Failed to create product")
}

/// Builds a movement from `(product, quantity, resulting_balance)` triples.
pub fn movement(direction: Direction, lines: &[(ProductId, i64, i64)]) -> RecordMovementInput {
    RecordMovementInput {
        direction,
        reference_number: None,
        performed_by: OperatorId::new(),
        items: lines
            .iter()
            .map(|&(product_id, quantity, resulting_balance)| {
                LineItemInput::new(product_id, quantity, resulting_balance)
            })
            .collect(),
    }
}

/// Returns the number of stored movements and line items.
pub async fn row_counts(db: &DatabaseConnection) -> (u64, u64) {
    let movements = movements::Entity::find()
        .count(db)
        .await
        .expect("Failed to count movements");
    let items = movement_items::Entity::find()
        .count(db)
        .await
        .expect("Failed to count line items");
    (movements, items)
}

/// Reads a product back from the registry.
pub async fn reload(db: &DatabaseConnection, product: &Product) -> Product {
    ProductRepository::new(db.clone())
        .find(product.id)
        .await
        .expect("Failed to reload product")
}

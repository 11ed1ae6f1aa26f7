//! Demo catalog seeder for Stockledger development.
//!
//! Runs pending migrations, then creates a small stationery catalog with
//! random tax codes, prices and opening balances. Names that already
//! exist are left untouched, so the seeder can be run repeatedly.
//!
//! Usage: cargo run --bin seeder

use rand::Rng;
use rust_decimal::Decimal;
use sea_orm_migration::MigratorTrait;
use stockledger_core::product::NewProduct;
use stockledger_db::migration::Migrator;
use stockledger_db::{ProductError, ProductRepository};
use stockledger_shared::AppConfig;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEMO_PRODUCTS: [&str; 13] = [
    "Apontador",
    "Caderno 100 folhas",
    "Caderno 200 folhas",
    "Caneta Azul",
    "Caneta Preta",
    "Caneta Vermelha",
    "Durex",
    "Giz",
    "Lapiseira 0.3mm",
    "Lápis de Cor",
    "Lápis",
    "Papel para impressora",
    "Borracha",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockledger=debug,seeder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let db = stockledger_db::connect(&config.database).await?;
    info!("Connected to database");

    Migrator::up(&db, None).await?;
    info!("Migrations applied");

    let products = demo_catalog(&mut rand::rng());
    let repo = ProductRepository::new(db);

    let mut created = 0usize;
    for product in products {
        let name = product.name.clone();
        match repo.create(product).await {
            Ok(product) => {
                created += 1;
                info!(product_id = %product.id, name = %product.name, balance = product.balance, "Seeded product");
            }
            Err(ProductError::DuplicateName(_)) => {
                warn!(name = %name, "Product already exists, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!(created, "Seeding complete");
    Ok(())
}

/// Builds the demo catalog with random attributes.
fn demo_catalog(rng: &mut impl Rng) -> Vec<NewProduct> {
    DEMO_PRODUCTS
        .iter()
        .map(|name| NewProduct {
            name: (*name).to_string(),
            tax_code: random_digits(rng, 8),
            imported: rng.random_bool(0.5),
            // 1.00 to 50.00, in cents
            price: Decimal::new(rng.random_range(100..=5_000), 2),
            balance: rng.random_range(10..=200),
            minimum_balance: rng.random_range(0..=20),
        })
        .collect()
}

fn random_digits(rng: &mut impl Rng, len: usize) -> String {
    (0..len)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

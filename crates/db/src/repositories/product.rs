//! Product registry for catalog and balance operations.

use std::collections::HashMap;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use stockledger_core::product::{NewProduct, Product, ProductRuleError};
use stockledger_core::stock::ProductSnapshot;
use stockledger_shared::types::price::PRICE_SCALE;
use stockledger_shared::types::{Price, ProductId};
use tracing::{debug, info};

use crate::entities::{movement_items, products};

/// Error types for product registry operations.
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    /// Product not found.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// Another product already uses this name.
    #[error("Product name already exists: {0}")]
    DuplicateName(String),

    /// Product is referenced by movement line items.
    #[error("Product {0} is referenced by movements and cannot be deleted")]
    InUse(ProductId),

    /// Conditional balance write found a different version.
    #[error("Product {product_id} is no longer at version {expected_version}")]
    VersionMismatch {
        /// Product that was written.
        product_id: ProductId,
        /// Version the caller expected.
        expected_version: i32,
    },

    /// Catalog rule violation.
    #[error(transparent)]
    Rules(#[from] ProductRuleError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Product repository for catalog and balance operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the product does not exist.
    pub async fn find(&self, product_id: ProductId) -> Result<Product, ProductError> {
        let model = products::Entity::find_by_id(product_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(ProductError::NotFound(product_id))?;

        to_domain(model)
    }

    /// Lists all products ordered by name.
    pub async fn list(&self) -> Result<Vec<Product>, ProductError> {
        let models = products::Entity::find()
            .order_by_asc(products::Column::Name)
            .all(&self.db)
            .await?;

        models.into_iter().map(to_domain).collect()
    }

    /// Lists products that may be the subject of an outgoing line.
    pub async fn list_with_positive_balance(&self) -> Result<Vec<Product>, ProductError> {
        let models = products::Entity::find()
            .filter(products::Column::Balance.gt(0))
            .order_by_asc(products::Column::Name)
            .all(&self.db)
            .await?;

        models.into_iter().map(to_domain).collect()
    }

    /// Lists products whose balance is below their advisory minimum.
    pub async fn list_below_minimum(&self) -> Result<Vec<Product>, ProductError> {
        let models = products::Entity::find()
            .filter(
                Expr::col(products::Column::Balance)
                    .lt(Expr::col(products::Column::MinimumBalance)),
            )
            .order_by_asc(products::Column::Name)
            .all(&self.db)
            .await?;

        models.into_iter().map(to_domain).collect()
    }

    /// Creates a product after applying catalog rules.
    ///
    /// # Errors
    ///
    /// Returns `Rules` for invalid input and `DuplicateName` when the name
    /// is taken.
    pub async fn create(&self, input: NewProduct) -> Result<Product, ProductError> {
        let product = input.validate()?;
        let name = product.name.clone();

        let model = products::ActiveModel {
            name: Set(product.name),
            tax_code: Set(product.tax_code),
            imported: Set(product.imported),
            price: Set(product.price.amount()),
            balance: Set(product.balance),
            minimum_balance: Set(product.minimum_balance),
            version: Set(0),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => ProductError::DuplicateName(name),
            _ => ProductError::Database(e),
        })?;

        info!(product_id = model.id, name = %model.name, "Product created");
        to_domain(model)
    }

    /// Overwrites a product's balance. No arithmetic is applied.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the product does not exist.
    pub async fn set_balance(
        &self,
        product_id: ProductId,
        new_balance: i32,
    ) -> Result<(), ProductError> {
        Self::overwrite_balance(&self.db, product_id, new_balance).await
    }

    /// Deletes a product that no movement references.
    ///
    /// # Errors
    ///
    /// Returns `InUse` if any line item references the product.
    pub async fn delete(&self, product_id: ProductId) -> Result<(), ProductError> {
        let txn = self.db.begin().await?;

        let references = movement_items::Entity::find()
            .filter(movement_items::Column::ProductId.eq(product_id.into_inner()))
            .count(&txn)
            .await?;
        if references > 0 {
            return Err(ProductError::InUse(product_id));
        }

        let result = products::Entity::delete_by_id(product_id.into_inner())
            .exec(&txn)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => ProductError::InUse(product_id),
                _ => ProductError::Database(e),
            })?;
        if result.rows_affected == 0 {
            return Err(ProductError::NotFound(product_id));
        }

        txn.commit().await?;
        info!(product_id = %product_id, "Product deleted");
        Ok(())
    }

    /// Loads the balance and version of the given products.
    ///
    /// Missing products are absent from the map.
    pub async fn snapshots<C: ConnectionTrait>(
        conn: &C,
        product_ids: &[ProductId],
    ) -> Result<HashMap<ProductId, ProductSnapshot>, DbErr> {
        if product_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<i32> = product_ids.iter().map(|id| id.into_inner()).collect();
        let models = products::Entity::find()
            .filter(products::Column::Id.is_in(ids))
            .all(conn)
            .await?;

        Ok(models
            .into_iter()
            .map(|m| {
                let id = ProductId::new(m.id);
                (
                    id,
                    ProductSnapshot {
                        id,
                        balance: m.balance,
                        version: m.version,
                    },
                )
            })
            .collect())
    }

    /// Unconditional balance overwrite on any connection or transaction.
    ///
    /// The version is still bumped so optimistic writers notice.
    pub async fn overwrite_balance<C: ConnectionTrait>(
        conn: &C,
        product_id: ProductId,
        new_balance: i32,
    ) -> Result<(), ProductError> {
        let result = products::Entity::update_many()
            .col_expr(products::Column::Balance, Expr::value(new_balance))
            .col_expr(
                products::Column::Version,
                Expr::col(products::Column::Version).add(1),
            )
            .filter(products::Column::Id.eq(product_id.into_inner()))
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(ProductError::NotFound(product_id));
        }

        debug!(product_id = %product_id, new_balance, "Balance overwritten");
        Ok(())
    }

    /// Writes a balance only if the product is still at `expected_version`.
    ///
    /// Returns the new version.
    ///
    /// # Errors
    ///
    /// Returns `VersionMismatch` if the product changed since it was read,
    /// `NotFound` if it no longer exists.
    pub async fn compare_and_set_balance<C: ConnectionTrait>(
        conn: &C,
        product_id: ProductId,
        expected_version: i32,
        new_balance: i32,
    ) -> Result<i32, ProductError> {
        let new_version = expected_version.wrapping_add(1);

        let result = products::Entity::update_many()
            .col_expr(products::Column::Balance, Expr::value(new_balance))
            .col_expr(products::Column::Version, Expr::value(new_version))
            .filter(products::Column::Id.eq(product_id.into_inner()))
            .filter(products::Column::Version.eq(expected_version))
            .exec(conn)
            .await?;

        if result.rows_affected == 1 {
            debug!(product_id = %product_id, new_balance, new_version, "Balance written");
            return Ok(new_version);
        }

        let exists = products::Entity::find_by_id(product_id.into_inner())
            .count(conn)
            .await?
            > 0;
        if exists {
            Err(ProductError::VersionMismatch {
                product_id,
                expected_version,
            })
        } else {
            Err(ProductError::NotFound(product_id))
        }
    }
}

/// Converts a stored row into the domain product.
fn to_domain(model: products::Model) -> Result<Product, ProductError> {
    let price = Price::new(model.price.round_dp(PRICE_SCALE)).map_err(ProductRuleError::from)?;

    Ok(Product {
        id: ProductId::new(model.id),
        name: model.name,
        tax_code: model.tax_code,
        imported: model.imported,
        price,
        balance: model.balance,
        minimum_balance: model.minimum_balance,
        version: model.version,
    })
}

//! Movement repository: the stock ledger engine and movement read views.
//!
//! `record_movement` runs validation, persistence and the balance apply
//! step inside one database transaction. Any failure rolls everything back.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use stockledger_core::stock::{
    Direction, LineItem, Movement, MovementWithItems, RecordMovementInput, StockError,
    StockLedgerService, ValidatedMovement,
};
use stockledger_shared::types::{LineItemId, MovementId, OperatorId, ProductId};
use stockledger_shared::{ConcurrencyPolicy, LedgerConfig};
use tracing::{debug, info, warn};

use super::product::{ProductError, ProductRepository};
use crate::entities::{movement_items, movements, sea_orm_active_enums::MovementDirection};

/// Movement repository and ledger update engine.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    db: DatabaseConnection,
    concurrency: ConcurrencyPolicy,
}

impl MovementRepository {
    /// Creates a movement repository with optimistic balance writes.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            concurrency: ConcurrencyPolicy::default(),
        }
    }

    /// Creates a movement repository from the ledger configuration.
    #[must_use]
    pub const fn with_config(db: DatabaseConnection, config: LedgerConfig) -> Self {
        Self {
            db,
            concurrency: config.concurrency,
        }
    }

    /// Returns the balance write policy in use.
    #[must_use]
    pub const fn concurrency(&self) -> ConcurrencyPolicy {
        self.concurrency
    }

    /// Records a movement and applies its resulting balances atomically.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the movement is rejected, in which
    /// case nothing is written. Returns `ConcurrentModification` or
    /// `Persistence` if the commit failed and was rolled back.
    pub async fn record_movement(
        &self,
        input: &RecordMovementInput,
    ) -> Result<MovementId, StockError> {
        let txn = self.db.begin().await.map_err(persistence)?;

        match self.record_movement_in(&txn, input).await {
            Ok(movement_id) => {
                txn.commit().await.map_err(|e| {
                    warn!(movement_id = %movement_id, error = %e, "Movement commit failed");
                    persistence(e)
                })?;
                info!(
                    movement_id = %movement_id,
                    direction = %input.direction,
                    items = input.items.len(),
                    performed_by = %input.performed_by,
                    "Movement recorded"
                );
                Ok(movement_id)
            }
            Err(e) => {
                if !e.is_validation() {
                    warn!(error = %e, code = e.error_code(), "Movement rolled back");
                }
                Err(after_rollback(e, txn.rollback().await))
            }
        }
    }

    /// Records a movement on a caller-owned transaction.
    ///
    /// The caller commits or rolls back. On error the transaction may hold
    /// partial writes and must not be committed.
    ///
    /// # Errors
    ///
    /// Same as [`Self::record_movement`].
    pub async fn record_movement_in(
        &self,
        txn: &DatabaseTransaction,
        input: &RecordMovementInput,
    ) -> Result<MovementId, StockError> {
        // Validation reads go through the transaction
        let product_ids: Vec<ProductId> = input.items.iter().map(|i| i.product_id).collect();
        let snapshots = ProductRepository::snapshots(txn, &product_ids)
            .await
            .map_err(persistence)?;

        let movement = StockLedgerService::validate(input, |id| snapshots.get(&id).copied())
            .inspect_err(|e| debug!(error = %e, code = e.error_code(), "Movement rejected"))?;

        let movement_id = Self::insert_movement(txn, &movement).await?;
        Self::insert_items(txn, movement_id, &movement).await?;
        self.apply_balances(txn, &movement).await?;

        Ok(movement_id)
    }

    /// Inserts the movement header.
    async fn insert_movement(
        txn: &DatabaseTransaction,
        movement: &ValidatedMovement,
    ) -> Result<MovementId, StockError> {
        let model = movements::ActiveModel {
            direction: Set(movement.direction.into()),
            reference_number: Set(movement.reference_number),
            performed_by: Set(movement.performed_by.into_inner()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(persistence)?;

        Ok(MovementId::new(model.id))
    }

    /// Inserts line items in submission order.
    async fn insert_items(
        txn: &DatabaseTransaction,
        movement_id: MovementId,
        movement: &ValidatedMovement,
    ) -> Result<(), StockError> {
        for line in &movement.lines {
            movement_items::ActiveModel {
                movement_id: Set(movement_id.into_inner()),
                product_id: Set(line.product_id.into_inner()),
                quantity: Set(line.quantity),
                resulting_balance: Set(line.resulting_balance),
                ..Default::default()
            }
            .insert(txn)
            .await
            .map_err(persistence)?;
        }

        Ok(())
    }

    /// Overwrites each product's balance with its line's resulting balance.
    async fn apply_balances(
        &self,
        txn: &DatabaseTransaction,
        movement: &ValidatedMovement,
    ) -> Result<(), StockError> {
        for write in StockLedgerService::plan_balance_writes(movement) {
            let result = match self.concurrency {
                ConcurrencyPolicy::Optimistic => ProductRepository::compare_and_set_balance(
                    txn,
                    write.product_id,
                    write.expected_version,
                    write.new_balance,
                )
                .await
                .map(|_| ()),
                ConcurrencyPolicy::LastWriteWins => {
                    ProductRepository::overwrite_balance(txn, write.product_id, write.new_balance)
                        .await
                }
            };

            result.map_err(|e| match e {
                ProductError::VersionMismatch { product_id, .. } => {
                    StockError::ConcurrentModification(product_id)
                }
                ProductError::NotFound(product_id) => StockError::ProductNotFound(product_id),
                other => StockError::Persistence(other.to_string()),
            })?;
        }

        Ok(())
    }

    /// Lists movements of one direction, newest first.
    pub async fn list_movements(&self, direction: Direction) -> Result<Vec<Movement>, StockError> {
        let models = movements::Entity::find()
            .filter(movements::Column::Direction.eq(MovementDirection::from(direction)))
            .order_by_desc(movements::Column::CreatedAt)
            .order_by_desc(movements::Column::Id)
            .all(&self.db)
            .await
            .map_err(persistence)?;

        Ok(models.into_iter().map(movement_to_domain).collect())
    }

    /// Lists incoming movements (entradas), newest first.
    pub async fn list_entries(&self) -> Result<Vec<Movement>, StockError> {
        self.list_movements(Direction::In).await
    }

    /// Lists outgoing movements (saidas), newest first.
    pub async fn list_exits(&self) -> Result<Vec<Movement>, StockError> {
        self.list_movements(Direction::Out).await
    }

    /// Gets a movement with its line items in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `MovementNotFound` if the movement does not exist.
    pub async fn get_movement(
        &self,
        movement_id: MovementId,
    ) -> Result<MovementWithItems, StockError> {
        let movement = movements::Entity::find_by_id(movement_id.into_inner())
            .one(&self.db)
            .await
            .map_err(persistence)?
            .ok_or(StockError::MovementNotFound(movement_id))?;

        let items = movement_items::Entity::find()
            .filter(movement_items::Column::MovementId.eq(movement_id.into_inner()))
            .order_by_asc(movement_items::Column::Id)
            .all(&self.db)
            .await
            .map_err(persistence)?;

        Ok(MovementWithItems {
            movement: movement_to_domain(movement),
            items: items.into_iter().map(item_to_domain).collect(),
        })
    }

    /// Deletes a movement and its line items. Product balances are left
    /// as they are.
    ///
    /// # Errors
    ///
    /// Returns `MovementNotFound` if the movement does not exist.
    pub async fn delete_movement(&self, movement_id: MovementId) -> Result<(), StockError> {
        let result = movements::Entity::delete_by_id(movement_id.into_inner())
            .exec(&self.db)
            .await
            .map_err(persistence)?;

        if result.rows_affected == 0 {
            return Err(StockError::MovementNotFound(movement_id));
        }

        info!(movement_id = %movement_id, "Movement deleted");
        Ok(())
    }
}

fn persistence(err: DbErr) -> StockError {
    StockError::Persistence(err.to_string())
}

/// Returns the movement error even when the rollback fails.
fn after_rollback(err: StockError, rollback: Result<(), DbErr>) -> StockError {
    if let Err(rollback_err) = rollback {
        warn!(error = %rollback_err, original = %err, "Movement rollback failed");
    }
    err
}

fn movement_to_domain(model: movements::Model) -> Movement {
    Movement {
        id: MovementId::new(model.id),
        direction: model.direction.into(),
        reference_number: model.reference_number,
        performed_by: OperatorId::from_uuid(model.performed_by),
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn item_to_domain(model: movement_items::Model) -> LineItem {
    LineItem {
        id: LineItemId::new(model.id),
        movement_id: MovementId::new(model.movement_id),
        product_id: ProductId::new(model.product_id),
        quantity: model.quantity,
        resulting_balance: model.resulting_balance,
    }
}

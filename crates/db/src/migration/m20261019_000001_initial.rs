//! Initial schema: products, movements and movement items.
//!
//! Movement items cascade with their movement and restrict deletion of
//! the products they reference.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk_auto(Products::Id))
                    .col(string_len_uniq(Products::Name, 100))
                    .col(string_len(Products::TaxCode, 8))
                    .col(boolean(Products::Imported).default(false))
                    .col(
                        decimal_len(Products::Price, 7, 2)
                            .check(Expr::col(Products::Price).gte(0)),
                    )
                    .col(integer(Products::Balance).default(0))
                    .col(
                        integer(Products::MinimumBalance)
                            .default(0)
                            .check(Expr::col(Products::MinimumBalance).gte(0)),
                    )
                    .col(integer(Products::Version).default(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movements::Table)
                    .if_not_exists()
                    .col(pk_auto(Movements::Id))
                    .col(string_len(Movements::Direction, 3))
                    .col(
                        integer_null(Movements::ReferenceNumber)
                            .check(Expr::col(Movements::ReferenceNumber).gt(0)),
                    )
                    .col(uuid(Movements::PerformedBy))
                    .col(timestamp_with_time_zone(Movements::CreatedAt))
                    .check(Expr::col(Movements::Direction).is_in(["in", "out"]))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovementItems::Table)
                    .if_not_exists()
                    .col(pk_auto(MovementItems::Id))
                    .col(integer(MovementItems::MovementId))
                    .col(integer(MovementItems::ProductId))
                    .col(
                        integer(MovementItems::Quantity)
                            .check(Expr::col(MovementItems::Quantity).gte(0)),
                    )
                    .col(
                        integer(MovementItems::ResultingBalance)
                            .check(Expr::col(MovementItems::ResultingBalance).gte(0)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movement_items_movement")
                            .from(MovementItems::Table, MovementItems::MovementId)
                            .to(Movements::Table, Movements::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movement_items_product")
                            .from(MovementItems::Table, MovementItems::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing by direction, newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_movements_direction_created")
                    .table(Movements::Table)
                    .col(Movements::Direction)
                    .col(Movements::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movement_items_movement")
                    .table(MovementItems::Table)
                    .col(MovementItems::MovementId)
                    .to_owned(),
            )
            .await?;

        // Restrict checks on product deletion
        manager
            .create_index(
                Index::create()
                    .name("idx_movement_items_product")
                    .table(MovementItems::Table)
                    .col(MovementItems::ProductId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MovementItems::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Movements::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Name,
    TaxCode,
    Imported,
    Price,
    Balance,
    MinimumBalance,
    Version,
}

#[derive(DeriveIden)]
enum Movements {
    Table,
    Id,
    Direction,
    ReferenceNumber,
    PerformedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum MovementItems {
    Table,
    Id,
    MovementId,
    ProductId,
    Quantity,
    ResultingBalance,
}

//! `SeaORM` Entity for products table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub tax_code: String,
    pub imported: bool,
    #[sea_orm(column_type = "Decimal(Some((7, 2)))")]
    pub price: Decimal,
    pub balance: i32,
    pub minimum_balance: i32,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movement_items::Entity")]
    MovementItems,
}

impl Related<super::movement_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovementItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! `SeaORM` Entity for movements table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::MovementDirection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub direction: MovementDirection,
    pub reference_number: Option<i32>,
    pub performed_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
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

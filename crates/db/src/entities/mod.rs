//! `SeaORM` entities.

pub mod prelude;

pub mod movement_items;
pub mod movements;
pub mod products;
pub mod sea_orm_active_enums;

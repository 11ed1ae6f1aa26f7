//! Entity re-exports.

pub use super::movement_items::Entity as MovementItems;
pub use super::movements::Entity as Movements;
pub use super::products::Entity as Products;

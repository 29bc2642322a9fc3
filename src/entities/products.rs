//! SeaORM Entity for tracked products
//!
//! A product owns its current offer set (replaced wholesale every sync
//! cycle) and an append-only price snapshot history.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Display name (e.g., "Lawnmower 3000")
    pub name: String,
    /// Free-text description
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Timestamp when the product was registered
    pub created_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::offers::Entity")]
    Offers,
    #[sea_orm(has_many = "super::price_snapshots::Entity")]
    PriceSnapshots,
}

impl Related<super::offers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Offers.def()
    }
}

impl Related<super::price_snapshots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PriceSnapshots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

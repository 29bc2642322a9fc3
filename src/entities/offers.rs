//! SeaORM Entity for market offers
//!
//! Offers are never patched individually: the whole set for a product is
//! deleted and recreated on every synchronization cycle.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "offers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Offer id assigned by the external offers service
    pub source_offer_id: i64,
    /// Quoted price
    #[sea_orm(column_type = "Decimal(Some((20, 6)))")]
    pub price: Decimal,
    /// Items in stock at the quoting merchant
    pub items_in_stock: i32,
    /// Owning product
    pub product_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_delete = "Cascade"
    )]
    Products,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

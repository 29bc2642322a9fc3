//! SeaORM Entity for average-price snapshot time-series storage
//!
//! Append-only: rows are written once per sync cycle and only ever removed
//! when the owning product is deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "price_snapshots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Arithmetic mean of the product's offer prices at snapshot time
    #[sea_orm(column_type = "Decimal(Some((20, 6)))")]
    pub price: Decimal,
    /// Timestamp of the observation
    pub timestamp: DateTimeWithTimeZone,
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

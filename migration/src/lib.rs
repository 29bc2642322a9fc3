pub use sea_orm_migration::prelude::*;

mod m20260829_000001_create_products;
mod m20260829_000002_create_offers;
mod m20260829_000003_create_price_snapshots;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260829_000001_create_products::Migration),
            Box::new(m20260829_000002_create_offers::Migration),
            Box::new(m20260829_000003_create_price_snapshots::Migration),
        ]
    }
}

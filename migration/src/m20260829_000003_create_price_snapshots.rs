use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PriceSnapshots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PriceSnapshots::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PriceSnapshots::Price)
                            .decimal_len(16, 6)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PriceSnapshots::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PriceSnapshots::ProductId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_price_snapshots_product_id")
                            .from(PriceSnapshots::Table, PriceSnapshots::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Lookup path for history/price-change queries: (product_id, timestamp)
        manager
            .create_index(
                Index::create()
                    .name("idx_price_snapshots_product_time")
                    .table(PriceSnapshots::Table)
                    .col(PriceSnapshots::ProductId)
                    .col(PriceSnapshots::Timestamp)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PriceSnapshots::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PriceSnapshots {
    Table,
    Id,
    Price,
    Timestamp,
    ProductId,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
}

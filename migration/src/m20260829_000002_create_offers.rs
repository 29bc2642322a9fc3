use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Offers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Offers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Offers::SourceOfferId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Offers::Price)
                            .decimal_len(16, 6)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Offers::ItemsInStock).integer().not_null())
                    .col(ColumnDef::new(Offers::ProductId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_offers_product_id")
                            .from(Offers::Table, Offers::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_offers_product_id")
                    .table(Offers::Table)
                    .col(Offers::ProductId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Offers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Offers {
    Table,
    Id,
    SourceOfferId,
    Price,
    ItemsInStock,
    ProductId,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
}

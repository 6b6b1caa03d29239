//! Create product table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Product::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Product::FestivalId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Product::Name).string().not_null())
                    .col(ColumnDef::new(Product::Price).integer().not_null())
                    .col(ColumnDef::new(Product::OriginalPrice).integer())
                    .col(ColumnDef::new(Product::Stock).integer().not_null())
                    .col(
                        ColumnDef::new(Product::ProductType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Product::ImageUrl).string())
                    .col(ColumnDef::new(Product::Description).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_festival")
                            .from(Product::Table, Product::FestivalId)
                            .to(Festival::Table, Festival::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: festival_id (for listing a festival's products)
        manager
            .create_index(
                Index::create()
                    .name("idx_product_festival_id")
                    .table(Product::Table)
                    .col(Product::FestivalId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Product::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Product {
    Table,
    Id,
    FestivalId,
    Name,
    Price,
    OriginalPrice,
    Stock,
    ProductType,
    ImageUrl,
    Description,
}

#[derive(Iden)]
enum Festival {
    Table,
    Id,
}

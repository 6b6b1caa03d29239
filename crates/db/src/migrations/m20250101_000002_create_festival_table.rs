//! Create festival table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Festival::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Festival::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Festival::Name).string().not_null())
                    .col(ColumnDef::new(Festival::Description).text().not_null())
                    .col(ColumnDef::new(Festival::Location).string().not_null())
                    .col(ColumnDef::new(Festival::Categories).string())
                    .col(ColumnDef::new(Festival::Lat).double())
                    .col(ColumnDef::new(Festival::Lng).double())
                    .col(ColumnDef::new(Festival::ImageUrl).string())
                    .col(ColumnDef::new(Festival::Region).string().not_null())
                    .col(ColumnDef::new(Festival::StartDate).date().not_null())
                    .col(ColumnDef::new(Festival::EndDate).date().not_null())
                    .to_owned(),
            )
            .await?;

        // Index: end_date (for the upcoming-festivals listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_festival_end_date")
                    .table(Festival::Table)
                    .col(Festival::EndDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Festival::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Festival {
    Table,
    Id,
    Name,
    Description,
    Location,
    Categories,
    Lat,
    Lng,
    ImageUrl,
    Region,
    StartDate,
    EndDate,
}

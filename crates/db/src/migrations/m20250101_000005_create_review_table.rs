//! Create review table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Review::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Review::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Review::FestivalId).big_integer().not_null())
                    .col(ColumnDef::new(Review::Rating).double().not_null())
                    .col(ColumnDef::new(Review::Content).string_len(500).not_null())
                    .col(
                        ColumnDef::new(Review::ReviewDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Review::LastModified)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_user")
                            .from(Review::Table, Review::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_festival")
                            .from(Review::Table, Review::FestivalId)
                            .to(Festival::Table, Festival::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, festival_id) - one review per user per
        // festival
        manager
            .create_index(
                Index::create()
                    .name("idx_review_user_festival")
                    .table(Review::Table)
                    .col(Review::UserId)
                    .col(Review::FestivalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: festival_id (for listing and rating aggregation)
        manager
            .create_index(
                Index::create()
                    .name("idx_review_festival_id")
                    .table(Review::Table)
                    .col(Review::FestivalId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Review::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Review {
    Table,
    Id,
    UserId,
    FestivalId,
    Rating,
    Content,
    ReviewDate,
    LastModified,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Festival {
    Table,
    Id,
}

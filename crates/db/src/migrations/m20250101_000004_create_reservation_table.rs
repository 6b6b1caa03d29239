//! Create reservation table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservation::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Reservation::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservation::FestivalId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservation::ProductId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reservation::DiscountRate).double())
                    .col(
                        ColumnDef::new(Reservation::ReservationDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Reservation::Date).date().not_null())
                    .col(ColumnDef::new(Reservation::Time).time().not_null())
                    .col(ColumnDef::new(Reservation::HeadCount).integer().not_null())
                    .col(ColumnDef::new(Reservation::Status).string_len(16).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_user")
                            .from(Reservation::Table, Reservation::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_festival")
                            .from(Reservation::Table, Reservation::FestivalId)
                            .to(Festival::Table, Festival::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_product")
                            .from(Reservation::Table, Reservation::ProductId)
                            .to(Product::Table, Product::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for listing a user's reservations)
        manager
            .create_index(
                Index::create()
                    .name("idx_reservation_user_id")
                    .table(Reservation::Table)
                    .col(Reservation::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: festival_id (for cascade deletion)
        manager
            .create_index(
                Index::create()
                    .name("idx_reservation_festival_id")
                    .table(Reservation::Table)
                    .col(Reservation::FestivalId)
                    .to_owned(),
            )
            .await?;

        // Index: product_id (for the eligibility join)
        manager
            .create_index(
                Index::create()
                    .name("idx_reservation_product_id")
                    .table(Reservation::Table)
                    .col(Reservation::ProductId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservation::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Reservation {
    Table,
    Id,
    UserId,
    FestivalId,
    ProductId,
    DiscountRate,
    ReservationDate,
    Date,
    Time,
    HeadCount,
    Status,
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

#[derive(Iden)]
enum Product {
    Table,
    Id,
}

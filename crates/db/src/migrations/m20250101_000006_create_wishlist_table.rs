//! Create wishlist table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Wishlist::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Wishlist::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Wishlist::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Wishlist::FestivalId)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wishlist_user")
                            .from(Wishlist::Table, Wishlist::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wishlist_festival")
                            .from(Wishlist::Table, Wishlist::FestivalId)
                            .to(Festival::Table, Festival::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, festival_id) - the toggle lookup. Not unique; the
        // at-most-one invariant is maintained by the toggle itself.
        manager
            .create_index(
                Index::create()
                    .name("idx_wishlist_user_festival")
                    .table(Wishlist::Table)
                    .col(Wishlist::UserId)
                    .col(Wishlist::FestivalId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Wishlist::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Wishlist {
    Table,
    Id,
    UserId,
    FestivalId,
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

//! Wishlist entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Wishlist - a user's saved-for-later marker on a festival.
///
/// At most one row per (user, festival) pair, maintained by the toggle
/// semantics rather than a uniqueness constraint.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wishlist")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(indexed)]
    pub user_id: i64,

    #[sea_orm(indexed)]
    pub festival_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::festival::Entity",
        from = "Column::FestivalId",
        to = "super::festival::Column::Id"
    )]
    Festival,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::festival::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Festival.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

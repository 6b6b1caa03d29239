//! Review entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Review - a user's rating and comment on a festival.
///
/// At most one review per (user, festival) pair, enforced by a unique index
/// and an explicit existence check before insert.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "review")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(indexed)]
    pub user_id: i64,

    #[sea_orm(indexed)]
    pub festival_id: i64,

    /// Rating on the client's numeric scale. Range is not validated.
    pub rating: f64,

    #[sea_orm(column_type = "String(StringLen::N(500))")]
    pub content: String,

    /// When the review was written. Immutable after creation.
    pub review_date: DateTimeWithTimeZone,

    /// Refreshed on every edit.
    pub last_modified: DateTimeWithTimeZone,
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

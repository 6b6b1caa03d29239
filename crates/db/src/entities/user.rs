//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Display name.
    pub name: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Stored credential, compared by equality (see the verifier seam in
    /// `festa-core`).
    pub password: String,

    /// Interest category. Stored in the delimited multi-value format even
    /// though it holds a single logical token.
    #[sea_orm(nullable)]
    pub interest: Option<String>,

    /// Admin flag, 0 or 1.
    #[sea_orm(default_value = 0)]
    pub admin: i32,

    /// When the account was created.
    pub join_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::reservation::Entity")]
    Reservation,
    #[sea_orm(has_many = "super::review::Entity")]
    Review,
    #[sea_orm(has_many = "super::wishlist::Entity")]
    Wishlist,
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservation.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Review.def()
    }
}

impl Related<super::wishlist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wishlist.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Join interest tokens into the delimited storage form.
///
/// An empty list maps to `None`, matching rows written before the field
/// existed.
#[must_use]
pub fn join_interests(interests: &[String]) -> Option<String> {
    if interests.is_empty() {
        None
    } else {
        Some(interests.join(","))
    }
}

/// Split the delimited storage form back into tokens.
#[must_use]
pub fn split_interests(interest: Option<&str>) -> Vec<String> {
    match interest {
        None | Some("") => Vec::new(),
        Some(raw) => raw.split(',').map(str::to_string).collect(),
    }
}

impl Model {
    /// Interest tokens as a list.
    #[must_use]
    pub fn interest_list(&self) -> Vec<String> {
        split_interests(self.interest.as_deref())
    }
}

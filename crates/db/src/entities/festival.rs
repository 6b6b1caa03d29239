//! Festival entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Festival - a dated event with location, categories, and sellable products.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "festival")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub location: String,

    /// Delimited category list, e.g. `"공연,전시,예술"`.
    #[sea_orm(nullable)]
    pub categories: Option<String>,

    /// Latitude.
    #[sea_orm(nullable)]
    pub lat: Option<f64>,

    /// Longitude.
    #[sea_orm(nullable)]
    pub lng: Option<f64>,

    #[sea_orm(nullable)]
    pub image_url: Option<String>,

    pub region: String,

    /// First day of the festival. Not checked against `end_date`.
    pub start_date: Date,

    /// Last day of the festival.
    pub end_date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product::Entity")]
    Product,
    #[sea_orm(has_many = "super::reservation::Entity")]
    Reservation,
    #[sea_orm(has_many = "super::review::Entity")]
    Review,
    #[sea_orm(has_many = "super::wishlist::Entity")]
    Wishlist,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
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

/// Parse the delimited storage form into an ordered category list.
///
/// `None`, blank, and the literal `"[]"` all normalize to an empty list.
/// Stray brackets from legacy rows are stripped before splitting.
#[must_use]
pub fn parse_categories(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if raw.trim().is_empty() || raw == "[]" {
        return Vec::new();
    }
    raw.replace(['[', ']'], "")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join a category list into the delimited storage form.
///
/// An empty list maps to `None`.
#[must_use]
pub fn join_categories(categories: &[String]) -> Option<String> {
    if categories.is_empty() {
        None
    } else {
        Some(categories.join(","))
    }
}

impl Model {
    /// Categories as an ordered list.
    #[must_use]
    pub fn category_list(&self) -> Vec<String> {
        parse_categories(self.categories.as_deref())
    }
}

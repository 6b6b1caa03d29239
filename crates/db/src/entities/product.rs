//! Product entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of offering a product represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    #[sea_orm(string_value = "food")]
    Food,
    #[sea_orm(string_value = "goods")]
    Goods,
    #[sea_orm(string_value = "activity")]
    Activity,
}

/// Product - a reservable offering scoped to one festival.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Owning festival. A product cannot outlive its festival.
    #[sea_orm(indexed)]
    pub festival_id: i64,

    pub name: String,

    /// Sale price in won.
    pub price: i32,

    /// Pre-discount price, when the product is on sale.
    #[sea_orm(nullable)]
    pub original_price: Option<i32>,

    pub stock: i32,

    pub product_type: ProductType,

    #[sea_orm(nullable)]
    pub image_url: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::festival::Entity",
        from = "Column::FestivalId",
        to = "super::festival::Column::Id"
    )]
    Festival,
    #[sea_orm(has_many = "super::reservation::Entity")]
    Reservation,
}

impl Related<super::festival::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Festival.def()
    }
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Product repository.

use std::sync::Arc;

use crate::entities::{Festival, Product, festival, product};
use festa_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Product repository for database operations.
#[derive(Clone)]
pub struct ProductRepository {
    db: Arc<DatabaseConnection>,
}

impl ProductRepository {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a product by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<product::Model>> {
        Product::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a product together with its festival.
    pub async fn find_by_id_with_festival(
        &self,
        id: i64,
    ) -> AppResult<Option<(product::Model, Option<festival::Model>)>> {
        Product::find_by_id(id)
            .find_also_related(Festival)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all products with their festivals, in id order.
    pub async fn find_all_with_festival(
        &self,
    ) -> AppResult<Vec<(product::Model, Option<festival::Model>)>> {
        Product::find()
            .find_also_related(Festival)
            .order_by_asc(product::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the products of one festival.
    pub async fn find_by_festival(&self, festival_id: i64) -> AppResult<Vec<product::Model>> {
        Product::find()
            .filter(product::Column::FestivalId.eq(festival_id))
            .order_by_asc(product::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new product.
    pub async fn create(&self, model: product::ActiveModel) -> AppResult<product::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an existing product.
    pub async fn update(&self, model: product::ActiveModel) -> AppResult<product::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a product by ID. Deleting an absent id is a no-op.
    pub async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        Product::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

//! Wishlist repository.

use std::sync::Arc;

use crate::entities::{Festival, Wishlist, festival, wishlist};
use festa_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, ModelTrait,
    QueryFilter, QueryOrder,
};

/// Wishlist repository for database operations.
#[derive(Clone)]
pub struct WishlistRepository {
    db: Arc<DatabaseConnection>,
}

impl WishlistRepository {
    /// Create a new wishlist repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the wishlist entry for a (user, festival) pair.
    pub async fn find_by_user_and_festival(
        &self,
        user_id: i64,
        festival_id: i64,
    ) -> AppResult<Option<wishlist::Model>> {
        Wishlist::find()
            .filter(wishlist::Column::UserId.eq(user_id))
            .filter(wishlist::Column::FestivalId.eq(festival_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a user's wishlist entries in id order.
    pub async fn find_by_user(&self, user_id: i64) -> AppResult<Vec<wishlist::Model>> {
        Wishlist::find()
            .filter(wishlist::Column::UserId.eq(user_id))
            .order_by_asc(wishlist::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new wishlist entry.
    pub async fn create(&self, model: wishlist::ActiveModel) -> AppResult<wishlist::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an existing wishlist entry.
    pub async fn delete(&self, model: wishlist::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete the entry for a (user, festival) pair if one exists.
    pub async fn delete_by_user_and_festival(
        &self,
        user_id: i64,
        festival_id: i64,
    ) -> AppResult<()> {
        Wishlist::delete_many()
            .filter(wishlist::Column::UserId.eq(user_id))
            .filter(wishlist::Column::FestivalId.eq(festival_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Batch-load the festival each wishlist entry points at.
    pub async fn with_festivals(
        &self,
        entries: Vec<wishlist::Model>,
    ) -> AppResult<Vec<(wishlist::Model, Option<festival::Model>)>> {
        let festivals = entries
            .load_one(Festival, self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(entries.into_iter().zip(festivals).collect())
    }
}

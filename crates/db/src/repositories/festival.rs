//! Festival repository.

use std::sync::Arc;

use crate::entities::{
    Festival, Product, Reservation, Review, Wishlist, festival, product, reservation, review,
    wishlist,
};
use festa_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

/// Festival repository for database operations.
#[derive(Clone)]
pub struct FestivalRepository {
    db: Arc<DatabaseConnection>,
}

impl FestivalRepository {
    /// Create a new festival repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a festival by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<festival::Model>> {
        Festival::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether a festival exists.
    pub async fn exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// Get all festivals in store (id) order.
    pub async fn find_all(&self) -> AppResult<Vec<festival::Model>> {
        Festival::find()
            .order_by_asc(festival::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get festivals that have not yet ended, soonest first.
    pub async fn find_ending_on_or_after(
        &self,
        date: chrono::NaiveDate,
    ) -> AppResult<Vec<festival::Model>> {
        Festival::find()
            .filter(festival::Column::EndDate.gte(date))
            .order_by_asc(festival::Column::StartDate)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new festival.
    pub async fn create(&self, model: festival::ActiveModel) -> AppResult<festival::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an existing festival.
    pub async fn update(&self, model: festival::ActiveModel) -> AppResult<festival::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a festival together with everything that references it.
    ///
    /// Dependents go first, in FK-safe order: reservations reference
    /// products, so they must be removed before the products; reviews and
    /// wishlist entries reference the festival directly. The whole sequence
    /// runs in one transaction so a failure cannot leave the festival with
    /// half its dependents gone.
    pub async fn delete_with_dependents(&self, festival_id: i64) -> AppResult<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let reservations = Reservation::delete_many()
            .filter(reservation::Column::FestivalId.eq(festival_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let reviews = Review::delete_many()
            .filter(review::Column::FestivalId.eq(festival_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let wishlists = Wishlist::delete_many()
            .filter(wishlist::Column::FestivalId.eq(festival_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let products = Product::delete_many()
            .filter(product::Column::FestivalId.eq(festival_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Festival::delete_by_id(festival_id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(
            festival_id,
            reservations = reservations.rows_affected,
            reviews = reviews.rows_affected,
            wishlists = wishlists.rows_affected,
            products = products.rows_affected,
            "Deleted festival with dependents"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_festival(id: i64, name: &str) -> festival::Model {
        festival::Model {
            id,
            name: name.to_string(),
            description: "desc".to_string(),
            location: "Seoul".to_string(),
            categories: Some("공연,전시".to_string()),
            lat: None,
            lng: None,
            image_url: None,
            region: "서울".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 5, 3).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_exists() {
        let festival = create_test_festival(1, "봄꽃축제");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[festival]])
                .append_query_results([Vec::<festival::Model>::new()])
                .into_connection(),
        );

        let repo = FestivalRepository::new(db);
        assert!(repo.exists(1).await.unwrap());
        assert!(!repo.exists(2).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_ending_on_or_after() {
        let festival = create_test_festival(1, "봄꽃축제");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[festival]])
                .into_connection(),
        );

        let repo = FestivalRepository::new(db);
        let result = repo
            .find_ending_on_or_after(NaiveDate::from_ymd_opt(2025, 4, 30).unwrap())
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_with_dependents_runs_all_steps() {
        let exec = |rows| MockExecResult {
            last_insert_id: 0,
            rows_affected: rows,
        };

        // Five deletes: reservations, reviews, wishlists, products, festival.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(2), exec(1), exec(1), exec(3), exec(1)])
                .into_connection(),
        );

        let repo = FestivalRepository::new(db);
        repo.delete_with_dependents(1).await.unwrap();
    }
}

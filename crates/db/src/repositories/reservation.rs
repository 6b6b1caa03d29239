//! Reservation repository.

use std::sync::Arc;

use crate::entities::{
    Festival, Product, Reservation, festival, product, reservation, reservation::Status,
};
use festa_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, LoaderTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

/// A reservation with the product and festival it points at.
pub type ReservationWithRelated = (
    reservation::Model,
    Option<product::Model>,
    Option<festival::Model>,
);

/// Reservation repository for database operations.
#[derive(Clone)]
pub struct ReservationRepository {
    db: Arc<DatabaseConnection>,
}

impl ReservationRepository {
    /// Create a new reservation repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a reservation by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<reservation::Model>> {
        Reservation::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether a reservation exists.
    pub async fn exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// Find a reservation by ID scoped to its owner.
    ///
    /// Existence and ownership are one lookup so a caller cannot probe for
    /// other users' reservation ids.
    pub async fn find_by_id_and_user(
        &self,
        id: i64,
        user_id: i64,
    ) -> AppResult<Option<reservation::Model>> {
        Reservation::find()
            .filter(reservation::Column::Id.eq(id))
            .filter(reservation::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a user's reservations in id order.
    pub async fn find_by_user(&self, user_id: i64) -> AppResult<Vec<reservation::Model>> {
        Reservation::find()
            .filter(reservation::Column::UserId.eq(user_id))
            .order_by_asc(reservation::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all reservations in id order.
    pub async fn find_all(&self) -> AppResult<Vec<reservation::Model>> {
        Reservation::find()
            .order_by_asc(reservation::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a user's reservations for products of one festival, regardless of
    /// status. Joins through the product rather than the reservation's own
    /// festival reference.
    pub async fn find_by_user_and_product_festival(
        &self,
        user_id: i64,
        festival_id: i64,
    ) -> AppResult<Vec<reservation::Model>> {
        Reservation::find()
            .filter(reservation::Column::UserId.eq(user_id))
            .join(JoinType::InnerJoin, reservation::Relation::Product.def())
            .filter(product::Column::FestivalId.eq(festival_id))
            .order_by_asc(reservation::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count a user's reservations that are not in the given status.
    pub async fn count_by_user_excluding(
        &self,
        user_id: i64,
        status: Status,
    ) -> AppResult<u64> {
        Reservation::find()
            .filter(reservation::Column::UserId.eq(user_id))
            .filter(reservation::Column::Status.ne(status))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new reservation.
    pub async fn create(&self, model: reservation::ActiveModel) -> AppResult<reservation::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an existing reservation.
    pub async fn update(&self, model: reservation::ActiveModel) -> AppResult<reservation::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a reservation by ID.
    pub async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        Reservation::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Batch-load the product and festival each reservation points at.
    pub async fn with_related(
        &self,
        reservations: Vec<reservation::Model>,
    ) -> AppResult<Vec<ReservationWithRelated>> {
        let products = reservations
            .load_one(Product, self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let festivals = reservations
            .load_one(Festival, self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(reservations
            .into_iter()
            .zip(products)
            .zip(festivals)
            .map(|((r, p), f)| (r, p, f))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_reservation(id: i64, user_id: i64, status: Status) -> reservation::Model {
        reservation::Model {
            id,
            user_id,
            festival_id: 1,
            product_id: 1,
            discount_rate: None,
            reservation_date: Utc::now().into(),
            date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            time: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            head_count: 2,
            status,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_and_user() {
        let reservation = create_test_reservation(1, 10, Status::Reserved);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[reservation]])
                .append_query_results([Vec::<reservation::Model>::new()])
                .into_connection(),
        );

        let repo = ReservationRepository::new(db);
        assert!(repo.find_by_id_and_user(1, 10).await.unwrap().is_some());
        assert!(repo.find_by_id_and_user(1, 11).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_user_and_product_festival() {
        let r1 = create_test_reservation(1, 10, Status::Reserved);
        let r2 = create_test_reservation(2, 10, Status::Cancelled);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r1, r2]])
                .into_connection(),
        );

        let repo = ReservationRepository::new(db);
        let result = repo.find_by_user_and_product_festival(10, 1).await.unwrap();

        // Cancelled reservations are returned too; eligibility intentionally
        // ignores status.
        assert_eq!(result.len(), 2);
    }
}

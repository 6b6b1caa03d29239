//! Review repository.
//!
//! Also home to the rating aggregates: the per-festival average and the
//! ranked festival listing, both computed in the database.

use std::sync::Arc;

use crate::entities::{Festival, Review, User, festival, review, user};
use festa_common::{AppError, AppResult};
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    LoaderTrait, Order, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use serde::Serialize;

/// One row of the ranked festival listing: festival columns plus the
/// aggregated rating. Festivals without reviews report an average of 0 and a
/// count of 0, unlike [`ReviewRepository::average_rating`] which reports
/// `None` - callers of the listing must use this average as-is.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
pub struct FestivalRating {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub location: String,
    pub categories: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub image_url: Option<String>,
    pub region: String,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub avg_rating: f64,
    pub review_count: i64,
}

impl FestivalRating {
    /// Categories as an ordered list.
    #[must_use]
    pub fn category_list(&self) -> Vec<String> {
        festival::parse_categories(self.categories.as_deref())
    }
}

/// A review with the user and festival it points at.
pub type ReviewWithRelated = (
    review::Model,
    Option<user::Model>,
    Option<festival::Model>,
);

/// Review repository for database operations.
#[derive(Clone)]
pub struct ReviewRepository {
    db: Arc<DatabaseConnection>,
}

impl ReviewRepository {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a review by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<review::Model>> {
        Review::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether a review exists.
    pub async fn exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// Find the review a user wrote for a festival, if any.
    pub async fn find_by_user_and_festival(
        &self,
        user_id: i64,
        festival_id: i64,
    ) -> AppResult<Option<review::Model>> {
        Review::find()
            .filter(review::Column::UserId.eq(user_id))
            .filter(review::Column::FestivalId.eq(festival_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a festival's reviews in id order.
    pub async fn find_by_festival(&self, festival_id: i64) -> AppResult<Vec<review::Model>> {
        Review::find()
            .filter(review::Column::FestivalId.eq(festival_id))
            .order_by_asc(review::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a user's reviews in id order.
    pub async fn find_by_user(&self, user_id: i64) -> AppResult<Vec<review::Model>> {
        Review::find()
            .filter(review::Column::UserId.eq(user_id))
            .order_by_asc(review::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all reviews in id order.
    pub async fn find_all(&self) -> AppResult<Vec<review::Model>> {
        Review::find()
            .order_by_asc(review::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Arithmetic mean of a festival's ratings, `None` when it has no
    /// reviews.
    pub async fn average_rating(&self, festival_id: i64) -> AppResult<Option<f64>> {
        #[derive(FromQueryResult)]
        struct AvgResult {
            avg: Option<f64>,
        }

        let result = Review::find()
            .filter(review::Column::FestivalId.eq(festival_id))
            .select_only()
            .column_as(
                SimpleExpr::from(Func::avg(Expr::col((
                    review::Entity,
                    review::Column::Rating,
                )))),
                "avg",
            )
            .into_model::<AvgResult>()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.and_then(|r| r.avg))
    }

    /// All festivals ranked by average rating, best first.
    ///
    /// Left outer join against reviews, grouped by festival, with
    /// `COALESCE(AVG(rating), 0)` so unreviewed festivals rank with an
    /// average of 0 rather than sorting as NULL. Ties carry no defined
    /// order.
    pub async fn ranked_festivals(&self) -> AppResult<Vec<FestivalRating>> {
        let avg_rating =
            Expr::expr(Func::avg(Expr::col((review::Entity, review::Column::Rating))))
                .if_null(0.0);

        Festival::find()
            .select_only()
            .columns([
                festival::Column::Id,
                festival::Column::Name,
                festival::Column::Description,
                festival::Column::Location,
                festival::Column::Categories,
                festival::Column::Lat,
                festival::Column::Lng,
                festival::Column::ImageUrl,
                festival::Column::Region,
                festival::Column::StartDate,
                festival::Column::EndDate,
            ])
            .column_as(avg_rating.clone(), "avg_rating")
            .column_as(
                SimpleExpr::from(Func::count(Expr::col((review::Entity, review::Column::Id)))),
                "review_count",
            )
            .join(JoinType::LeftJoin, festival::Relation::Review.def())
            .group_by(festival::Column::Id)
            .order_by(avg_rating, Order::Desc)
            .into_model::<FestivalRating>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new review.
    pub async fn create(&self, model: review::ActiveModel) -> AppResult<review::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an existing review.
    pub async fn update(&self, model: review::ActiveModel) -> AppResult<review::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a review by ID.
    pub async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        Review::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Batch-load the user and festival each review points at.
    pub async fn with_related(
        &self,
        reviews: Vec<review::Model>,
    ) -> AppResult<Vec<ReviewWithRelated>> {
        let users = reviews
            .load_one(User, self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let festivals = reviews
            .load_one(Festival, self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(reviews
            .into_iter()
            .zip(users)
            .zip(festivals)
            .map(|((r, u), f)| (r, u, f))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    fn create_test_review(id: i64, user_id: i64, festival_id: i64, rating: f64) -> review::Model {
        review::Model {
            id,
            user_id,
            festival_id,
            rating,
            content: "재밌었어요".to_string(),
            review_date: Utc::now().into(),
            last_modified: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_user_and_festival() {
        let review = create_test_review(1, 10, 7, 4.5);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[review]])
                .append_query_results([Vec::<review::Model>::new()])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        assert!(repo.find_by_user_and_festival(10, 7).await.unwrap().is_some());
        assert!(repo.find_by_user_and_festival(10, 8).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_average_rating_none_without_reviews() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![btreemap! {
                    "avg" => Value::Double(None),
                }]])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let result = repo.average_rating(7).await.unwrap();

        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_average_rating_some() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![btreemap! {
                    "avg" => Value::Double(Some(4.25)),
                }]])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let result = repo.average_rating(7).await.unwrap();

        assert_eq!(result, Some(4.25));
    }

    #[tokio::test]
    async fn test_ranked_festivals_substitutes_zero() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let row = |id: i64, avg: f64, count: i64| {
            btreemap! {
                "id" => Value::from(id),
                "name" => Value::from(format!("festival-{id}")),
                "description" => Value::from("desc"),
                "location" => Value::from("Seoul"),
                "categories" => Value::String(None),
                "lat" => Value::Double(None),
                "lng" => Value::Double(None),
                "image_url" => Value::String(None),
                "region" => Value::from("서울"),
                "start_date" => Value::from(date),
                "end_date" => Value::from(date),
                "avg_rating" => Value::from(avg),
                "review_count" => Value::from(count),
            }
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![row(1, 4.5, 3), row(2, 0.0, 0)]])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let result = repo.ranked_festivals().await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].avg_rating, 4.5);
        // A festival with no reviews ranks with 0, not NULL.
        assert_eq!(result[1].avg_rating, 0.0);
        assert_eq!(result[1].review_count, 0);
    }
}

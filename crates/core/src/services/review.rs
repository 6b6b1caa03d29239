//! Review service.
//!
//! Writing a review is gated on proof of a prior reservation for one of the
//! festival's products, and each user gets at most one review per festival.

use chrono::Utc;
use festa_common::{AppError, AppResult};
use festa_db::{
    entities::{festival, review, user},
    repositories::{ReservationRepository, ReviewRepository},
};
use sea_orm::Set;

/// A review with the user and festival it points at.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDetail {
    pub review: review::Model,
    pub user: Option<user::Model>,
    pub festival: Option<festival::Model>,
}

/// Review service.
#[derive(Clone)]
pub struct ReviewService {
    review_repo: ReviewRepository,
    reservation_repo: ReservationRepository,
}

impl ReviewService {
    /// Create a new review service.
    #[must_use]
    pub const fn new(review_repo: ReviewRepository, reservation_repo: ReservationRepository) -> Self {
        Self {
            review_repo,
            reservation_repo,
        }
    }

    /// Whether a user has ever reserved a product of this festival.
    ///
    /// Cancelled reservations count: having held a reservation at all is
    /// what makes a user eligible to review.
    pub async fn has_reserved(&self, user_id: i64, festival_id: i64) -> AppResult<bool> {
        let reservations = self
            .reservation_repo
            .find_by_user_and_product_festival(user_id, festival_id)
            .await?;
        Ok(!reservations.is_empty())
    }

    /// Write a review for a festival.
    ///
    /// The first matching reservation supplies the canonical user and
    /// festival references for the new row. The reservation is looked up
    /// again after the eligibility check rather than folding the two
    /// queries together; the second lookup failing is still Forbidden.
    pub async fn create(
        &self,
        user_id: i64,
        festival_id: i64,
        rating: f64,
        content: String,
    ) -> AppResult<ReviewDetail> {
        if !self.has_reserved(user_id, festival_id).await? {
            return Err(AppError::Forbidden(
                "Only users who reserved a product of this festival can review it".to_string(),
            ));
        }

        if self
            .review_repo
            .find_by_user_and_festival(user_id, festival_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "A review for this festival already exists".to_string(),
            ));
        }

        let reservation = self
            .reservation_repo
            .find_by_user_and_product_festival(user_id, festival_id)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Forbidden("Reservation could not be located".to_string()))?;

        let now = Utc::now();
        let model = review::ActiveModel {
            user_id: Set(reservation.user_id),
            festival_id: Set(reservation.festival_id),
            rating: Set(rating),
            content: Set(content),
            review_date: Set(now.into()),
            last_modified: Set(now.into()),
            ..Default::default()
        };

        let saved = self.review_repo.create(model).await?;
        self.detail(saved).await
    }

    /// Edit a review. Only the author may edit; `review_date` is immutable
    /// and only `last_modified` is refreshed.
    pub async fn update(
        &self,
        review_id: i64,
        user_id: i64,
        rating: f64,
        content: String,
    ) -> AppResult<ReviewDetail> {
        let existing = self
            .review_repo
            .find_by_id(review_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Review not found".to_string()))?;

        if existing.user_id != user_id {
            return Err(AppError::Forbidden(
                "Only the author can edit a review".to_string(),
            ));
        }

        let mut active: review::ActiveModel = existing.into();
        active.rating = Set(rating);
        active.content = Set(content);
        active.last_modified = Set(Utc::now().into());

        let saved = self.review_repo.update(active).await?;
        self.detail(saved).await
    }

    /// Delete a review on behalf of its author.
    pub async fn delete(&self, review_id: i64, user_id: i64) -> AppResult<()> {
        let existing = self
            .review_repo
            .find_by_id(review_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Review not found".to_string()))?;

        if existing.user_id != user_id {
            return Err(AppError::Forbidden(
                "Only the author can delete a review".to_string(),
            ));
        }

        self.review_repo.delete_by_id(review_id).await
    }

    /// Delete a review without an ownership check (administrative).
    pub async fn delete_admin(&self, review_id: i64) -> AppResult<()> {
        if !self.review_repo.exists(review_id).await? {
            return Err(AppError::NotFound("Review not found".to_string()));
        }
        self.review_repo.delete_by_id(review_id).await
    }

    /// Get a festival's reviews.
    pub async fn list_by_festival(&self, festival_id: i64) -> AppResult<Vec<ReviewDetail>> {
        let reviews = self.review_repo.find_by_festival(festival_id).await?;
        self.details(reviews).await
    }

    /// Get a user's reviews.
    pub async fn list_by_user(&self, user_id: i64) -> AppResult<Vec<ReviewDetail>> {
        let reviews = self.review_repo.find_by_user(user_id).await?;
        self.details(reviews).await
    }

    /// Get all reviews.
    pub async fn list_all(&self) -> AppResult<Vec<ReviewDetail>> {
        let reviews = self.review_repo.find_all().await?;
        self.details(reviews).await
    }

    async fn detail(&self, review: review::Model) -> AppResult<ReviewDetail> {
        let mut details = self.details(vec![review]).await?;
        details
            .pop()
            .ok_or_else(|| AppError::Internal("Review detail lookup came back empty".to_string()))
    }

    async fn details(&self, reviews: Vec<review::Model>) -> AppResult<Vec<ReviewDetail>> {
        let related = self.review_repo.with_related(reviews).await?;
        Ok(related
            .into_iter()
            .map(|(review, user, festival)| ReviewDetail {
                review,
                user,
                festival,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use festa_db::entities::{reservation, reservation::Status};
    use festa_db::repositories::ReservationRepository;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_reservation(id: i64, user_id: i64, status: Status) -> reservation::Model {
        reservation::Model {
            id,
            user_id,
            festival_id: 7,
            product_id: 3,
            discount_rate: None,
            reservation_date: Utc::now().into(),
            date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            time: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            head_count: 2,
            status,
        }
    }

    fn create_test_review(id: i64, user_id: i64, festival_id: i64) -> review::Model {
        review::Model {
            id,
            user_id,
            festival_id,
            rating: 4.5,
            content: "재밌었어요".to_string(),
            review_date: Utc::now().into(),
            last_modified: Utc::now().into(),
        }
    }

    fn create_test_user(id: i64) -> user::Model {
        user::Model {
            id,
            name: "tester".to_string(),
            email: format!("u{id}@example.com"),
            password: "pw".to_string(),
            interest: None,
            admin: 0,
            join_date: Utc::now().into(),
        }
    }

    fn create_test_festival(id: i64) -> festival::Model {
        festival::Model {
            id,
            name: format!("festival-{id}"),
            description: "desc".to_string(),
            location: "Seoul".to_string(),
            categories: None,
            lat: None,
            lng: None,
            image_url: None,
            region: "서울".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 5, 3).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_without_reservation_is_forbidden() {
        let review_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let reservation_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<reservation::Model>::new()])
                .into_connection(),
        );

        let service = ReviewService::new(
            ReviewRepository::new(review_db),
            ReservationRepository::new(reservation_db),
        );

        let result = service.create(10, 7, 4.5, "great".to_string()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_duplicate_review_conflicts() {
        let review_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_review(5, 10, 7)]])
                .into_connection(),
        );
        let reservation_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_reservation(1, 10, Status::Reserved)]])
                .into_connection(),
        );

        let service = ReviewService::new(
            ReviewRepository::new(review_db),
            ReservationRepository::new(reservation_db),
        );

        let result = service.create(10, 7, 4.5, "again".to_string()).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_sources_refs_from_reservation() {
        let reservation = create_test_reservation(1, 10, Status::Reserved);
        let saved = create_test_review(5, 10, 7);

        // Review connection: duplicate check (empty), insert, then the two
        // related-entity loads.
        let review_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<review::Model>::new(), vec![saved.clone()]])
                .append_query_results([[create_test_user(10)]])
                .append_query_results([[create_test_festival(7)]])
                .into_connection(),
        );
        // Reservation connection: eligibility check and the re-lookup.
        let reservation_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    vec![reservation.clone()],
                    vec![reservation.clone()],
                ])
                .into_connection(),
        );

        let service = ReviewService::new(
            ReviewRepository::new(review_db),
            ReservationRepository::new(reservation_db),
        );

        let result = service.create(10, 7, 4.5, "great".to_string()).await.unwrap();

        assert_eq!(result.review.user_id, 10);
        assert_eq!(result.review.festival_id, 7);
        assert_eq!(result.user.unwrap().id, 10);
        assert_eq!(result.festival.unwrap().id, 7);
    }

    #[tokio::test]
    async fn test_cancelled_reservation_still_counts() {
        let reservation_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_reservation(1, 10, Status::Cancelled)]])
                .into_connection(),
        );
        let review_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = ReviewService::new(
            ReviewRepository::new(review_db),
            ReservationRepository::new(reservation_db),
        );

        assert!(service.has_reserved(10, 7).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_by_non_author_is_forbidden() {
        let review_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_review(5, 10, 7)]])
                .into_connection(),
        );
        let reservation_db =
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = ReviewService::new(
            ReviewRepository::new(review_db),
            ReservationRepository::new(reservation_db),
        );

        let result = service.update(5, 11, 1.0, "hijack".to_string()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_unknown_review_not_found() {
        let review_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<review::Model>::new()])
                .into_connection(),
        );
        let reservation_db =
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = ReviewService::new(
            ReviewRepository::new(review_db),
            ReservationRepository::new(reservation_db),
        );

        let result = service.delete_admin(99).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}

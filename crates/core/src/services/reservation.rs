//! Reservation lifecycle service.
//!
//! Reservations are created `RESERVED`, can be marked `ATTENDED` by staff
//! with no precondition, and can be cancelled by their owner. Cancelling
//! twice is a no-op.

use chrono::{NaiveDate, NaiveTime, Utc};
use festa_common::{AppError, AppResult};
use festa_db::{
    entities::{festival, product, reservation, reservation::Status},
    repositories::{
        FestivalRepository, ProductRepository, ReservationRepository, UserRepository,
    },
};
use sea_orm::Set;

/// A reservation with the product and festival it points at.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationDetail {
    pub reservation: reservation::Model,
    pub product: Option<product::Model>,
    pub festival: Option<festival::Model>,
}

/// Input for creating a reservation. Date and time arrive as the raw
/// request strings and are parsed here.
#[derive(Debug, Clone)]
pub struct CreateReservationInput {
    pub user_id: i64,
    pub festival_id: i64,
    pub product_id: i64,
    pub discount_rate: Option<f64>,
    pub date: String,
    pub time: String,
    pub head_count: i32,
}

/// Reservation service.
#[derive(Clone)]
pub struct ReservationService {
    reservation_repo: ReservationRepository,
    user_repo: UserRepository,
    festival_repo: FestivalRepository,
    product_repo: ProductRepository,
}

impl ReservationService {
    /// Create a new reservation service.
    #[must_use]
    pub const fn new(
        reservation_repo: ReservationRepository,
        user_repo: UserRepository,
        festival_repo: FestivalRepository,
        product_repo: ProductRepository,
    ) -> Self {
        Self {
            reservation_repo,
            user_repo,
            festival_repo,
            product_repo,
        }
    }

    /// Create a reservation in status `RESERVED`.
    pub async fn create(&self, input: CreateReservationInput) -> AppResult<ReservationDetail> {
        self.user_repo
            .find_by_id(input.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let festival = self
            .festival_repo
            .find_by_id(input.festival_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Festival not found".to_string()))?;

        let product = self
            .product_repo
            .find_by_id(input.product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        let date = parse_date(&input.date)?;
        let time = parse_time(&input.time)?;

        let model = reservation::ActiveModel {
            user_id: Set(input.user_id),
            festival_id: Set(input.festival_id),
            product_id: Set(input.product_id),
            discount_rate: Set(input.discount_rate),
            reservation_date: Set(Utc::now().into()),
            date: Set(date),
            time: Set(time),
            head_count: Set(input.head_count),
            status: Set(Status::Reserved),
            ..Default::default()
        };

        let saved = self.reservation_repo.create(model).await?;

        Ok(ReservationDetail {
            reservation: saved,
            product: Some(product),
            festival: Some(festival),
        })
    }

    /// Get a user's reservations.
    pub async fn list_by_user(&self, user_id: i64) -> AppResult<Vec<ReservationDetail>> {
        let reservations = self.reservation_repo.find_by_user(user_id).await?;
        let related = self.reservation_repo.with_related(reservations).await?;

        Ok(related
            .into_iter()
            .map(|(reservation, product, festival)| ReservationDetail {
                reservation,
                product,
                festival,
            })
            .collect())
    }

    /// Count a user's reservations, excluding cancelled ones. Attended
    /// reservations still count.
    pub async fn count_active(&self, user_id: i64) -> AppResult<u64> {
        self.reservation_repo
            .count_by_user_excluding(user_id, Status::Cancelled)
            .await
    }

    /// Mark a reservation attended. No prior-state check: marking an
    /// already-attended or cancelled reservation succeeds.
    pub async fn mark_attended(&self, reservation_id: i64) -> AppResult<ReservationDetail> {
        let reservation = self
            .reservation_repo
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))?;

        let mut active: reservation::ActiveModel = reservation.into();
        active.status = Set(Status::Attended);
        let saved = self.reservation_repo.update(active).await?;

        self.detail(saved).await
    }

    /// Cancel a reservation on behalf of its owner.
    ///
    /// Existence and ownership are checked in one lookup; a caller cannot
    /// learn whether an id belongs to someone else. Cancelling an
    /// already-cancelled reservation returns the record unchanged.
    pub async fn cancel(&self, user_id: i64, reservation_id: i64) -> AppResult<ReservationDetail> {
        let reservation = self
            .reservation_repo
            .find_by_id_and_user(reservation_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))?;

        if reservation.status == Status::Cancelled {
            return self.detail(reservation).await;
        }

        let mut active: reservation::ActiveModel = reservation.into();
        active.status = Set(Status::Cancelled);
        let saved = self.reservation_repo.update(active).await?;

        self.detail(saved).await
    }

    /// Get all reservations (administrative).
    pub async fn list_all(&self) -> AppResult<Vec<ReservationDetail>> {
        let reservations = self.reservation_repo.find_all().await?;
        let related = self.reservation_repo.with_related(reservations).await?;

        Ok(related
            .into_iter()
            .map(|(reservation, product, festival)| ReservationDetail {
                reservation,
                product,
                festival,
            })
            .collect())
    }

    /// Delete a reservation (administrative).
    pub async fn delete(&self, reservation_id: i64) -> AppResult<()> {
        if !self.reservation_repo.exists(reservation_id).await? {
            return Err(AppError::NotFound("Reservation not found".to_string()));
        }
        self.reservation_repo.delete_by_id(reservation_id).await
    }

    async fn detail(&self, reservation: reservation::Model) -> AppResult<ReservationDetail> {
        let product = self.product_repo.find_by_id(reservation.product_id).await?;
        let festival = self
            .festival_repo
            .find_by_id(reservation.festival_id)
            .await?;

        Ok(ReservationDetail {
            reservation,
            product,
            festival,
        })
    }
}

fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    raw.parse::<NaiveDate>()
        .map_err(|_| AppError::Validation(format!("Invalid date: {raw}")))
}

fn parse_time(raw: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| AppError::Validation(format!("Invalid time: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use festa_db::entities::{product::ProductType, user};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

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

    fn create_test_product(id: i64, festival_id: i64) -> product::Model {
        product::Model {
            id,
            festival_id,
            name: "입장권".to_string(),
            price: 15000,
            original_price: None,
            stock: 100,
            product_type: ProductType::Activity,
            image_url: None,
            description: None,
        }
    }

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

    fn service(
        reservation_db: Arc<sea_orm::DatabaseConnection>,
        user_db: Arc<sea_orm::DatabaseConnection>,
        festival_db: Arc<sea_orm::DatabaseConnection>,
        product_db: Arc<sea_orm::DatabaseConnection>,
    ) -> ReservationService {
        ReservationService::new(
            ReservationRepository::new(reservation_db),
            UserRepository::new(user_db),
            FestivalRepository::new(festival_db),
            ProductRepository::new(product_db),
        )
    }

    #[test]
    fn test_parse_date_and_time() {
        assert!(parse_date("2025-05-01").is_ok());
        assert!(parse_date("05/01/2025").is_err());
        assert!(parse_time("14:30").is_ok());
        assert!(parse_time("14:30:15").is_ok());
        assert!(parse_time("2pm").is_err());
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_date() {
        let reservation_db =
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user(10)]])
                .into_connection(),
        );
        let festival_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_festival(1)]])
                .into_connection(),
        );
        let product_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_product(1, 1)]])
                .into_connection(),
        );

        let service = service(reservation_db, user_db, festival_db, product_db);
        let result = service
            .create(CreateReservationInput {
                user_id: 10,
                festival_id: 1,
                product_id: 1,
                discount_rate: None,
                date: "not-a-date".to_string(),
                time: "14:30".to_string(),
                head_count: 2,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_unknown_product() {
        let reservation_db =
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user(10)]])
                .into_connection(),
        );
        let festival_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_festival(1)]])
                .into_connection(),
        );
        let product_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<product::Model>::new()])
                .into_connection(),
        );

        let service = service(reservation_db, user_db, festival_db, product_db);
        let result = service
            .create(CreateReservationInput {
                user_id: 10,
                festival_id: 1,
                product_id: 99,
                discount_rate: None,
                date: "2025-05-01".to_string(),
                time: "14:30".to_string(),
                head_count: 2,
            })
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_cancel_twice_is_idempotent() {
        let cancelled = create_test_reservation(1, 10, Status::Cancelled);

        // Two cancel calls: each does one ownership lookup, no update.
        let reservation_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[cancelled.clone()], [cancelled.clone()]])
                .into_connection(),
        );
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let festival_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_festival(1)], [create_test_festival(1)]])
                .into_connection(),
        );
        let product_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_product(1, 1)], [create_test_product(1, 1)]])
                .into_connection(),
        );

        let service = service(reservation_db, user_db, festival_db, product_db);

        let first = service.cancel(10, 1).await.unwrap();
        let second = service.cancel(10, 1).await.unwrap();

        assert_eq!(first.reservation, second.reservation);
        assert_eq!(first.reservation.status, Status::Cancelled);
    }

    #[tokio::test]
    async fn test_cancel_other_users_reservation_not_found() {
        let reservation_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<reservation::Model>::new()])
                .into_connection(),
        );
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let festival_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let product_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service(reservation_db, user_db, festival_db, product_db);
        let result = service.cancel(11, 1).await;

        // Someone else's reservation is indistinguishable from a missing one.
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_mark_attended_has_no_precondition() {
        let cancelled = create_test_reservation(1, 10, Status::Cancelled);
        let mut attended = cancelled.clone();
        attended.status = Status::Attended;

        let reservation_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[cancelled], [attended]])
                .into_connection(),
        );
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let festival_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_festival(1)]])
                .into_connection(),
        );
        let product_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_product(1, 1)]])
                .into_connection(),
        );

        let service = service(reservation_db, user_db, festival_db, product_db);
        let result = service.mark_attended(1).await.unwrap();

        assert_eq!(result.reservation.status, Status::Attended);
    }
}

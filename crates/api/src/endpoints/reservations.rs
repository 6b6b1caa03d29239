//! Reservation endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete as delete_route, get, post, put},
};
use festa_common::AppResult;
use festa_core::{CreateReservationInput, ReservationDetail};
use festa_db::entities::reservation::Status;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{response::ApiResponse, state::AppState};

/// Reservation create request. Date and time travel as strings and are
/// validated by the service.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    pub user_id: i64,
    pub festival_id: i64,
    pub product_id: i64,
    pub discount_rate: Option<f64>,
    pub date: String,
    pub time: String,
    #[validate(range(min = 1))]
    pub head_count: i32,
}

/// Query parameters for the owner-scoped cancel call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelParams {
    pub user_id: i64,
}

/// Compact product block embedded in a reservation response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub product_id: i64,
    pub name: String,
    pub image_url: Option<String>,
    pub festival_id: i64,
}

/// Reservation response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub reservation_id: i64,
    pub user_id: i64,
    pub festival_id: i64,
    pub product_id: i64,
    pub discount_rate: Option<f64>,
    pub reservation_date: String,
    pub festival_name: Option<String>,
    pub product_name: Option<String>,
    pub date: String,
    pub time: String,
    pub head_count: i32,
    pub status: Status,
    pub product: Option<ProductSummary>,
}

/// Cancel response: the updated reservation plus an acknowledgement.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelResponse {
    pub success: bool,
    pub message: String,
    pub reservation: ReservationResponse,
}

/// Count response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountResponse {
    pub count: u64,
}

impl From<ReservationDetail> for ReservationResponse {
    fn from(detail: ReservationDetail) -> Self {
        let product = detail.product.map(|p| ProductSummary {
            product_id: p.id,
            name: p.name,
            image_url: p.image_url,
            festival_id: p.festival_id,
        });

        Self {
            reservation_id: detail.reservation.id,
            user_id: detail.reservation.user_id,
            festival_id: detail.reservation.festival_id,
            product_id: detail.reservation.product_id,
            discount_rate: detail.reservation.discount_rate,
            reservation_date: detail.reservation.reservation_date.to_rfc3339(),
            festival_name: detail.festival.map(|f| f.name),
            product_name: product.as_ref().map(|p| p.name.clone()),
            date: detail.reservation.date.to_string(),
            time: detail.reservation.time.to_string(),
            head_count: detail.reservation.head_count,
            status: detail.reservation.status,
            product,
        }
    }
}

/// Create a reservation.
async fn create(
    State(state): State<AppState>,
    Json(req): Json<ReservationRequest>,
) -> AppResult<ApiResponse<ReservationResponse>> {
    req.validate()?;

    let detail = state
        .reservation_service
        .create(CreateReservationInput {
            user_id: req.user_id,
            festival_id: req.festival_id,
            product_id: req.product_id,
            discount_rate: req.discount_rate,
            date: req.date,
            time: req.time,
            head_count: req.head_count,
        })
        .await?;

    Ok(ApiResponse::ok(detail.into()))
}

/// List a user's reservations.
async fn by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<ApiResponse<Vec<ReservationResponse>>> {
    let reservations = state.reservation_service.list_by_user(user_id).await?;
    Ok(ApiResponse::ok(
        reservations.into_iter().map(Into::into).collect(),
    ))
}

/// Count a user's non-cancelled reservations.
async fn count_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<ApiResponse<CountResponse>> {
    let count = state.reservation_service.count_active(user_id).await?;
    Ok(ApiResponse::ok(CountResponse { count }))
}

/// Mark a reservation attended.
async fn mark_attended(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<ReservationResponse>> {
    let detail = state.reservation_service.mark_attended(id).await?;
    Ok(ApiResponse::ok(detail.into()))
}

/// Cancel a reservation on behalf of its owner.
async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<CancelParams>,
) -> AppResult<ApiResponse<CancelResponse>> {
    let detail = state.reservation_service.cancel(params.user_id, id).await?;

    Ok(ApiResponse::ok(CancelResponse {
        success: true,
        message: "Reservation cancelled".to_string(),
        reservation: detail.into(),
    }))
}

/// List all reservations (administrative).
async fn list_all(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<ReservationResponse>>> {
    let reservations = state.reservation_service.list_all().await?;
    Ok(ApiResponse::ok(
        reservations.into_iter().map(Into::into).collect(),
    ))
}

/// Delete a reservation (administrative).
async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    state.reservation_service.delete(id).await?;
    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/user/{userId}", get(by_user))
        .route("/count/{userId}", get(count_by_user))
        .route("/{id}/attended", put(mark_attended))
        .route("/{id}/cancel", put(cancel))
        .route("/all", get(list_all))
        .route("/{id}", delete_route(delete))
}

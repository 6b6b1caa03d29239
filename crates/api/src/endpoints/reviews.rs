//! Review endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete as delete_route, get, post, put},
};
use festa_common::AppResult;
use festa_core::ReviewDetail;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{response::ApiResponse, state::AppState};

/// Review create request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub user_id: i64,
    pub festival_id: i64,
    pub rating: f64,
    #[validate(length(max = 500))]
    pub content: String,
}

/// Review edit request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    pub rating: f64,
    #[validate(length(max = 500))]
    pub content: String,
}

/// Query parameters for the eligibility probe.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibleParams {
    pub user_id: i64,
    pub festival_id: i64,
}

/// Review response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub review_id: i64,
    pub rating: f64,
    pub content: String,
    pub review_date: String,
    pub last_modified: String,
    pub user_id: i64,
    pub user_name: Option<String>,
    pub festival_id: i64,
    pub festival_name: Option<String>,
}

impl From<ReviewDetail> for ReviewResponse {
    fn from(detail: ReviewDetail) -> Self {
        Self {
            review_id: detail.review.id,
            rating: detail.review.rating,
            content: detail.review.content,
            review_date: detail.review.review_date.to_rfc3339(),
            last_modified: detail.review.last_modified.to_rfc3339(),
            user_id: detail.review.user_id,
            user_name: detail.user.map(|u| u.name),
            festival_id: detail.review.festival_id,
            festival_name: detail.festival.map(|f| f.name),
        }
    }
}

/// Write a review. Requires a prior reservation for the festival.
async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateReviewRequest>,
) -> AppResult<ApiResponse<ReviewResponse>> {
    req.validate()?;

    let detail = state
        .review_service
        .create(req.user_id, req.festival_id, req.rating, req.content)
        .await?;

    Ok(ApiResponse::ok(detail.into()))
}

/// Edit a review as its author.
async fn update(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(i64, i64)>,
    Json(req): Json<UpdateReviewRequest>,
) -> AppResult<ApiResponse<ReviewResponse>> {
    req.validate()?;

    let detail = state
        .review_service
        .update(id, user_id, req.rating, req.content)
        .await?;

    Ok(ApiResponse::ok(detail.into()))
}

/// Delete a review as its author.
async fn delete(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(i64, i64)>,
) -> AppResult<ApiResponse<()>> {
    state.review_service.delete(id, user_id).await?;
    Ok(ApiResponse::ok(()))
}

/// Delete a review without an ownership check (administrative).
async fn delete_admin(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    state.review_service.delete_admin(id).await?;
    Ok(ApiResponse::ok(()))
}

/// List a festival's reviews.
async fn by_festival(
    State(state): State<AppState>,
    Path(festival_id): Path<i64>,
) -> AppResult<ApiResponse<Vec<ReviewResponse>>> {
    let reviews = state.review_service.list_by_festival(festival_id).await?;
    Ok(ApiResponse::ok(reviews.into_iter().map(Into::into).collect()))
}

/// List a user's reviews.
async fn by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<ApiResponse<Vec<ReviewResponse>>> {
    let reviews = state.review_service.list_by_user(user_id).await?;
    Ok(ApiResponse::ok(reviews.into_iter().map(Into::into).collect()))
}

/// List all reviews.
async fn list_all(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<ReviewResponse>>> {
    let reviews = state.review_service.list_all().await?;
    Ok(ApiResponse::ok(reviews.into_iter().map(Into::into).collect()))
}

/// Whether a user may review a festival.
async fn eligible(
    State(state): State<AppState>,
    Query(params): Query<EligibleParams>,
) -> AppResult<ApiResponse<bool>> {
    let eligible = state
        .review_service
        .has_reserved(params.user_id, params.festival_id)
        .await?;
    Ok(ApiResponse::ok(eligible))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/{id}/{userId}", put(update).delete(delete))
        .route("/{id}", delete_route(delete_admin))
        .route("/festival/{festivalId}", get(by_festival))
        .route("/user/{userId}", get(by_user))
        .route("/all", get(list_all))
        .route("/eligible", get(eligible))
}

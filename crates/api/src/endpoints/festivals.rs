//! Festival endpoints.
//!
//! The bare listing is ordered by average rating (0 for unreviewed
//! festivals); the single-festival view reports no average at all until the
//! first review lands.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::NaiveDate;
use festa_common::AppResult;
use festa_core::{CreateFestivalInput, FestivalWithRating, UpdateFestivalInput};
use festa_db::repositories::FestivalRating;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    endpoints::products::ProductResponse, response::ApiResponse, state::AppState,
};

/// Festival create request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFestivalRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: String,
    pub location: String,
    pub region: String,
    #[serde(default)]
    pub categories: Vec<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub image_url: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Festival update request. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFestivalRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub region: Option<String>,
    pub categories: Option<Vec<String>>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub image_url: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Query parameters for the recommendation listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedParams {
    pub user_id: i64,
}

/// Festival response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FestivalResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub categories: Vec<String>,
    /// First category, for cards that show a single badge.
    pub category: Option<String>,
    pub average_rating: Option<f64>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub image_url: Option<String>,
    pub region: String,
    pub start_date: String,
    pub end_date: String,
}

impl From<FestivalRating> for FestivalResponse {
    fn from(row: FestivalRating) -> Self {
        let categories = row.category_list();
        Self {
            id: row.id,
            title: row.name,
            description: row.description,
            location: row.location,
            category: categories.first().cloned(),
            categories,
            average_rating: Some(row.avg_rating),
            lat: row.lat,
            lng: row.lng,
            image_url: row.image_url,
            region: row.region,
            start_date: row.start_date.to_string(),
            end_date: row.end_date.to_string(),
        }
    }
}

impl From<FestivalWithRating> for FestivalResponse {
    fn from(detail: FestivalWithRating) -> Self {
        let categories = detail.festival.category_list();
        Self {
            id: detail.festival.id,
            title: detail.festival.name,
            description: detail.festival.description,
            location: detail.festival.location,
            category: categories.first().cloned(),
            categories,
            average_rating: detail.average_rating,
            lat: detail.festival.lat,
            lng: detail.festival.lng,
            image_url: detail.festival.image_url,
            region: detail.festival.region,
            start_date: detail.festival.start_date.to_string(),
            end_date: detail.festival.end_date.to_string(),
        }
    }
}

/// List all festivals, best-rated first.
async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<FestivalResponse>>> {
    let rows = state.festival_service.list_ranked().await?;
    Ok(ApiResponse::ok(rows.into_iter().map(Into::into).collect()))
}

/// Get one festival.
async fn get_festival(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<FestivalResponse>> {
    let detail = state.festival_service.get(id).await?;
    Ok(ApiResponse::ok(detail.into()))
}

/// List festivals reordered for a user's interest.
async fn recommended(
    State(state): State<AppState>,
    Query(params): Query<RecommendedParams>,
) -> AppResult<ApiResponse<Vec<FestivalResponse>>> {
    let festivals = state.festival_service.recommended(params.user_id).await?;
    Ok(ApiResponse::ok(
        festivals.into_iter().map(Into::into).collect(),
    ))
}

/// List festivals that have not ended yet.
async fn upcoming(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<FestivalResponse>>> {
    let festivals = state.festival_service.upcoming().await?;
    Ok(ApiResponse::ok(
        festivals.into_iter().map(Into::into).collect(),
    ))
}

/// Create a festival.
async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateFestivalRequest>,
) -> AppResult<ApiResponse<FestivalResponse>> {
    req.validate()?;

    let detail = state
        .festival_service
        .create(CreateFestivalInput {
            name: req.name,
            description: req.description,
            location: req.location,
            region: req.region,
            categories: req.categories,
            lat: req.lat,
            lng: req.lng,
            image_url: req.image_url,
            start_date: req.start_date,
            end_date: req.end_date,
        })
        .await?;

    Ok(ApiResponse::ok(detail.into()))
}

/// Partially update a festival.
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateFestivalRequest>,
) -> AppResult<ApiResponse<FestivalResponse>> {
    let detail = state
        .festival_service
        .update(
            id,
            UpdateFestivalInput {
                name: req.name,
                description: req.description,
                location: req.location,
                region: req.region,
                categories: req.categories,
                lat: req.lat,
                lng: req.lng,
                image_url: req.image_url,
                start_date: req.start_date,
                end_date: req.end_date,
            },
        )
        .await?;

    Ok(ApiResponse::ok(detail.into()))
}

/// Delete a festival and everything referencing it.
async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    state.festival_service.delete(id).await?;
    Ok(ApiResponse::ok(()))
}

/// List one festival's products.
async fn festival_products(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Vec<ProductResponse>>> {
    let products = state.product_service.list_by_festival(id).await?;
    Ok(ApiResponse::ok(
        products.into_iter().map(Into::into).collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/recommended", get(recommended))
        .route("/upcoming", get(upcoming))
        .route("/{id}", get(get_festival).put(update).delete(delete))
        .route("/{id}/products", get(festival_products))
}

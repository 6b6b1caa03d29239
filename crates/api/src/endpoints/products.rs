//! Product endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use festa_common::AppResult;
use festa_core::{CreateProductInput, ProductDetail};
use festa_db::entities::product::ProductType;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{response::ApiResponse, state::AppState};

/// Product create/overwrite request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub festival_id: i64,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 0))]
    pub price: i32,
    pub original_price: Option<i32>,
    #[validate(range(min = 0))]
    pub stock: i32,
    pub product_type: ProductType,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

/// Product response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub product_id: i64,
    pub festival_id: i64,
    pub festival_name: Option<String>,
    pub name: String,
    pub price: i32,
    pub original_price: Option<i32>,
    pub stock: i32,
    pub product_type: ProductType,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

impl From<ProductDetail> for ProductResponse {
    fn from(detail: ProductDetail) -> Self {
        Self {
            product_id: detail.product.id,
            festival_id: detail.product.festival_id,
            festival_name: detail.festival.map(|f| f.name),
            name: detail.product.name,
            price: detail.product.price,
            original_price: detail.product.original_price,
            stock: detail.product.stock,
            product_type: detail.product.product_type,
            image_url: detail.product.image_url,
            description: detail.product.description,
        }
    }
}

impl ProductRequest {
    fn into_input(self) -> CreateProductInput {
        CreateProductInput {
            festival_id: self.festival_id,
            name: self.name,
            price: self.price,
            original_price: self.original_price,
            stock: self.stock,
            product_type: self.product_type,
            image_url: self.image_url,
            description: self.description,
        }
    }
}

/// Create a product.
async fn create(
    State(state): State<AppState>,
    Json(req): Json<ProductRequest>,
) -> AppResult<ApiResponse<ProductResponse>> {
    req.validate()?;

    let detail = state.product_service.create(req.into_input()).await?;
    Ok(ApiResponse::ok(detail.into()))
}

/// List all products.
async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<ProductResponse>>> {
    let products = state.product_service.list().await?;
    Ok(ApiResponse::ok(
        products.into_iter().map(Into::into).collect(),
    ))
}

/// Get one product.
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<ProductResponse>> {
    let detail = state.product_service.get(id).await?;
    Ok(ApiResponse::ok(detail.into()))
}

/// Overwrite a product.
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ProductRequest>,
) -> AppResult<ApiResponse<ProductResponse>> {
    req.validate()?;

    let detail = state.product_service.update(id, req.into_input()).await?;
    Ok(ApiResponse::ok(detail.into()))
}

/// Delete a product. Unknown ids are a no-op.
async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    state.product_service.delete(id).await?;
    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_product).put(update).delete(delete))
}

//! Wishlist endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use festa_common::AppResult;
use festa_core::WishlistStatus;
use serde::Serialize;

use crate::{response::ApiResponse, state::AppState};

/// Wishlist response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistResponse {
    pub wishlist_id: i64,
    pub user_id: i64,
    pub festival_id: i64,
    pub festival_name: Option<String>,
    pub festival_image_url: Option<String>,
    pub added: bool,
}

impl From<WishlistStatus> for WishlistResponse {
    fn from(status: WishlistStatus) -> Self {
        Self {
            wishlist_id: status.wishlist_id,
            user_id: status.user_id,
            festival_id: status.festival_id,
            festival_name: status.festival_name,
            festival_image_url: status.festival_image_url,
            added: status.added,
        }
    }
}

/// Flip a festival in or out of a user's wishlist.
async fn toggle(
    State(state): State<AppState>,
    Path((user_id, festival_id)): Path<(i64, i64)>,
) -> AppResult<ApiResponse<WishlistResponse>> {
    let status = state.wishlist_service.toggle(user_id, festival_id).await?;
    Ok(ApiResponse::ok(status.into()))
}

/// Remove a wishlist entry. Absence is not an error.
async fn remove(
    State(state): State<AppState>,
    Path((user_id, festival_id)): Path<(i64, i64)>,
) -> AppResult<ApiResponse<()>> {
    state.wishlist_service.remove(user_id, festival_id).await?;
    Ok(ApiResponse::ok(()))
}

/// List a user's wishlist.
async fn by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<ApiResponse<Vec<WishlistResponse>>> {
    let entries = state.wishlist_service.list_by_user(user_id).await?;
    Ok(ApiResponse::ok(entries.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{userId}/{festivalId}", post(toggle).delete(remove))
        .route("/{userId}", get(by_user))
}

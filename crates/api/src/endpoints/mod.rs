//! API endpoints.

pub mod festivals;
pub mod products;
pub mod reservations;
pub mod reviews;
pub mod users;
pub mod wishlists;

use axum::Router;

use crate::state::AppState;

/// Build the full API router.
#[must_use]
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/festivals", festivals::router())
        .nest("/products", products::router())
        .nest("/reservations", reservations::router())
        .nest("/reviews", reviews::router())
        .nest("/wishlist", wishlists::router())
}

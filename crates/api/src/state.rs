//! Shared application state.

#![allow(missing_docs)]

use festa_core::{
    FestivalService, ProductService, ReservationService, ReviewService, UserService,
    WishlistService,
};

/// Application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub festival_service: FestivalService,
    pub product_service: ProductService,
    pub reservation_service: ReservationService,
    pub review_service: ReviewService,
    pub wishlist_service: WishlistService,
}

//! Repositories for database operations.

#![allow(missing_docs)]

pub mod festival;
pub mod product;
pub mod reservation;
pub mod review;
pub mod user;
pub mod wishlist;

pub use festival::FestivalRepository;
pub use product::ProductRepository;
pub use reservation::ReservationRepository;
pub use review::{FestivalRating, ReviewRepository};
pub use user::UserRepository;
pub use wishlist::WishlistRepository;

//! Business logic services.

#![allow(missing_docs)]

pub mod festival;
pub mod product;
pub mod reservation;
pub mod review;
pub mod user;
pub mod wishlist;

pub use festival::{
    CreateFestivalInput, FestivalService, FestivalWithRating, UpdateFestivalInput,
};
pub use product::{CreateProductInput, ProductDetail, ProductService};
pub use reservation::{CreateReservationInput, ReservationDetail, ReservationService};
pub use review::{ReviewDetail, ReviewService};
pub use user::{
    PasswordVerifier, PlainTextVerifier, SignupInput, UpdateUserInput, UserService,
};
pub use wishlist::{WishlistService, WishlistStatus};

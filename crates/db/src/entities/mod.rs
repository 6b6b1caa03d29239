//! Database entities.

#![allow(missing_docs)]

pub mod festival;
pub mod product;
pub mod reservation;
pub mod review;
pub mod user;
pub mod wishlist;

pub use festival::Entity as Festival;
pub use product::Entity as Product;
pub use reservation::Entity as Reservation;
pub use review::Entity as Review;
pub use user::Entity as User;
pub use wishlist::Entity as Wishlist;

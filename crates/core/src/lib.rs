//! Core business logic for festa.

pub mod services;

pub use services::*;

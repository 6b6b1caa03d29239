//! HTTP API layer for festa.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: one module per entity, mirroring the service surface
//! - **State**: the wired service set shared across handlers
//! - **Response**: the JSON envelope and error mapping
//!
//! Built on Axum 0.8 with Tower middleware stack.

// Allow dead_code for API compatibility fields in request structs
#![allow(dead_code)]

pub mod endpoints;
pub mod response;
pub mod state;

pub use endpoints::router;
pub use state::AppState;

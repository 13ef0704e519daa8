//! # Formgate API
//!
//! axum HTTP surface over the workflow services.
//!
//! Tier routes read the caller's role token from the `x-key` header; the
//! acting tier is always the resolved role, never a client-chosen value.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;

//! # barkeep-api
//!
//! Axum HTTP surface over the notification center, the background image
//! manager and the migration gate status.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;

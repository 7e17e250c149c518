//! # barkeep-core
//!
//! Core crate for the Barkeep staff portal backend. Contains configuration
//! schemas, the object-store trait seam, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Barkeep crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;

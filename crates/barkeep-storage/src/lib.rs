//! # barkeep-storage
//!
//! Object store providers (local filesystem) and the background image
//! manager for Barkeep.

pub mod images;
pub mod providers;

pub use images::{BackgroundImageManager, ImageList};
pub use providers::local::LocalObjectStore;

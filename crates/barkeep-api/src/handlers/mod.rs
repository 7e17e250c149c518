//! HTTP request handlers.

pub mod health;
pub mod image;
pub mod migration;
pub mod notification;

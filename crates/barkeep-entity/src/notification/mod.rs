//! Notification entities.

pub mod kind;
pub mod model;

pub use kind::NotificationKind;
pub use model::Notification;

//! # barkeep-entity
//!
//! Domain entity models for Barkeep: notifications, staff users, legacy
//! maintenance tickets, background images, and migration gate state.

pub mod image;
pub mod migration;
pub mod notification;
pub mod ticket;
pub mod user;

pub use image::BackgroundImage;
pub use migration::{GateState, MigrationStatus};
pub use notification::{Notification, NotificationKind};
pub use ticket::MaintenanceTicket;
pub use user::{StaffRole, StaffUser};

//! Maintenance ticket entities.

pub mod model;

pub use model::MaintenanceTicket;

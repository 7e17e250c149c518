//! Migration gate state entities.

pub mod status;

pub use status::{GateState, MigrationStatus};

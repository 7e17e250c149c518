//! Legacy-data migration gate.
//!
//! One-time idempotent check-and-run procedure ensuring legacy portal data
//! has been copied into the store before dependent features activate.

pub mod gate;
pub mod legacy;

pub use gate::{MigrationGate, MigrationTarget, PgMigrationTarget};
pub use legacy::{JsonLegacySource, LegacySource, LegacyTicket, LegacyUser};

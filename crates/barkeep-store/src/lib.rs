//! # barkeep-store
//!
//! Client for the realtime data store backing Barkeep: PostgreSQL
//! connection management, concrete repositories, the insert change feed
//! (LISTEN/NOTIFY with an in-process fan-out), in-memory doubles for
//! tests, and the legacy-data migration gate.

pub mod connection;
pub mod feed;
pub mod memory;
pub mod migrate;
pub mod migration;
pub mod repositories;
pub mod traits;

pub use connection::DatabasePool;
pub use feed::PgChangeFeed;
pub use migration::MigrationGate;
pub use traits::{ChangeFeed, NewNotification, NotificationStore};

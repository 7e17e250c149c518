//! # barkeep-sync
//!
//! Keeps a per-session, in-memory projection of staff notifications
//! consistent with the store: initial fetch, live insert events from the
//! change feed, and optimistic read-state mutations reconciled
//! fire-and-forget against the store.

pub mod alert;
pub mod projection;
pub mod session;
pub mod synchronizer;

pub use alert::{AlertSink, TracingAlertSink};
pub use projection::NotificationProjection;
pub use session::{NoopCenter, NotificationCenter, SessionContext};
pub use synchronizer::NotificationSynchronizer;

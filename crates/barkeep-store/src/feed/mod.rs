//! Realtime insert change feed.
//!
//! A Postgres trigger publishes each committed notification insert on a
//! NOTIFY channel; a single listener task decodes the payloads and fans
//! them out to in-process subscribers keyed by recipient role.

pub mod fanout;
pub mod listener;

pub use fanout::RoleFanout;
pub use listener::PgChangeFeed;

//! Core traits defined in `barkeep-core` and implemented by other crates.

pub mod object_store;

pub use object_store::{ObjectStore, StoredObject};

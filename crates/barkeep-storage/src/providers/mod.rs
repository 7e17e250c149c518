//! Object store provider implementations.

pub mod local;

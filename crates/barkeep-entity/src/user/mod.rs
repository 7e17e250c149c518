//! Staff user entities.

pub mod model;
pub mod role;

pub use model::StaffUser;
pub use role::StaffRole;

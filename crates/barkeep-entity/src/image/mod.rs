//! Background image entities.

pub mod model;

pub use model::BackgroundImage;

//! Concrete Postgres repository implementations.

pub mod image;
pub mod notification;
pub mod ticket;
pub mod user;

pub use image::BackgroundImageRepository;
pub use notification::NotificationRepository;
pub use ticket::TicketRepository;
pub use user::StaffUserRepository;

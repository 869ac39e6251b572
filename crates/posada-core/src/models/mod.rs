//! Domain models for Posada Booking
//!
//! This module contains all the core domain models used throughout the application.

pub mod booking;
pub mod invoice;
pub mod review;
pub mod room;
pub mod site;
pub mod user;

pub use booking::{Booking, BookingStatus};
pub use invoice::{Invoice, InvoiceStatus};
pub use review::Review;
pub use room::{Room, RoomFeature, RoomService};
pub use site::SiteSetting;
pub use user::{User, UserInfo, UserRole};

//! Data Transfer Objects (DTOs) for API requests and responses

pub mod auth;
pub mod booking;
pub mod common;
pub mod invoice;
pub mod review;
pub mod room;

pub use auth::*;
pub use booking::*;
pub use common::*;
pub use invoice::*;
pub use review::*;
pub use room::*;

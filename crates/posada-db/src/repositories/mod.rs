//! Repository implementations
//!
//! This module contains concrete implementations of all repository traits
//! defined in posada-core, using sqlx for PostgreSQL access.

pub mod booking_repo;
pub mod invoice_repo;
pub mod review_repo;
pub mod room_repo;
pub mod site_repo;
pub mod user_repo;

pub use booking_repo::PgBookingRepository;
pub use invoice_repo::PgInvoiceRepository;
pub use review_repo::PgReviewRepository;
pub use room_repo::PgRoomRepository;
pub use site_repo::PgSiteRepository;
pub use user_repo::PgUserRepository;

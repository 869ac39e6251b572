//! API layer for Posada Booking
//!
//! HTTP handlers for rooms, bookings, invoices, reviews, authentication, and
//! site availability.

pub mod dto;
pub mod handlers;
pub mod middleware;

// Re-export DTOs (common types)
pub use dto::{ApiResponse, PaginationParams};

// Re-export handler configuration functions
pub use handlers::{
    configure_auth, configure_bookings, configure_invoices, configure_reviews, configure_rooms,
    configure_site,
};

// Re-export the maintenance gate
pub use middleware::{MaintenanceGate, SiteStatus};

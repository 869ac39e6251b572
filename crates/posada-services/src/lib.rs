//! Business logic services for Posada Booking
//!
//! This crate contains the business logic that orchestrates booking
//! operations: the booking ledger, the room catalog, and invoice
//! generation.
//!
//! # Architecture
//!
//! Services are designed to be composable and testable:
//! - Each service owns its dependencies (repositories, cache, pool)
//! - Services are wrapped in Arc for safe sharing across async tasks
//! - All operations are instrumented with tracing
//! - Comprehensive error handling with AppError
//!
//! # Services
//!
//! - `BookingLedger` - transactional booking lifecycle; guarantees at most
//!   one active booking per room under concurrent callers
//! - `RoomCatalog` - catalog management and the cached availability listing
//! - `InvoiceGenerator` - derives invoices from bookings, at most one per
//!   booking

pub mod booking_ledger;
pub mod invoicing;
pub mod room_catalog;

pub use booking_ledger::BookingLedger;
pub use invoicing::InvoiceGenerator;
pub use room_catalog::RoomCatalog;

//! HTTP request handlers

pub mod auth;
pub mod booking;
pub mod invoice;
pub mod review;
pub mod room;
pub mod site;

pub use auth::configure as configure_auth;
pub use booking::configure as configure_bookings;
pub use invoice::configure as configure_invoices;
pub use review::configure as configure_reviews;
pub use room::configure as configure_rooms;
pub use site::configure as configure_site;

use posada_db::{PgBookingRepository, PgInvoiceRepository, PgRoomRepository};
use posada_services::{InvoiceGenerator, RoomCatalog};

/// Room catalog service as wired by the server binary
pub type Catalog = RoomCatalog<PgRoomRepository>;

/// Invoice generator as wired by the server binary
pub type Invoicer = InvoiceGenerator<PgBookingRepository, PgInvoiceRepository>;

//! Invoice generator service
//!
//! Derives invoices from bookings. The amount is the nightly rate that was
//! snapshotted onto the booking when it was created, so later catalog price
//! edits never change what a stay is billed.

use posada_core::{
    models::{Invoice, InvoiceStatus},
    traits::{BookingRepository, InvoiceRepository, Repository},
    AppError, AppResult,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};

/// Invoice generator
///
/// Creates at most one invoice per booking: the unique index on
/// `invoices.booking_id` turns a repeated generation into
/// `AppError::InvoiceExists` instead of a second row.
pub struct InvoiceGenerator<B: BookingRepository, I: InvoiceRepository> {
    booking_repo: Arc<B>,
    invoice_repo: Arc<I>,
}

impl<B: BookingRepository, I: InvoiceRepository> InvoiceGenerator<B, I> {
    /// Create a new invoice generator
    pub fn new(booking_repo: Arc<B>, invoice_repo: Arc<I>) -> Self {
        Self {
            booking_repo,
            invoice_repo,
        }
    }

    /// Generate the invoice for a booking
    ///
    /// # Errors
    ///
    /// - `AppError::BookingNotFound` if the booking does not exist
    /// - `AppError::InvoiceExists` if an invoice was already generated
    #[instrument(skip(self))]
    pub async fn generate_invoice(&self, booking_id: i32) -> AppResult<Invoice> {
        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::BookingNotFound(booking_id.to_string()))?;

        let invoice = Invoice {
            id: 0, // Will be set by database
            booking_id: booking.id,
            amount: booking.nightly_rate,
            status: InvoiceStatus::Paid,
            created_at: Utc::now(),
        };

        let created = self.invoice_repo.create(&invoice).await?;

        info!(
            "Generated invoice {} for booking {}: {}",
            created.id, booking_id, created.amount
        );

        Ok(created)
    }

    /// Fetch the invoice for a booking
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvoiceNotFound` if none was generated yet
    #[instrument(skip(self))]
    pub async fn invoice_for_booking(&self, booking_id: i32) -> AppResult<Invoice> {
        self.invoice_repo
            .find_by_booking(booking_id)
            .await?
            .ok_or_else(|| AppError::InvoiceNotFound(booking_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use posada_core::models::{Booking, Invoice, InvoiceStatus};
    use rust_decimal_macros::dec;

    #[test]
    fn test_invoice_amount_comes_from_booking_snapshot() {
        // The generator copies the booking's rate snapshot, so the invoice
        // shape can be checked without a database.
        let booking = Booking {
            id: 9,
            nightly_rate: dec!(100.00),
            ..Default::default()
        };

        let invoice = Invoice {
            id: 0,
            booking_id: booking.id,
            amount: booking.nightly_rate,
            status: InvoiceStatus::Paid,
            created_at: chrono::Utc::now(),
        };

        assert_eq!(invoice.booking_id, 9);
        assert_eq!(invoice.amount, dec!(100.00));
        assert_eq!(invoice.status, InvoiceStatus::Paid);
    }
}

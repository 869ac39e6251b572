//! Invoice model
//!
//! Immutable billing records derived from bookings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Invoice status
///
/// A single terminal value in the current scope; the enum exists so the
/// wire format stays stable when further states (e.g. refunded) arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Invoice has been settled
    #[default]
    Paid,
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceStatus::Paid => write!(f, "paid"),
        }
    }
}

impl InvoiceStatus {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "paid" => Some(InvoiceStatus::Paid),
            _ => None,
        }
    }
}

/// Invoice entity
///
/// An immutable billing record. At most one invoice exists per booking
/// (enforced by a unique index on `booking_id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier
    pub id: i32,

    /// Booking this invoice bills
    pub booking_id: i32,

    /// Billed amount, copied from the booking's rate snapshot
    pub amount: Decimal,

    /// Current status
    pub status: InvoiceStatus,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        assert_eq!(InvoiceStatus::from_str("paid"), Some(InvoiceStatus::Paid));
        assert_eq!(InvoiceStatus::from_str("PAID"), Some(InvoiceStatus::Paid));
        assert_eq!(InvoiceStatus::from_str("refunded"), None);
        assert_eq!(InvoiceStatus::Paid.to_string(), "paid");
    }
}

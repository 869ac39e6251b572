//! Booking model
//!
//! Represents room reservations and their lifecycle.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Booking status
///
/// The lifecycle is a one-way transition: `Booked` → `Cancelled`.
/// A cancelled booking never returns to `Booked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Active reservation holding the room
    #[default]
    Booked,
    /// Reservation was cancelled and the room released
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Booked => write!(f, "booked"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl BookingStatus {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "booked" => Some(BookingStatus::Booked),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    /// Check if the booking is still holding its room
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Booked)
    }

    /// Check if the booking reached its terminal state
    pub fn is_final(&self) -> bool {
        !self.is_active()
    }
}

/// Booking entity
///
/// Represents a reservation of a single room for a date range.
/// The lifecycle:
/// 1. Created by the booking ledger with status `Booked` (room claimed)
/// 2. Optionally cancelled, which releases the room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier
    pub id: i32,

    /// Guest who placed the booking
    pub user_id: i32,

    /// Booked room
    pub room_id: i32,

    /// Arrival date (inclusive)
    pub check_in: NaiveDate,

    /// Departure date (exclusive), strictly after `check_in`
    pub check_out: NaiveDate,

    /// Nightly rate captured from the room at booking time;
    /// invoices bill from this snapshot, not the live catalog price
    pub nightly_rate: Decimal,

    /// Current status
    pub status: BookingStatus,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Number of nights covered by the stay
    #[inline]
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Check if the booking is still holding its room
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Validate a requested stay range
    ///
    /// Returns `Err` with a human-readable reason when the range is not a
    /// positive-length stay.
    pub fn validate_dates(check_in: NaiveDate, check_out: NaiveDate) -> Result<(), String> {
        if check_out <= check_in {
            return Err(format!(
                "check_out ({}) must be after check_in ({})",
                check_out, check_in
            ));
        }
        Ok(())
    }
}

impl Default for Booking {
    fn default() -> Self {
        let now = Utc::now();
        let today = now.date_naive();
        Self {
            id: 0,
            user_id: 0,
            room_id: 0,
            check_in: today,
            check_out: today + chrono::Duration::days(1),
            nightly_rate: Decimal::ZERO,
            status: BookingStatus::Booked,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_status_lifecycle() {
        assert!(BookingStatus::Booked.is_active());
        assert!(!BookingStatus::Cancelled.is_active());
        assert!(BookingStatus::Cancelled.is_final());
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(BookingStatus::from_str("booked"), Some(BookingStatus::Booked));
        assert_eq!(
            BookingStatus::from_str("CANCELLED"),
            Some(BookingStatus::Cancelled)
        );
        assert_eq!(BookingStatus::from_str("pending"), None);
        assert_eq!(BookingStatus::Booked.to_string(), "booked");
    }

    #[test]
    fn test_validate_dates_rejects_empty_stay() {
        let day = date(2024, 6, 1);
        assert!(Booking::validate_dates(day, day).is_err());
        assert!(Booking::validate_dates(day, date(2024, 5, 30)).is_err());
        assert!(Booking::validate_dates(day, date(2024, 6, 3)).is_ok());
    }

    #[test]
    fn test_nights() {
        let booking = Booking {
            check_in: date(2024, 6, 1),
            check_out: date(2024, 6, 3),
            ..Default::default()
        };
        assert_eq!(booking.nights(), 2);
    }
}

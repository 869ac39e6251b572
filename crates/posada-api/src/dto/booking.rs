//! Booking DTOs
//!
//! Request and response types for booking endpoints.

use posada_core::models::Booking;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Booking creation request
///
/// The caller's identity comes from the JWT, never from the payload.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateBookingRequest {
    /// Room to book
    #[validate(range(min = 1, message = "room_id is required"))]
    pub room_id: i32,

    /// Arrival date
    pub check_in: NaiveDate,

    /// Departure date, strictly after `check_in`
    pub check_out: NaiveDate,
}

/// Booking response DTO
#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    pub id: i32,
    pub user_id: i32,
    pub room_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nightly_rate: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            user_id: booking.user_id,
            room_id: booking.room_id,
            check_in: booking.check_in,
            check_out: booking.check_out,
            nightly_rate: booking.nightly_rate.to_string().parse().unwrap_or(0.0),
            status: booking.status.to_string(),
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posada_core::models::BookingStatus;
    use rust_decimal_macros::dec;

    #[test]
    fn test_create_booking_request_deserializes_dates() {
        let payload = r#"{
            "room_id": 1,
            "check_in": "2024-06-01",
            "check_out": "2024-06-03"
        }"#;
        let request: CreateBookingRequest = serde_json::from_str(payload).unwrap();
        assert_eq!(request.room_id, 1);
        assert_eq!(request.check_in.to_string(), "2024-06-01");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_booking_rejects_unknown_fields() {
        // An injected user_id is a hard error; identity comes from the JWT
        let payload = r#"{
            "room_id": 1,
            "check_in": "2024-06-01",
            "check_out": "2024-06-03",
            "user_id": 999
        }"#;
        let result: Result<CreateBookingRequest, _> = serde_json::from_str(payload);
        assert!(result.is_err());
    }

    #[test]
    fn test_booking_response_conversion() {
        let booking = Booking {
            id: 5,
            user_id: 1,
            room_id: 2,
            nightly_rate: dec!(100.00),
            status: BookingStatus::Booked,
            ..Default::default()
        };
        let response = BookingResponse::from(booking);
        assert_eq!(response.id, 5);
        assert_eq!(response.nightly_rate, 100.0);
        assert_eq!(response.status, "booked");
    }
}

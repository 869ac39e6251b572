//! Room DTOs
//!
//! Request and response types for room catalog endpoints.

use posada_core::models::{Room, RoomFeature, RoomService};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Room creation request (admin only)
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateRoomRequest {
    /// Room number (unique)
    #[validate(length(min = 1, max = 20, message = "Room number is required"))]
    pub room_number: String,

    /// Nightly rate
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
}

/// Reject negative prices at the boundary
fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        return Err(ValidationError::new("price_negative"));
    }
    Ok(())
}

/// Feature attachment request (admin only)
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AddFeatureRequest {
    /// Feature label
    #[validate(length(min = 1, max = 100, message = "Feature is required"))]
    pub feature: String,
}

/// Service attachment request (admin only)
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AddServiceRequest {
    /// Service label
    #[validate(length(min = 1, max = 100, message = "Service is required"))]
    pub service: String,
}

/// Room response DTO
#[derive(Debug, Clone, Serialize)]
pub struct RoomResponse {
    pub id: i32,
    pub room_number: String,
    pub price: f64,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        Self {
            id: room.id,
            room_number: room.room_number,
            price: room.price.to_string().parse().unwrap_or(0.0),
            is_available: room.is_available,
            created_at: room.created_at,
            updated_at: room.updated_at,
        }
    }
}

/// Room detail response including features and services
#[derive(Debug, Clone, Serialize)]
pub struct RoomDetailResponse {
    #[serde(flatten)]
    pub room: RoomResponse,
    pub features: Vec<String>,
    pub services: Vec<String>,
}

impl RoomDetailResponse {
    /// Assemble a detail view from a room and its attachments
    pub fn new(room: Room, features: Vec<RoomFeature>, services: Vec<RoomService>) -> Self {
        Self {
            room: room.into(),
            features: features.into_iter().map(|f| f.feature).collect(),
            services: services.into_iter().map(|s| s.service).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_create_room_request_validation() {
        let valid = CreateRoomRequest {
            room_number: "101".to_string(),
            price: dec!(100.00),
        };
        assert!(valid.validate().is_ok());

        let negative = CreateRoomRequest {
            room_number: "101".to_string(),
            price: dec!(-1.00),
        };
        assert!(negative.validate().is_err());

        let empty_number = CreateRoomRequest {
            room_number: "".to_string(),
            price: dec!(100.00),
        };
        assert!(empty_number.validate().is_err());
    }

    #[test]
    fn test_zero_price_is_accepted() {
        // Complimentary rooms are allowed; only negative prices are malformed
        let free = CreateRoomRequest {
            room_number: "0A".to_string(),
            price: dec!(0.00),
        };
        assert!(free.validate().is_ok());
    }

    #[test]
    fn test_room_response_conversion() {
        let room = Room {
            id: 1,
            room_number: "101".to_string(),
            price: dec!(100.00),
            ..Default::default()
        };
        let response = RoomResponse::from(room);
        assert_eq!(response.id, 1);
        assert_eq!(response.price, 100.0);
        assert!(response.is_available);
    }
}

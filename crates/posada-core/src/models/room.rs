//! Room model
//!
//! Represents rooms in the hotel catalog together with their attached
//! features and services.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Room entity
///
/// A bookable room in the catalog. The `is_available` flag is owned by the
/// booking ledger: it is false exactly while a booking with status `booked`
/// exists for the room, and it is only flipped inside ledger transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique identifier
    pub id: i32,

    /// Room number (unique, e.g. "101", "2B")
    pub room_number: String,

    /// Nightly rate
    pub price: Decimal,

    /// Whether the room can accept a new booking
    pub is_available: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Room {
    /// Check if a new booking can be placed on this room
    #[inline]
    pub fn can_book(&self) -> bool {
        self.is_available
    }
}

impl Default for Room {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            room_number: String::new(),
            price: Decimal::ZERO,
            is_available: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Room feature record (e.g. "sea view", "balcony")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomFeature {
    /// Unique identifier
    pub id: i32,

    /// Room this feature belongs to
    pub room_id: i32,

    /// Feature label
    pub feature: String,
}

/// Room service record (e.g. "breakfast", "laundry")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomService {
    /// Unique identifier
    pub id: i32,

    /// Room this service belongs to
    pub room_id: i32,

    /// Service label
    pub service: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_room_is_bookable() {
        let room = Room {
            room_number: "101".to_string(),
            price: dec!(100.00),
            ..Default::default()
        };
        assert!(room.can_book());
    }

    #[test]
    fn test_unavailable_room_is_not_bookable() {
        let room = Room {
            is_available: false,
            ..Default::default()
        };
        assert!(!room.can_book());
    }
}

//! Cache key constants and builders for Posada Booking
//!
//! Provides standardized key naming patterns for all cached entities,
//! ensuring consistency across the application and preventing key collisions.
//!
//! # Key Patterns
//!
//! - `rooms:available` - The cached available-rooms listing
//! - `room:{room_id}` - Individual room details
//!
//! # Example
//!
//! ```
//! use posada_cache::keys;
//!
//! assert_eq!(keys::AVAILABLE_ROOMS_KEY, "rooms:available");
//! assert_eq!(keys::room_key(101), "room:101");
//! ```

/// Key for the cached available-rooms listing
///
/// Invalidated by the booking ledger after every committed booking or
/// cancellation, and expired by TTL as a backstop.
pub const AVAILABLE_ROOMS_KEY: &str = "rooms:available";

/// Prefix for individual room details
///
/// Format: `room:{room_id}`
pub const ROOM_KEY_PREFIX: &str = "room";

/// Default TTL for the available-rooms listing (1 minute)
pub const AVAILABLE_ROOMS_TTL_SECS: u64 = 60;

/// Build the cache key for a room
pub fn room_key(room_id: i32) -> String {
    format!("{}:{}", ROOM_KEY_PREFIX, room_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_key() {
        assert_eq!(room_key(1), "room:1");
        assert_eq!(room_key(101), "room:101");
    }
}

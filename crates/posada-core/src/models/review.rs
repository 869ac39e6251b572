//! Review model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest accepted rating
pub const MIN_RATING: i32 = 1;

/// Highest accepted rating
pub const MAX_RATING: i32 = 5;

/// Review entity
///
/// A guest's rating and comment for a room. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Unique identifier
    pub id: i32,

    /// Author of the review
    pub user_id: i32,

    /// Reviewed room
    pub room_id: i32,

    /// Rating in the range 1..=5
    pub rating: i32,

    /// Free-text comment
    pub comment: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Check that a rating value lies in the accepted range
    pub fn rating_in_range(rating: i32) -> bool {
        (MIN_RATING..=MAX_RATING).contains(&rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(Review::rating_in_range(1));
        assert!(Review::rating_in_range(5));
        assert!(!Review::rating_in_range(0));
        assert!(!Review::rating_in_range(6));
    }
}

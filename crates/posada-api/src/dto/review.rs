//! Review DTOs

use posada_core::models::Review;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Review creation request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateReviewRequest {
    /// Reviewed room
    #[validate(range(min = 1, message = "room_id is required"))]
    pub room_id: i32,

    /// Rating in the range 1..=5
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    /// Free-text comment
    #[validate(length(max = 2000, message = "Comment is too long"))]
    pub comment: String,
}

/// Review response DTO
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub id: i32,
    pub user_id: i32,
    pub room_id: i32,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            user_id: review.user_id,
            room_id: review.room_id,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_request_validation() {
        let valid = CreateReviewRequest {
            room_id: 1,
            rating: 5,
            comment: "Great stay".to_string(),
        };
        assert!(valid.validate().is_ok());

        let out_of_range = CreateReviewRequest {
            room_id: 1,
            rating: 6,
            comment: String::new(),
        };
        assert!(out_of_range.validate().is_err());

        let zero = CreateReviewRequest {
            room_id: 1,
            rating: 0,
            comment: String::new(),
        };
        assert!(zero.validate().is_err());
    }
}

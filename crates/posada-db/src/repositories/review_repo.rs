//! Review repository implementation

use posada_core::{
    models::Review,
    traits::{Repository, ReviewRepository},
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of ReviewRepository
pub struct PgReviewRepository {
    pool: PgPool,
}

impl PgReviewRepository {
    /// Create a new review repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Review, i32> for PgReviewRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Review>> {
        debug!("Finding review by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, ReviewRow>(
            r#"
            SELECT id, user_id, room_id, rating, comment, created_at
            FROM reviews
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding review {}: {}", id, e);
            AppError::Database(format!("Failed to find review: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Review>> {
        debug!("Finding all reviews with limit {} offset {}", limit, offset);

        let rows = sqlx::query_as::<sqlx::Postgres, ReviewRow>(
            r#"
            SELECT id, user_id, room_id, rating, comment, created_at
            FROM reviews
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding reviews: {}", e);
            AppError::Database(format!("Failed to fetch reviews: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reviews")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting reviews: {}", e);
                AppError::Database(format!("Failed to count reviews: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Review) -> AppResult<Review> {
        debug!(
            "Creating review by user {} for room {}",
            entity.user_id, entity.room_id
        );

        let row = sqlx::query_as::<sqlx::Postgres, ReviewRow>(
            r#"
            INSERT INTO reviews (user_id, room_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, room_id, rating, comment, created_at
            "#,
        )
        .bind(entity.user_id)
        .bind(entity.room_id)
        .bind(entity.rating)
        .bind(&entity.comment)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("foreign key constraint") {
                AppError::RoomNotFound(entity.room_id.to_string())
            } else {
                error!("Database error creating review: {}", e);
                AppError::Database(format!("Failed to create review: {}", e))
            }
        })?;

        Ok(row.into())
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    #[instrument(skip(self))]
    async fn find_by_room(&self, room_id: i32) -> AppResult<Vec<Review>> {
        debug!("Finding reviews for room: {}", room_id);

        let rows = sqlx::query_as::<sqlx::Postgres, ReviewRow>(
            r#"
            SELECT id, user_id, room_id, rating, comment, created_at
            FROM reviews
            WHERE room_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding reviews for room: {}", e);
            AppError::Database(format!("Failed to find reviews: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: i32,
    user_id: i32,
    room_id: i32,
    rating: i32,
    comment: String,
    created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            room_id: row.room_id,
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

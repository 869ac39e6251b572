//! Booking repository implementation
//!
//! Read-side access to bookings. The state-changing paths (claiming a room,
//! cancelling) are transactional and live in the booking ledger service; this
//! repository only creates rows on behalf of the ledger and serves lookups.

use posada_core::{
    models::{Booking, BookingStatus},
    traits::{BookingRepository, Repository},
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of BookingRepository
pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    /// Create a new booking repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Parse booking status from string
    fn parse_status(s: &str) -> BookingStatus {
        BookingStatus::from_str(s).unwrap_or(BookingStatus::Booked)
    }
}

#[async_trait]
impl Repository<Booking, i32> for PgBookingRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Booking>> {
        debug!("Finding booking by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, BookingRow>(
            r#"
            SELECT id, user_id, room_id, check_in, check_out,
                   nightly_rate, status, created_at, updated_at
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding booking {}: {}", id, e);
            AppError::Database(format!("Failed to find booking: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Booking>> {
        debug!(
            "Finding all bookings with limit {} offset {}",
            limit, offset
        );

        let rows = sqlx::query_as::<sqlx::Postgres, BookingRow>(
            r#"
            SELECT id, user_id, room_id, check_in, check_out,
                   nightly_rate, status, created_at, updated_at
            FROM bookings
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding bookings: {}", e);
            AppError::Database(format!("Failed to fetch bookings: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting bookings: {}", e);
                AppError::Database(format!("Failed to count bookings: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Booking) -> AppResult<Booking> {
        debug!(
            "Creating booking for user {} on room {}",
            entity.user_id, entity.room_id
        );

        let row = sqlx::query_as::<sqlx::Postgres, BookingRow>(
            r#"
            INSERT INTO bookings (user_id, room_id, check_in, check_out, nightly_rate, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, room_id, check_in, check_out,
                      nightly_rate, status, created_at, updated_at
            "#,
        )
        .bind(entity.user_id)
        .bind(entity.room_id)
        .bind(entity.check_in)
        .bind(entity.check_out)
        .bind(entity.nightly_rate)
        .bind(entity.status.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating booking: {}", e);
            AppError::Database(format!("Failed to create booking: {}", e))
        })?;

        Ok(row.into())
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: i32) -> AppResult<Vec<Booking>> {
        debug!("Finding bookings for user: {}", user_id);

        let rows = sqlx::query_as::<sqlx::Postgres, BookingRow>(
            r#"
            SELECT id, user_id, room_id, check_in, check_out,
                   nightly_rate, status, created_at, updated_at
            FROM bookings
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding bookings for user: {}", e);
            AppError::Database(format!("Failed to find bookings: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn find_active_by_room(&self, room_id: i32) -> AppResult<Option<Booking>> {
        debug!("Finding active booking for room: {}", room_id);

        let result = sqlx::query_as::<sqlx::Postgres, BookingRow>(
            r#"
            SELECT id, user_id, room_id, check_in, check_out,
                   nightly_rate, status, created_at, updated_at
            FROM bookings
            WHERE room_id = $1 AND status = 'booked'
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding active booking: {}", e);
            AppError::Database(format!("Failed to find active booking: {}", e))
        })?;

        Ok(result.map(Into::into))
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: i32,
    user_id: i32,
    room_id: i32,
    check_in: NaiveDate,
    check_out: NaiveDate,
    nightly_rate: Decimal,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            room_id: row.room_id,
            check_in: row.check_in,
            check_out: row.check_out,
            nightly_rate: row.nightly_rate,
            status: PgBookingRepository::parse_status(&row.status),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(
            PgBookingRepository::parse_status("booked"),
            BookingStatus::Booked
        );
        assert_eq!(
            PgBookingRepository::parse_status("cancelled"),
            BookingStatus::Cancelled
        );
        // Unknown strings fall back to the default state
        assert_eq!(
            PgBookingRepository::parse_status("garbage"),
            BookingStatus::Booked
        );
    }
}

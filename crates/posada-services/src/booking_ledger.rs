//! Booking ledger service
//!
//! Owns the booking lifecycle and the room-availability state machine:
//! - Create bookings, claiming the room's availability flag
//! - Cancel bookings, releasing the room
//!
//! Both operations run as single transactions so that the availability flag
//! never drifts from the set of active bookings: `is_available` is false
//! exactly while a booking with status `booked` exists for the room.
//!
//! The room claim is a conditional update (`... WHERE is_available = TRUE`),
//! not a read followed by a write. Concurrent requests for the same room
//! serialize on the row lock; exactly one sees the row flip and the rest get
//! zero rows back and fail with a conflict.

use posada_core::{
    models::{Booking, BookingStatus},
    AppError, AppResult,
};
use chrono::{DateTime, NaiveDate, Utc};
use posada_cache::{keys, RedisCache};
use posada_core::traits::CacheService;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Booking ledger
///
/// Handles booking creation and cancellation with proper transaction
/// management. The cache handle is optional; when present, the cached
/// available-rooms listing is invalidated after every committed mutation
/// (best effort, never fails the request).
pub struct BookingLedger {
    pool: Arc<PgPool>,
    cache: Option<Arc<RedisCache>>,
}

impl BookingLedger {
    /// Create a new booking ledger
    pub fn new(pool: Arc<PgPool>, cache: Option<Arc<RedisCache>>) -> Self {
        Self { pool, cache }
    }

    /// Create a booking for a user on a room
    ///
    /// # Arguments
    ///
    /// * `user_id` - Authenticated guest placing the booking
    /// * `room_id` - Room to book
    /// * `check_in` / `check_out` - Stay range, `check_out` strictly after
    ///   `check_in`
    ///
    /// # Returns
    ///
    /// The created booking with the room's nightly rate snapshotted into it
    ///
    /// # Errors
    ///
    /// - `AppError::Validation` if the stay range is empty or inverted
    /// - `AppError::RoomNotFound` if the room does not exist
    /// - `AppError::RoomUnavailable` if the room is already booked
    #[instrument(skip(self))]
    pub async fn create_booking(
        &self,
        user_id: i32,
        room_id: i32,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> AppResult<Booking> {
        Booking::validate_dates(check_in, check_out).map_err(AppError::Validation)?;

        info!(
            "Creating booking for user {} on room {} ({} to {})",
            user_id, room_id, check_in, check_out
        );

        // Start transaction
        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to start transaction: {}", e);
            AppError::Transaction(format!("Failed to start transaction: {}", e))
        })?;

        // Claim the room. The WHERE clause is the availability check: there
        // is no separate read, so two concurrent claims on the same room
        // serialize on the row lock and only one sees a row come back.
        let claimed: Option<(Decimal,)> = sqlx::query_as(
            r#"
            UPDATE rooms
            SET is_available = FALSE,
                updated_at = NOW()
            WHERE id = $1 AND is_available = TRUE
            RETURNING price
            "#,
        )
        .bind(room_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to claim room {}: {}", room_id, e);
            AppError::Database(format!("Failed to claim room: {}", e))
        })?;

        let nightly_rate = match claimed {
            Some((price,)) => price,
            None => {
                // Zero rows: either the room is taken or it does not exist.
                // Distinguish inside the same transaction.
                let exists: Option<(i32,)> = sqlx::query_as("SELECT id FROM rooms WHERE id = $1")
                    .bind(room_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;

                return match exists {
                    Some(_) => {
                        info!("Room {} is not available", room_id);
                        Err(AppError::RoomUnavailable(room_id.to_string()))
                    }
                    None => {
                        info!("Room {} not found", room_id);
                        Err(AppError::RoomNotFound(room_id.to_string()))
                    }
                };
            }
        };

        // Insert the booking with the rate snapshot
        let booking = sqlx::query_as::<sqlx::Postgres, BookingRow>(
            r#"
            INSERT INTO bookings (user_id, room_id, check_in, check_out, nightly_rate, status)
            VALUES ($1, $2, $3, $4, $5, 'booked')
            RETURNING id, user_id, room_id, check_in, check_out,
                      nightly_rate, status, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(room_id)
        .bind(check_in)
        .bind(check_out)
        .bind(nightly_rate)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to insert booking: {}", e);
            AppError::Database(format!("Failed to create booking: {}", e))
        })?;

        // Commit transaction
        tx.commit().await.map_err(|e| {
            error!("Failed to commit transaction: {}", e);
            AppError::Transaction(format!("Failed to commit transaction: {}", e))
        })?;

        self.invalidate_listing().await;

        let booking: Booking = booking.into();

        info!(
            "Created booking {} for user {} on room {}",
            booking.id, user_id, room_id
        );

        Ok(booking)
    }

    /// Cancel a booking and release its room
    ///
    /// # Arguments
    ///
    /// * `booking_id` - Booking to cancel
    /// * `caller_id` - Authenticated user requesting the cancellation
    /// * `caller_is_admin` - Whether the caller may cancel others' bookings
    ///
    /// # Errors
    ///
    /// - `AppError::BookingNotFound` if the booking does not exist
    /// - `AppError::BookingAlreadyCancelled` if it was already cancelled
    /// - `AppError::Forbidden` if the caller neither owns the booking nor is
    ///   an admin (the transition rolls back)
    #[instrument(skip(self))]
    pub async fn cancel_booking(
        &self,
        booking_id: i32,
        caller_id: i32,
        caller_is_admin: bool,
    ) -> AppResult<Booking> {
        info!("Cancelling booking {}", booking_id);

        // Start transaction
        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to start transaction: {}", e);
            AppError::Transaction(format!("Failed to start transaction: {}", e))
        })?;

        // Conditional transition: only an active booking can be cancelled
        let cancelled = sqlx::query_as::<sqlx::Postgres, BookingRow>(
            r#"
            UPDATE bookings
            SET status = 'cancelled',
                updated_at = NOW()
            WHERE id = $1 AND status = 'booked'
            RETURNING id, user_id, room_id, check_in, check_out,
                      nightly_rate, status, created_at, updated_at
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to cancel booking {}: {}", booking_id, e);
            AppError::Database(format!("Failed to cancel booking: {}", e))
        })?;

        let booking = match cancelled {
            Some(row) => row,
            None => {
                let status: Option<(String,)> =
                    sqlx::query_as("SELECT status FROM bookings WHERE id = $1")
                        .bind(booking_id)
                        .fetch_optional(&mut *tx)
                        .await
                        .map_err(|e| AppError::Database(e.to_string()))?;

                return match status {
                    Some(_) => {
                        info!("Booking {} already cancelled", booking_id);
                        Err(AppError::BookingAlreadyCancelled(booking_id.to_string()))
                    }
                    None => {
                        info!("Booking {} not found", booking_id);
                        Err(AppError::BookingNotFound(booking_id.to_string()))
                    }
                };
            }
        };

        // Ownership check; returning the error drops the transaction and
        // rolls the transition back
        if booking.user_id != caller_id && !caller_is_admin {
            warn!(
                "User {} attempted to cancel booking {} owned by user {}",
                caller_id, booking_id, booking.user_id
            );
            return Err(AppError::Forbidden);
        }

        // Release the room in the same transaction
        sqlx::query(
            r#"
            UPDATE rooms
            SET is_available = TRUE,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(booking.room_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to release room {}: {}", booking.room_id, e);
            AppError::Database(format!("Failed to release room: {}", e))
        })?;

        // Commit transaction
        tx.commit().await.map_err(|e| {
            error!("Failed to commit transaction: {}", e);
            AppError::Transaction(format!("Failed to commit transaction: {}", e))
        })?;

        self.invalidate_listing().await;

        let booking: Booking = booking.into();

        info!(
            "Cancelled booking {}, room {} released",
            booking.id, booking.room_id
        );

        Ok(booking)
    }

    /// Drop the cached available-rooms listing after a committed mutation
    ///
    /// Cache errors are logged and swallowed; the database already holds the
    /// truth and the listing TTL is the backstop.
    async fn invalidate_listing(&self) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.delete(keys::AVAILABLE_ROOMS_KEY).await {
                warn!("Failed to invalidate available-rooms cache: {}", e);
            } else {
                debug!("Invalidated available-rooms cache");
            }
        }
    }
}

/// Helper struct for booking row mapping
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
            status: BookingStatus::from_str(&row.status).unwrap_or(BookingStatus::Booked),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posada_db::create_pool;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_stay_is_rejected_before_any_io() {
        // Pure validation path; no pool needed
        let day = date(2024, 6, 1);
        assert!(Booking::validate_dates(day, day).is_err());
    }

    async fn ledger() -> (BookingLedger, Arc<PgPool>) {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost/posada_booking".to_string());
        let pool = Arc::new(create_pool(&database_url, Some(5)).await.unwrap());
        (BookingLedger::new(pool.clone(), None), pool)
    }

    fn unique_suffix() -> u128 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    }

    async fn insert_room(pool: &PgPool, number: &str) -> i32 {
        let row: (i32,) = sqlx::query_as(
            "INSERT INTO rooms (room_number, price, is_available) VALUES ($1, 100.00, TRUE) RETURNING id",
        )
        .bind(number)
        .fetch_one(pool)
        .await
        .unwrap();
        row.0
    }

    async fn insert_user(pool: &PgPool, email: &str) -> i32 {
        let row: (i32,) = sqlx::query_as(
            "INSERT INTO users (name, email, password_hash, role, banned) VALUES ('Test', $1, 'x', 'guest', FALSE) RETURNING id",
        )
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap();
        row.0
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn test_create_then_cancel_restores_availability() {
        let (ledger, pool) = ledger().await;
        let suffix = unique_suffix();
        let room_id = insert_room(&pool, &format!("T1-{}", suffix)).await;
        let user_id = insert_user(&pool, &format!("t1-{}@test.local", suffix)).await;

        let booking = ledger
            .create_booking(user_id, room_id, date(2024, 6, 1), date(2024, 6, 3))
            .await
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Booked);

        // Second attempt conflicts while the first booking is active
        let second = ledger
            .create_booking(user_id, room_id, date(2024, 7, 1), date(2024, 7, 2))
            .await;
        assert!(matches!(second, Err(AppError::RoomUnavailable(_))));

        let cancelled = ledger.cancel_booking(booking.id, user_id, false).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        // Cancelling again conflicts
        let again = ledger.cancel_booking(booking.id, user_id, false).await;
        assert!(matches!(again, Err(AppError::BookingAlreadyCancelled(_))));

        // Room is bookable again
        let rebook = ledger
            .create_booking(user_id, room_id, date(2024, 8, 1), date(2024, 8, 2))
            .await
            .unwrap();
        ledger.cancel_booking(rebook.id, user_id, false).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn test_concurrent_bookings_have_one_winner() {
        let (ledger, pool) = ledger().await;
        let ledger = Arc::new(ledger);
        let suffix = unique_suffix();
        let room_id = insert_room(&pool, &format!("T2-{}", suffix)).await;
        let user_id = insert_user(&pool, &format!("t2-{}@test.local", suffix)).await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                ledger
                    .create_booking(user_id, room_id, date(2024, 6, 1), date(2024, 6, 3))
                    .await
            }));
        }

        let mut winners = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => winners += 1,
                Err(AppError::RoomUnavailable(_)) => conflicts += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(conflicts, 7);

        let available: (bool,) = sqlx::query_as("SELECT is_available FROM rooms WHERE id = $1")
            .bind(room_id)
            .fetch_one(&*pool)
            .await
            .unwrap();
        assert!(!available.0);
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn test_cancel_by_stranger_is_forbidden_and_rolls_back() {
        let (ledger, pool) = ledger().await;
        let suffix = unique_suffix();
        let room_id = insert_room(&pool, &format!("T3-{}", suffix)).await;
        let owner = insert_user(&pool, &format!("t3a-{}@test.local", suffix)).await;
        let stranger = insert_user(&pool, &format!("t3b-{}@test.local", suffix)).await;

        let booking = ledger
            .create_booking(owner, room_id, date(2024, 6, 1), date(2024, 6, 3))
            .await
            .unwrap();

        let denied = ledger.cancel_booking(booking.id, stranger, false).await;
        assert!(matches!(denied, Err(AppError::Forbidden)));

        // The rollback left the booking active
        let status: (String,) = sqlx::query_as("SELECT status FROM bookings WHERE id = $1")
            .bind(booking.id)
            .fetch_one(&*pool)
            .await
            .unwrap();
        assert_eq!(status.0, "booked");

        // Admins may cancel on behalf of guests
        ledger.cancel_booking(booking.id, stranger, true).await.unwrap();
    }
}

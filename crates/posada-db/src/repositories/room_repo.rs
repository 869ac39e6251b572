//! Room repository implementation
//!
//! Provides PostgreSQL-backed storage for the room catalog, including
//! attached features and services.
//!
//! Availability is deliberately not mutable through this repository: the
//! `is_available` flips happen only inside booking-ledger transactions so the
//! flag can never drift from the set of active bookings.

use posada_core::{
    models::{Room, RoomFeature, RoomService},
    traits::{Repository, RoomRepository},
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of RoomRepository
pub struct PgRoomRepository {
    pool: PgPool,
}

impl PgRoomRepository {
    /// Create a new room repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Room, i32> for PgRoomRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Room>> {
        debug!("Finding room by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, RoomRow>(
            r#"
            SELECT id, room_number, price, is_available, created_at, updated_at
            FROM rooms
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding room {}: {}", id, e);
            AppError::Database(format!("Failed to find room: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Room>> {
        debug!("Finding all rooms with limit {} offset {}", limit, offset);

        let rows = sqlx::query_as::<sqlx::Postgres, RoomRow>(
            r#"
            SELECT id, room_number, price, is_available, created_at, updated_at
            FROM rooms
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding rooms: {}", e);
            AppError::Database(format!("Failed to fetch rooms: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM rooms")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting rooms: {}", e);
                AppError::Database(format!("Failed to count rooms: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Room) -> AppResult<Room> {
        debug!("Creating room {}", entity.room_number);

        let row = sqlx::query_as::<sqlx::Postgres, RoomRow>(
            r#"
            INSERT INTO rooms (room_number, price, is_available)
            VALUES ($1, $2, TRUE)
            RETURNING id, room_number, price, is_available, created_at, updated_at
            "#,
        )
        .bind(&entity.room_number)
        .bind(entity.price)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("unique constraint") {
                AppError::AlreadyExists(format!("Room number {}", entity.room_number))
            } else {
                error!("Database error creating room: {}", e);
                AppError::Database(format!("Failed to create room: {}", e))
            }
        })?;

        Ok(row.into())
    }
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    #[instrument(skip(self))]
    async fn find_by_number(&self, room_number: &str) -> AppResult<Option<Room>> {
        debug!("Finding room by number: {}", room_number);

        let result = sqlx::query_as::<sqlx::Postgres, RoomRow>(
            r#"
            SELECT id, room_number, price, is_available, created_at, updated_at
            FROM rooms
            WHERE room_number = $1
            "#,
        )
        .bind(room_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding room by number: {}", e);
            AppError::Database(format!("Failed to find room: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn list_available(&self) -> AppResult<Vec<Room>> {
        debug!("Listing available rooms");

        let rows = sqlx::query_as::<sqlx::Postgres, RoomRow>(
            r#"
            SELECT id, room_number, price, is_available, created_at, updated_at
            FROM rooms
            WHERE is_available = TRUE
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing available rooms: {}", e);
            AppError::Database(format!("Failed to list available rooms: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn add_feature(&self, room_id: i32, feature: &str) -> AppResult<RoomFeature> {
        debug!("Adding feature to room {}: {}", room_id, feature);

        let row = sqlx::query_as::<sqlx::Postgres, FeatureRow>(
            r#"
            INSERT INTO room_features (room_id, feature)
            VALUES ($1, $2)
            RETURNING id, room_id, feature
            "#,
        )
        .bind(room_id)
        .bind(feature)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("foreign key constraint") {
                AppError::RoomNotFound(room_id.to_string())
            } else {
                error!("Database error adding feature: {}", e);
                AppError::Database(format!("Failed to add feature: {}", e))
            }
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn add_service(&self, room_id: i32, service: &str) -> AppResult<RoomService> {
        debug!("Adding service to room {}: {}", room_id, service);

        let row = sqlx::query_as::<sqlx::Postgres, ServiceRow>(
            r#"
            INSERT INTO room_services (room_id, service)
            VALUES ($1, $2)
            RETURNING id, room_id, service
            "#,
        )
        .bind(room_id)
        .bind(service)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("foreign key constraint") {
                AppError::RoomNotFound(room_id.to_string())
            } else {
                error!("Database error adding service: {}", e);
                AppError::Database(format!("Failed to add service: {}", e))
            }
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn features_of(&self, room_id: i32) -> AppResult<Vec<RoomFeature>> {
        let rows = sqlx::query_as::<sqlx::Postgres, FeatureRow>(
            r#"
            SELECT id, room_id, feature
            FROM room_features
            WHERE room_id = $1
            ORDER BY id
            "#,
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing features: {}", e);
            AppError::Database(format!("Failed to list features: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn services_of(&self, room_id: i32) -> AppResult<Vec<RoomService>> {
        let rows = sqlx::query_as::<sqlx::Postgres, ServiceRow>(
            r#"
            SELECT id, room_id, service
            FROM room_services
            WHERE room_id = $1
            ORDER BY id
            "#,
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing services: {}", e);
            AppError::Database(format!("Failed to list services: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct RoomRow {
    id: i32,
    room_number: String,
    price: Decimal,
    is_available: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Self {
            id: row.id,
            room_number: row.room_number,
            price: row.price,
            is_available: row.is_available,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FeatureRow {
    id: i32,
    room_id: i32,
    feature: String,
}

impl From<FeatureRow> for RoomFeature {
    fn from(row: FeatureRow) -> Self {
        Self {
            id: row.id,
            room_id: row.room_id,
            feature: row.feature,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ServiceRow {
    id: i32,
    room_id: i32,
    service: String,
}

impl From<ServiceRow> for RoomService {
    fn from(row: ServiceRow) -> Self {
        Self {
            id: row.id,
            room_id: row.room_id,
            service: row.service,
        }
    }
}

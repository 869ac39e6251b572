//! Room catalog service
//!
//! Catalog management and the read path for the availability listing, with
//! cache-aside caching of the listing. Cache failures never fail a request;
//! the database stays the source of truth.

use posada_cache::{keys, RedisCache};
use posada_core::{
    models::{Room, RoomFeature, RoomService},
    traits::{CacheService, Repository, RoomRepository},
    AppResult,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Room catalog service
///
/// Wraps the room repository with listing caching and catalog mutations.
pub struct RoomCatalog<R: RoomRepository> {
    room_repo: Arc<R>,
    cache: Option<Arc<RedisCache>>,
    listing_ttl_secs: u64,
}

impl<R: RoomRepository> RoomCatalog<R> {
    /// Create a new room catalog service
    pub fn new(room_repo: Arc<R>, cache: Option<Arc<RedisCache>>, listing_ttl_secs: u64) -> Self {
        Self {
            room_repo,
            cache,
            listing_ttl_secs,
        }
    }

    /// Create a room in the catalog
    ///
    /// New rooms start available. Duplicate room numbers surface as
    /// `AppError::AlreadyExists` from the repository.
    #[instrument(skip(self))]
    pub async fn add_room(&self, room_number: &str, price: Decimal) -> AppResult<Room> {
        let room = Room {
            room_number: room_number.to_string(),
            price,
            ..Default::default()
        };

        let created = self.room_repo.create(&room).await?;

        // A fresh room belongs in the listing right away
        self.invalidate_listing().await;

        Ok(created)
    }

    /// List rooms currently accepting bookings
    ///
    /// Serves the cached listing when warm, falling back to the database and
    /// repopulating on a miss. A stale entry lives at most `listing_ttl_secs`
    /// and is dropped eagerly by the booking ledger on every mutation.
    #[instrument(skip(self))]
    pub async fn list_available(&self) -> AppResult<Vec<Room>> {
        if let Some(cache) = &self.cache {
            match cache.get::<Vec<Room>>(keys::AVAILABLE_ROOMS_KEY).await {
                Ok(Some(rooms)) => {
                    debug!("Serving available rooms from cache");
                    return Ok(rooms);
                }
                Ok(None) => {}
                Err(e) => {
                    // Degrade to the database on cache trouble
                    warn!("Cache error listing rooms: {}", e);
                }
            }
        }

        let rooms = self.room_repo.list_available().await?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache
                .set(keys::AVAILABLE_ROOMS_KEY, &rooms, self.listing_ttl_secs)
                .await
            {
                warn!("Failed to cache available rooms: {}", e);
            }
        }

        Ok(rooms)
    }

    /// Find a room by id
    #[instrument(skip(self))]
    pub async fn find_room(&self, room_id: i32) -> AppResult<Option<Room>> {
        self.room_repo.find_by_id(room_id).await
    }

    /// Attach a feature to a room
    #[instrument(skip(self))]
    pub async fn add_feature(&self, room_id: i32, feature: &str) -> AppResult<RoomFeature> {
        self.room_repo.add_feature(room_id, feature).await
    }

    /// Attach a service to a room
    #[instrument(skip(self))]
    pub async fn add_service(&self, room_id: i32, service: &str) -> AppResult<RoomService> {
        self.room_repo.add_service(room_id, service).await
    }

    /// List features of a room
    #[instrument(skip(self))]
    pub async fn features_of(&self, room_id: i32) -> AppResult<Vec<RoomFeature>> {
        self.room_repo.features_of(room_id).await
    }

    /// List services of a room
    #[instrument(skip(self))]
    pub async fn services_of(&self, room_id: i32) -> AppResult<Vec<RoomService>> {
        self.room_repo.services_of(room_id).await
    }

    /// Drop the cached listing
    async fn invalidate_listing(&self) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.delete(keys::AVAILABLE_ROOMS_KEY).await {
                warn!("Failed to invalidate available-rooms cache: {}", e);
            }
        }
    }
}

//! Common traits for repositories and services
//!
//! Defines abstractions for database access and business logic.

use crate::error::AppError;
use crate::models::{
    Booking, Invoice, Review, Room, RoomFeature, RoomService, SiteSetting, User,
};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

/// Generic repository trait for CRUD operations
#[async_trait]
pub trait Repository<T, ID>: Send + Sync {
    /// Find entity by ID
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, AppError>;

    /// Find all entities with pagination
    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<T>, AppError>;

    /// Count total entities
    async fn count(&self) -> Result<i64, AppError>;

    /// Create a new entity
    async fn create(&self, entity: &T) -> Result<T, AppError>;
}

/// Room repository trait with specialized methods
#[async_trait]
pub trait RoomRepository: Repository<Room, i32> {
    /// Find room by its unique room number
    async fn find_by_number(&self, room_number: &str) -> Result<Option<Room>, AppError>;

    /// List rooms currently accepting bookings, ordered by id
    async fn list_available(&self) -> Result<Vec<Room>, AppError>;

    /// Attach a feature to a room
    async fn add_feature(&self, room_id: i32, feature: &str) -> Result<RoomFeature, AppError>;

    /// Attach a service to a room
    async fn add_service(&self, room_id: i32, service: &str) -> Result<RoomService, AppError>;

    /// List features of a room
    async fn features_of(&self, room_id: i32) -> Result<Vec<RoomFeature>, AppError>;

    /// List services of a room
    async fn services_of(&self, room_id: i32) -> Result<Vec<RoomService>, AppError>;
}

/// Booking repository trait with specialized methods
///
/// Note the absence of status mutators: the booked→cancelled transition and
/// the paired availability flip live in the booking ledger's transactions,
/// never in standalone repository calls.
#[async_trait]
pub trait BookingRepository: Repository<Booking, i32> {
    /// List bookings placed by a user, newest first
    async fn find_by_user(&self, user_id: i32) -> Result<Vec<Booking>, AppError>;

    /// Find the active booking holding a room, if any
    async fn find_active_by_room(&self, room_id: i32) -> Result<Option<Booking>, AppError>;
}

/// Invoice repository trait with specialized methods
#[async_trait]
pub trait InvoiceRepository: Repository<Invoice, i32> {
    /// Find the invoice for a booking, if generated
    async fn find_by_booking(&self, booking_id: i32) -> Result<Option<Invoice>, AppError>;
}

/// User repository trait with specialized methods
#[async_trait]
pub trait UserRepository: Repository<User, i32> {
    /// Find user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Set or clear the banned flag
    async fn set_banned(&self, id: i32, banned: bool) -> Result<(), AppError>;
}

/// Review repository trait
#[async_trait]
pub trait ReviewRepository: Repository<Review, i32> {
    /// List reviews for a room, newest first
    async fn find_by_room(&self, room_id: i32) -> Result<Vec<Review>, AppError>;
}

/// Site settings repository trait
#[async_trait]
pub trait SiteRepository: Send + Sync {
    /// Load the singleton setting row, creating it active if absent
    async fn load_or_init(&self) -> Result<SiteSetting, AppError>;

    /// Persist the active flag
    async fn set_active(&self, is_active: bool) -> Result<SiteSetting, AppError>;
}

/// Cache service trait
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Get value from cache
    async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError>;

    /// Set value in cache with TTL
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: u64,
    ) -> Result<(), AppError>;

    /// Delete value from cache
    async fn delete(&self, key: &str) -> Result<bool, AppError>;

    /// Check if key exists
    async fn exists(&self, key: &str) -> Result<bool, AppError>;
}

/// Pagination parameters
#[derive(Debug, Clone, Default)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 1000),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(total: i64, page: i64, per_page: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };

        Self {
            total,
            page,
            per_page,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination() {
        let p = Pagination::new(1, 10);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.limit(), 10);

        let p = Pagination::new(3, 20);
        assert_eq!(p.offset(), 40);
        assert_eq!(p.limit(), 20);
    }

    #[test]
    fn test_pagination_bounds() {
        let p = Pagination::new(0, 10); // page 0 becomes 1
        assert_eq!(p.page, 1);

        let p = Pagination::new(1, 2000); // per_page capped at 1000
        assert_eq!(p.per_page, 1000);
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(95, 1, 10);
        assert_eq!(meta.total_pages, 10);

        let meta = PaginationMeta::new(100, 1, 10);
        assert_eq!(meta.total_pages, 10);

        let meta = PaginationMeta::new(101, 1, 10);
        assert_eq!(meta.total_pages, 11);
    }
}

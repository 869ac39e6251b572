//! Site settings repository implementation
//!
//! Backs the maintenance toggle with a singleton row so the choice survives
//! restarts. The live flag served per request is the in-memory handle loaded
//! from here at startup, not a per-request query.

use posada_core::{models::SiteSetting, traits::SiteRepository, AppError, AppResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of SiteRepository
pub struct PgSiteRepository {
    pool: PgPool,
}

impl PgSiteRepository {
    /// Create a new site settings repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SiteRepository for PgSiteRepository {
    #[instrument(skip(self))]
    async fn load_or_init(&self) -> AppResult<SiteSetting> {
        debug!("Loading site setting");

        let existing = sqlx::query_as::<sqlx::Postgres, SiteRow>(
            r#"
            SELECT id, is_active, updated_at
            FROM site_settings
            ORDER BY id
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error loading site setting: {}", e);
            AppError::Database(format!("Failed to load site setting: {}", e))
        })?;

        if let Some(row) = existing {
            return Ok(row.into());
        }

        let row = sqlx::query_as::<sqlx::Postgres, SiteRow>(
            r#"
            INSERT INTO site_settings (is_active)
            VALUES (TRUE)
            RETURNING id, is_active, updated_at
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error initializing site setting: {}", e);
            AppError::Database(format!("Failed to initialize site setting: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn set_active(&self, is_active: bool) -> AppResult<SiteSetting> {
        debug!("Setting site active = {}", is_active);

        // Ensure the singleton row exists before flipping it
        self.load_or_init().await?;

        let row = sqlx::query_as::<sqlx::Postgres, SiteRow>(
            r#"
            UPDATE site_settings
            SET is_active = $1,
                updated_at = NOW()
            WHERE id = (SELECT id FROM site_settings ORDER BY id LIMIT 1)
            RETURNING id, is_active, updated_at
            "#,
        )
        .bind(is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating site setting: {}", e);
            AppError::Database(format!("Failed to update site setting: {}", e))
        })?;

        Ok(row.into())
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct SiteRow {
    id: i32,
    is_active: bool,
    updated_at: DateTime<Utc>,
}

impl From<SiteRow> for SiteSetting {
    fn from(row: SiteRow) -> Self {
        Self {
            id: row.id,
            is_active: row.is_active,
            updated_at: row.updated_at,
        }
    }
}

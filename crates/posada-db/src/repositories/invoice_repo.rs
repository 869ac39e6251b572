//! Invoice repository implementation
//!
//! Provides PostgreSQL-backed storage for invoices. The unique index on
//! `booking_id` carries the one-invoice-per-booking invariant; creation goes
//! through the invoice generator service which turns the conflict into a
//! stable error.

use posada_core::{
    models::{Invoice, InvoiceStatus},
    traits::{InvoiceRepository, Repository},
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of InvoiceRepository
pub struct PgInvoiceRepository {
    pool: PgPool,
}

impl PgInvoiceRepository {
    /// Create a new invoice repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Parse invoice status from string
    fn parse_status(s: &str) -> InvoiceStatus {
        InvoiceStatus::from_str(s).unwrap_or(InvoiceStatus::Paid)
    }
}

#[async_trait]
impl Repository<Invoice, i32> for PgInvoiceRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Invoice>> {
        debug!("Finding invoice by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, InvoiceRow>(
            r#"
            SELECT id, booking_id, amount, status, created_at
            FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding invoice {}: {}", id, e);
            AppError::Database(format!("Failed to find invoice: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Invoice>> {
        debug!(
            "Finding all invoices with limit {} offset {}",
            limit, offset
        );

        let rows = sqlx::query_as::<sqlx::Postgres, InvoiceRow>(
            r#"
            SELECT id, booking_id, amount, status, created_at
            FROM invoices
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding invoices: {}", e);
            AppError::Database(format!("Failed to fetch invoices: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting invoices: {}", e);
                AppError::Database(format!("Failed to count invoices: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Invoice) -> AppResult<Invoice> {
        debug!("Creating invoice for booking {}", entity.booking_id);

        let row = sqlx::query_as::<sqlx::Postgres, InvoiceRow>(
            r#"
            INSERT INTO invoices (booking_id, amount, status)
            VALUES ($1, $2, $3)
            RETURNING id, booking_id, amount, status, created_at
            "#,
        )
        .bind(entity.booking_id)
        .bind(entity.amount)
        .bind(entity.status.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("unique constraint") {
                AppError::InvoiceExists(entity.booking_id.to_string())
            } else {
                error!("Database error creating invoice: {}", e);
                AppError::Database(format!("Failed to create invoice: {}", e))
            }
        })?;

        Ok(row.into())
    }
}

#[async_trait]
impl InvoiceRepository for PgInvoiceRepository {
    #[instrument(skip(self))]
    async fn find_by_booking(&self, booking_id: i32) -> AppResult<Option<Invoice>> {
        debug!("Finding invoice for booking: {}", booking_id);

        let result = sqlx::query_as::<sqlx::Postgres, InvoiceRow>(
            r#"
            SELECT id, booking_id, amount, status, created_at
            FROM invoices
            WHERE booking_id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding invoice by booking: {}", e);
            AppError::Database(format!("Failed to find invoice: {}", e))
        })?;

        Ok(result.map(Into::into))
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct InvoiceRow {
    id: i32,
    booking_id: i32,
    amount: Decimal,
    status: String,
    created_at: DateTime<Utc>,
}

impl From<InvoiceRow> for Invoice {
    fn from(row: InvoiceRow) -> Self {
        Self {
            id: row.id,
            booking_id: row.booking_id,
            amount: row.amount,
            status: PgInvoiceRepository::parse_status(&row.status),
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(
            PgInvoiceRepository::parse_status("paid"),
            InvoiceStatus::Paid
        );
        assert_eq!(
            PgInvoiceRepository::parse_status("unknown"),
            InvoiceStatus::Paid
        );
    }
}

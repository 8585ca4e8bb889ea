//! Quote request repository.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use dandeline_core::{QuoteRequestId, QuoteServiceType, QuoteStatus};

use super::{Repository, RepositoryError, not_found};
use crate::models::{NewQuoteRequest, QuoteRequest, UpdateQuoteRequest};

const COLUMNS: &str = "id, name, email, phone_number, service_type, event_date, \
     event_location, guest_count, budget, description, status, notes, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct QuoteRequestRow {
    id: i32,
    name: String,
    email: String,
    phone_number: Option<String>,
    service_type: QuoteServiceType,
    event_date: Option<NaiveDate>,
    event_location: Option<String>,
    guest_count: Option<i32>,
    budget: Option<Decimal>,
    description: String,
    status: QuoteStatus,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<QuoteRequestRow> for QuoteRequest {
    fn from(row: QuoteRequestRow) -> Self {
        Self {
            id: QuoteRequestId::new(row.id),
            name: row.name,
            email: row.email,
            phone_number: row.phone_number,
            service_type: row.service_type,
            event_date: row.event_date,
            event_location: row.event_location,
            guest_count: row.guest_count,
            budget: row.budget,
            description: row.description,
            status: row.status,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for quote request database operations.
pub struct QuoteRequestRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> QuoteRequestRepository<'a> {
    /// Create a new quote request repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Live quote request count (admin dashboard).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM quote_requests WHERE deleted_at IS NULL")
                .fetch_one(self.pool)
                .await?;
        Ok(count)
    }
}

impl Repository for QuoteRequestRepository<'_> {
    type Id = QuoteRequestId;
    type Entity = QuoteRequest;
    type NewEntity = NewQuoteRequest;
    type UpdateEntity = UpdateQuoteRequest;

    async fn find_by_id(&self, id: QuoteRequestId) -> Result<QuoteRequest, RepositoryError> {
        let row = sqlx::query_as::<_, QuoteRequestRow>(&format!(
            "SELECT {COLUMNS} FROM quote_requests WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    async fn store(&self, fields: NewQuoteRequest) -> Result<QuoteRequest, RepositoryError> {
        let row = sqlx::query_as::<_, QuoteRequestRow>(&format!(
            "INSERT INTO quote_requests (name, email, phone_number, service_type, event_date, \
             event_location, guest_count, budget, description, status, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        ))
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.phone_number)
        .bind(fields.service_type)
        .bind(fields.event_date)
        .bind(&fields.event_location)
        .bind(fields.guest_count)
        .bind(fields.budget)
        .bind(&fields.description)
        .bind(fields.status)
        .bind(&fields.notes)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(
        &self,
        fields: UpdateQuoteRequest,
        entity: &QuoteRequest,
    ) -> Result<QuoteRequest, RepositoryError> {
        let row = sqlx::query_as::<_, QuoteRequestRow>(&format!(
            "UPDATE quote_requests SET \
             name = COALESCE($2, name), \
             email = COALESCE($3, email), \
             phone_number = COALESCE($4, phone_number), \
             service_type = COALESCE($5, service_type), \
             event_date = COALESCE($6, event_date), \
             event_location = COALESCE($7, event_location), \
             guest_count = COALESCE($8, guest_count), \
             budget = COALESCE($9, budget), \
             description = COALESCE($10, description), \
             status = COALESCE($11, status), \
             notes = COALESCE($12, notes), \
             updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        ))
        .bind(entity.id.as_i32())
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.phone_number)
        .bind(fields.service_type)
        .bind(fields.event_date)
        .bind(&fields.event_location)
        .bind(fields.guest_count)
        .bind(fields.budget)
        .bind(&fields.description)
        .bind(fields.status)
        .bind(&fields.notes)
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    async fn delete(&self, entity: &QuoteRequest) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE quote_requests SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(entity.id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn all(&self) -> Result<Vec<QuoteRequest>, RepositoryError> {
        let rows = sqlx::query_as::<_, QuoteRequestRow>(&format!(
            "SELECT {COLUMNS} FROM quote_requests WHERE deleted_at IS NULL ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(QuoteRequest::from).collect())
    }
}

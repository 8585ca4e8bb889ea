//! Lead repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use dandeline_core::{LeadId, LeadSource, LeadStatus};

use super::{Repository, RepositoryError, not_found};
use crate::models::{Lead, NewLead, UpdateLead};

const COLUMNS: &str =
    "id, name, email, phone_number, company, status, source, notes, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct LeadRow {
    id: i32,
    name: String,
    email: String,
    phone_number: Option<String>,
    company: Option<String>,
    status: LeadStatus,
    source: Option<LeadSource>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LeadRow> for Lead {
    fn from(row: LeadRow) -> Self {
        Self {
            id: LeadId::new(row.id),
            name: row.name,
            email: row.email,
            phone_number: row.phone_number,
            company: row.company,
            status: row.status,
            source: row.source,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for lead database operations.
pub struct LeadRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LeadRepository<'a> {
    /// Create a new lead repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Live lead count (admin dashboard).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM leads WHERE deleted_at IS NULL")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

impl Repository for LeadRepository<'_> {
    type Id = LeadId;
    type Entity = Lead;
    type NewEntity = NewLead;
    type UpdateEntity = UpdateLead;

    async fn find_by_id(&self, id: LeadId) -> Result<Lead, RepositoryError> {
        let row = sqlx::query_as::<_, LeadRow>(&format!(
            "SELECT {COLUMNS} FROM leads WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    async fn store(&self, fields: NewLead) -> Result<Lead, RepositoryError> {
        let row = sqlx::query_as::<_, LeadRow>(&format!(
            "INSERT INTO leads (name, email, phone_number, company, status, source, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {COLUMNS}"
        ))
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.phone_number)
        .bind(&fields.company)
        .bind(fields.status)
        .bind(fields.source)
        .bind(&fields.notes)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, fields: UpdateLead, entity: &Lead) -> Result<Lead, RepositoryError> {
        let row = sqlx::query_as::<_, LeadRow>(&format!(
            "UPDATE leads SET \
             name = COALESCE($2, name), \
             email = COALESCE($3, email), \
             phone_number = COALESCE($4, phone_number), \
             company = COALESCE($5, company), \
             status = COALESCE($6, status), \
             source = COALESCE($7, source), \
             notes = COALESCE($8, notes), \
             updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        ))
        .bind(entity.id.as_i32())
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.phone_number)
        .bind(&fields.company)
        .bind(fields.status)
        .bind(fields.source)
        .bind(&fields.notes)
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    async fn delete(&self, entity: &Lead) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("UPDATE leads SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(entity.id.as_i32())
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn all(&self) -> Result<Vec<Lead>, RepositoryError> {
        let rows = sqlx::query_as::<_, LeadRow>(&format!(
            "SELECT {COLUMNS} FROM leads WHERE deleted_at IS NULL ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Lead::from).collect())
    }
}

//! Contact message repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use dandeline_core::ContactMessageId;

use super::{Repository, RepositoryError, not_found};
use crate::models::{ContactMessage, NewContactMessage, UpdateContactMessage};

const COLUMNS: &str = "id, name, business_name, email, phone_number, subject, message, \
     is_read, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct ContactMessageRow {
    id: i32,
    name: String,
    business_name: Option<String>,
    email: String,
    phone_number: Option<String>,
    subject: Option<String>,
    message: String,
    is_read: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ContactMessageRow> for ContactMessage {
    fn from(row: ContactMessageRow) -> Self {
        Self {
            id: ContactMessageId::new(row.id),
            name: row.name,
            business_name: row.business_name,
            email: row.email,
            phone_number: row.phone_number,
            subject: row.subject,
            message: row.message,
            is_read: row.is_read,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for contact message database operations.
pub struct ContactMessageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContactMessageRepository<'a> {
    /// Create a new contact message repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Unread message count (admin dashboard).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_unread(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM contact_messages WHERE is_read = FALSE AND deleted_at IS NULL",
        )
        .fetch_one(self.pool)
        .await?;
        Ok(count)
    }
}

impl Repository for ContactMessageRepository<'_> {
    type Id = ContactMessageId;
    type Entity = ContactMessage;
    type NewEntity = NewContactMessage;
    type UpdateEntity = UpdateContactMessage;

    async fn find_by_id(&self, id: ContactMessageId) -> Result<ContactMessage, RepositoryError> {
        let row = sqlx::query_as::<_, ContactMessageRow>(&format!(
            "SELECT {COLUMNS} FROM contact_messages WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    async fn store(&self, fields: NewContactMessage) -> Result<ContactMessage, RepositoryError> {
        let row = sqlx::query_as::<_, ContactMessageRow>(&format!(
            "INSERT INTO contact_messages (name, business_name, email, phone_number, subject, message) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"
        ))
        .bind(&fields.name)
        .bind(&fields.business_name)
        .bind(&fields.email)
        .bind(&fields.phone_number)
        .bind(&fields.subject)
        .bind(&fields.message)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(
        &self,
        fields: UpdateContactMessage,
        entity: &ContactMessage,
    ) -> Result<ContactMessage, RepositoryError> {
        let row = sqlx::query_as::<_, ContactMessageRow>(&format!(
            "UPDATE contact_messages SET \
             is_read = COALESCE($2, is_read), \
             subject = COALESCE($3, subject), \
             message = COALESCE($4, message), \
             updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        ))
        .bind(entity.id.as_i32())
        .bind(fields.is_read)
        .bind(&fields.subject)
        .bind(&fields.message)
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    async fn delete(&self, entity: &ContactMessage) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE contact_messages SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(entity.id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn all(&self) -> Result<Vec<ContactMessage>, RepositoryError> {
        let rows = sqlx::query_as::<_, ContactMessageRow>(&format!(
            "SELECT {COLUMNS} FROM contact_messages WHERE deleted_at IS NULL ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ContactMessage::from).collect())
    }
}

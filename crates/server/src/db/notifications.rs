//! Notification repository.
//!
//! Notifications are hard-deleted; there is no tombstone column and no
//! update record beyond the read flags.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use dandeline_core::{NotificationId, NotificationType};

use super::{RepositoryError, not_found};
use crate::models::{NewNotification, Notification};

const COLUMNS: &str =
    "id, kind, title, message, action_url, action_text, is_read, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct NotificationRow {
    id: i32,
    kind: NotificationType,
    title: String,
    message: String,
    action_url: Option<String>,
    action_text: Option<String>,
    is_read: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: NotificationId::new(row.id),
            kind: row.kind,
            title: row.title,
            message: row.message,
            action_url: row.action_url,
            action_text: row.action_text,
            is_read: row.is_read,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for notification database operations.
pub struct NotificationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NotificationRepository<'a> {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch one notification by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when no row has that id.
    pub async fn find_by_id(&self, id: NotificationId) -> Result<Notification, RepositoryError> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {COLUMNS} FROM notifications WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    /// Insert a new notification.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn store(&self, fields: NewNotification) -> Result<Notification, RepositoryError> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            "INSERT INTO notifications (kind, title, message, action_url, action_text) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        ))
        .bind(fields.kind)
        .bind(&fields.title)
        .bind(&fields.message)
        .bind(&fields.action_url)
        .bind(&fields.action_text)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// List unread notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_unread(&self) -> Result<Vec<Notification>, RepositoryError> {
        let rows = sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {COLUMNS} FROM notifications WHERE is_read = FALSE ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Notification::from).collect())
    }

    /// Mark one notification as read.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when no row has that id.
    pub async fn mark_read(&self, id: NotificationId) -> Result<Notification, RepositoryError> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            "UPDATE notifications SET is_read = TRUE, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    /// Mark every unread notification as read. Returns how many changed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn mark_all_read(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, updated_at = NOW() WHERE is_read = FALSE",
        )
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete a notification permanently.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn delete(&self, id: NotificationId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

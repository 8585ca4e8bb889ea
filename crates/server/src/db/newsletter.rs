//! Newsletter subscriber and template repositories.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use dandeline_core::{NewsletterSubscriberId, NewsletterTemplateId, SubscriberStatus, TemplateStatus};

use super::{Repository, RepositoryError, not_found};
use crate::models::{
    NewNewsletterSubscriber, NewNewsletterTemplate, NewsletterSubscriber, NewsletterTemplate,
    UpdateNewsletterSubscriber, UpdateNewsletterTemplate,
};

// =============================================================================
// Subscribers
// =============================================================================

const SUBSCRIBER_COLUMNS: &str = "id, email, first_name, last_name, status, subscribed_at, \
     unsubscribed_at, source, preferences, tags, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct SubscriberRow {
    id: i32,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
    status: SubscriberStatus,
    subscribed_at: Option<DateTime<Utc>>,
    unsubscribed_at: Option<DateTime<Utc>>,
    source: Option<String>,
    preferences: Option<serde_json::Value>,
    tags: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SubscriberRow> for NewsletterSubscriber {
    fn from(row: SubscriberRow) -> Self {
        Self {
            id: NewsletterSubscriberId::new(row.id),
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            status: row.status,
            subscribed_at: row.subscribed_at,
            unsubscribed_at: row.unsubscribed_at,
            source: row.source,
            preferences: row.preferences,
            tags: row.tags,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for newsletter subscriber database operations.
pub struct NewsletterSubscriberRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NewsletterSubscriberRepository<'a> {
    /// Create a new subscriber repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find a subscriber by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<NewsletterSubscriber>, RepositoryError> {
        let row = sqlx::query_as::<_, SubscriberRow>(&format!(
            "SELECT {SUBSCRIBER_COLUMNS} FROM newsletter_subscribers \
             WHERE email = $1 AND deleted_at IS NULL"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(NewsletterSubscriber::from))
    }

    /// Active subscriber count (admin dashboard).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_active(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM newsletter_subscribers \
             WHERE status = 'active' AND deleted_at IS NULL",
        )
        .fetch_one(self.pool)
        .await?;
        Ok(count)
    }
}

impl Repository for NewsletterSubscriberRepository<'_> {
    type Id = NewsletterSubscriberId;
    type Entity = NewsletterSubscriber;
    type NewEntity = NewNewsletterSubscriber;
    type UpdateEntity = UpdateNewsletterSubscriber;

    async fn find_by_id(
        &self,
        id: NewsletterSubscriberId,
    ) -> Result<NewsletterSubscriber, RepositoryError> {
        let row = sqlx::query_as::<_, SubscriberRow>(&format!(
            "SELECT {SUBSCRIBER_COLUMNS} FROM newsletter_subscribers \
             WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    async fn store(
        &self,
        fields: NewNewsletterSubscriber,
    ) -> Result<NewsletterSubscriber, RepositoryError> {
        let row = sqlx::query_as::<_, SubscriberRow>(&format!(
            "INSERT INTO newsletter_subscribers (email, first_name, last_name, status, \
             subscribed_at, source, preferences, tags) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {SUBSCRIBER_COLUMNS}"
        ))
        .bind(&fields.email)
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(fields.status)
        .bind(fields.subscribed_at)
        .bind(&fields.source)
        .bind(&fields.preferences)
        .bind(&fields.tags)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(
        &self,
        fields: UpdateNewsletterSubscriber,
        entity: &NewsletterSubscriber,
    ) -> Result<NewsletterSubscriber, RepositoryError> {
        let row = sqlx::query_as::<_, SubscriberRow>(&format!(
            "UPDATE newsletter_subscribers SET \
             email = COALESCE($2, email), \
             first_name = COALESCE($3, first_name), \
             last_name = COALESCE($4, last_name), \
             status = COALESCE($5, status), \
             subscribed_at = COALESCE($6, subscribed_at), \
             unsubscribed_at = COALESCE($7, unsubscribed_at), \
             source = COALESCE($8, source), \
             preferences = COALESCE($9, preferences), \
             tags = COALESCE($10, tags), \
             updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {SUBSCRIBER_COLUMNS}"
        ))
        .bind(entity.id.as_i32())
        .bind(&fields.email)
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(fields.status)
        .bind(fields.subscribed_at)
        .bind(fields.unsubscribed_at)
        .bind(&fields.source)
        .bind(&fields.preferences)
        .bind(&fields.tags)
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    async fn delete(&self, entity: &NewsletterSubscriber) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE newsletter_subscribers SET deleted_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(entity.id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn all(&self) -> Result<Vec<NewsletterSubscriber>, RepositoryError> {
        let rows = sqlx::query_as::<_, SubscriberRow>(&format!(
            "SELECT {SUBSCRIBER_COLUMNS} FROM newsletter_subscribers \
             WHERE deleted_at IS NULL ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(NewsletterSubscriber::from).collect())
    }
}

// =============================================================================
// Templates
// =============================================================================

const TEMPLATE_COLUMNS: &str = "id, name, subject, content, preview_text, status, \
     scheduled_at, sent_at, recipients_count, opens_count, clicks_count, tags, metadata, \
     created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct TemplateRow {
    id: i32,
    name: String,
    subject: String,
    content: String,
    preview_text: Option<String>,
    status: TemplateStatus,
    scheduled_at: Option<DateTime<Utc>>,
    sent_at: Option<DateTime<Utc>>,
    recipients_count: i32,
    opens_count: i32,
    clicks_count: i32,
    tags: Option<serde_json::Value>,
    metadata: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TemplateRow> for NewsletterTemplate {
    fn from(row: TemplateRow) -> Self {
        Self {
            id: NewsletterTemplateId::new(row.id),
            name: row.name,
            subject: row.subject,
            content: row.content,
            preview_text: row.preview_text,
            status: row.status,
            scheduled_at: row.scheduled_at,
            sent_at: row.sent_at,
            recipients_count: row.recipients_count,
            opens_count: row.opens_count,
            clicks_count: row.clicks_count,
            tags: row.tags,
            metadata: row.metadata,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for newsletter template database operations.
pub struct NewsletterTemplateRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NewsletterTemplateRepository<'a> {
    /// Create a new template repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl Repository for NewsletterTemplateRepository<'_> {
    type Id = NewsletterTemplateId;
    type Entity = NewsletterTemplate;
    type NewEntity = NewNewsletterTemplate;
    type UpdateEntity = UpdateNewsletterTemplate;

    async fn find_by_id(
        &self,
        id: NewsletterTemplateId,
    ) -> Result<NewsletterTemplate, RepositoryError> {
        let row = sqlx::query_as::<_, TemplateRow>(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM newsletter_templates \
             WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    async fn store(
        &self,
        fields: NewNewsletterTemplate,
    ) -> Result<NewsletterTemplate, RepositoryError> {
        let row = sqlx::query_as::<_, TemplateRow>(&format!(
            "INSERT INTO newsletter_templates (name, subject, content, preview_text, status, \
             scheduled_at, tags, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {TEMPLATE_COLUMNS}"
        ))
        .bind(&fields.name)
        .bind(&fields.subject)
        .bind(&fields.content)
        .bind(&fields.preview_text)
        .bind(fields.status)
        .bind(fields.scheduled_at)
        .bind(&fields.tags)
        .bind(&fields.metadata)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(
        &self,
        fields: UpdateNewsletterTemplate,
        entity: &NewsletterTemplate,
    ) -> Result<NewsletterTemplate, RepositoryError> {
        let row = sqlx::query_as::<_, TemplateRow>(&format!(
            "UPDATE newsletter_templates SET \
             name = COALESCE($2, name), \
             subject = COALESCE($3, subject), \
             content = COALESCE($4, content), \
             preview_text = COALESCE($5, preview_text), \
             status = COALESCE($6, status), \
             scheduled_at = COALESCE($7, scheduled_at), \
             sent_at = COALESCE($8, sent_at), \
             recipients_count = COALESCE($9, recipients_count), \
             opens_count = COALESCE($10, opens_count), \
             clicks_count = COALESCE($11, clicks_count), \
             tags = COALESCE($12, tags), \
             metadata = COALESCE($13, metadata), \
             updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {TEMPLATE_COLUMNS}"
        ))
        .bind(entity.id.as_i32())
        .bind(&fields.name)
        .bind(&fields.subject)
        .bind(&fields.content)
        .bind(&fields.preview_text)
        .bind(fields.status)
        .bind(fields.scheduled_at)
        .bind(fields.sent_at)
        .bind(fields.recipients_count)
        .bind(fields.opens_count)
        .bind(fields.clicks_count)
        .bind(&fields.tags)
        .bind(&fields.metadata)
        .fetch_one(self.pool)
        .await
        .map_err(not_found)?;

        Ok(row.into())
    }

    async fn delete(&self, entity: &NewsletterTemplate) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE newsletter_templates SET deleted_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(entity.id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn all(&self) -> Result<Vec<NewsletterTemplate>, RepositoryError> {
        let rows = sqlx::query_as::<_, TemplateRow>(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM newsletter_templates \
             WHERE deleted_at IS NULL ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(NewsletterTemplate::from).collect())
    }
}

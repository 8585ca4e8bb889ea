//! Database operations against `PostgreSQL`.
//!
//! One repository per entity, each binding the uniform [`Repository`]
//! contract to hand-written SQL. Row structs stay private to their module;
//! everything crossing the boundary is a domain model from [`crate::models`].
//!
//! # Soft deletes
//!
//! Soft-deletable tables carry a `deleted_at` column. Default reads filter
//! `deleted_at IS NULL`; `delete` stamps the column instead of removing the
//! row. Line items and notifications are the exceptions (hard rows).
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p dandeline-cli -- migrate
//! ```

pub mod blog_posts;
pub mod categories;
pub mod contact_messages;
pub mod leads;
pub mod line_items;
pub mod newsletter;
pub mod notifications;
pub mod orders;
pub mod prices;
pub mod products;
pub mod quote_requests;
pub mod testimonials;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use blog_posts::BlogPostRepository;
pub use categories::CategoryRepository;
pub use contact_messages::ContactMessageRepository;
pub use leads::LeadRepository;
pub use line_items::LineItemRepository;
pub use newsletter::{NewsletterSubscriberRepository, NewsletterTemplateRepository};
pub use notifications::NotificationRepository;
pub use orders::OrderRepository;
pub use prices::PriceRepository;
pub use products::ProductRepository;
pub use quote_requests::QuoteRequestRepository;
pub use testimonials::TestimonialRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Uniform persistence contract, one implementation per entity.
///
/// `update` takes the full set of optional fields and the current entity,
/// applies the provided fields, and returns the refreshed row. `delete`
/// tombstones soft-deletable entities and reports whether a row was
/// affected.
#[allow(async_fn_in_trait)]
pub trait Repository {
    type Id: Copy + Send;
    type Entity: Send;
    type NewEntity: Send;
    type UpdateEntity: Send;

    /// Fetch one entity by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when no live row has that id.
    async fn find_by_id(&self, id: Self::Id) -> Result<Self::Entity, RepositoryError>;

    /// Insert a new row and return it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    async fn store(&self, fields: Self::NewEntity) -> Result<Self::Entity, RepositoryError>;

    /// Apply a partial update and return the refreshed row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the row vanished underneath us.
    async fn update(
        &self,
        fields: Self::UpdateEntity,
        entity: &Self::Entity,
    ) -> Result<Self::Entity, RepositoryError>;

    /// Delete (or tombstone) the entity. Returns whether a row was affected.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    async fn delete(&self, entity: &Self::Entity) -> Result<bool, RepositoryError>;

    /// List all live rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn all(&self) -> Result<Vec<Self::Entity>, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map `sqlx::Error::RowNotFound` to `RepositoryError::NotFound`.
///
/// `fetch_one` is used where a row is expected; this keeps the distinction
/// between "no such entity" and a real database failure.
pub(crate) fn not_found(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        other => RepositoryError::Database(other),
    }
}

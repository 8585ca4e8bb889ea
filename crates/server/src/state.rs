//! Application state shared across handlers.

use std::sync::Arc;

use lettre::transport::smtp::Error as SmtpError;
use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::services::{EmailService, EventDispatcher};
use crate::stripe::StripeClient;
use crate::usps::TrackingClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; provides access to the database pool,
/// configuration, integration clients, and the event dispatcher.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    stripe: StripeClient,
    tracking: TrackingClient,
    dispatcher: EventDispatcher,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP relay cannot be configured.
    pub fn new(config: ServerConfig, pool: PgPool) -> Result<Self, SmtpError> {
        let stripe = StripeClient::new(&config.stripe);
        let tracking = TrackingClient::new(&config.usps, config.env);
        let mailer = EmailService::new(&config.email)?;
        let dispatcher = EventDispatcher::new(pool.clone(), Some(mailer));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                stripe,
                tracking,
                dispatcher,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the Stripe API client.
    #[must_use]
    pub fn stripe(&self) -> &StripeClient {
        &self.inner.stripe
    }

    /// Get a reference to the USPS tracking client.
    #[must_use]
    pub fn tracking(&self) -> &TrackingClient {
        &self.inner.tracking
    }

    /// Get a reference to the domain event dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.inner.dispatcher
    }
}

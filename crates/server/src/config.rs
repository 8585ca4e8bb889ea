//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - `BASE_URL` - Public URL of the site (checkout callbacks derive from it)
//! - `STRIPE_SECRET_KEY` - Stripe API secret key
//! - `SMTP_HOST` - SMTP server hostname
//! - `SMTP_USERNAME` - SMTP authentication username
//! - `SMTP_PASSWORD` - SMTP authentication password
//! - `SMTP_FROM` - Email sender address
//!
//! ## Optional
//! - `HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Listen port (default: 3000)
//! - `APP_ENV` - `production`, `staging`, or `local` (default: local)
//! - `SMTP_PORT` - SMTP port (default: 587)
//! - `USPS_ENABLED` - Enable live USPS tracking lookups (default: false)
//! - `USPS_BASE_URL` - USPS API base URL (default: <https://api.usps.com>)
//! - `USPS_CONSUMER_KEY` / `USPS_CONSUMER_SECRET` - USPS API credentials
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sentry rates

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Local,
    Staging,
    Production,
}

impl AppEnv {
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the site
    pub base_url: String,
    /// Deployment environment
    pub env: AppEnv,
    /// Stripe API configuration
    pub stripe: StripeConfig,
    /// USPS tracking configuration
    pub usps: UspsConfig,
    /// Email configuration
    pub email: EmailConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Stripe API configuration.
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Stripe secret key (sk_live_... / sk_test_...)
    pub secret_key: SecretString,
}

/// USPS tracking API configuration.
///
/// When `enabled` is false (or the environment is not production), tracking
/// lookups return a fixed mock payload instead of calling the API.
#[derive(Debug, Clone)]
pub struct UspsConfig {
    pub enabled: bool,
    pub base_url: String,
    pub consumer_key: Option<SecretString>,
    pub consumer_secret: Option<SecretString>,
}

/// SMTP email configuration.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: SecretString,
    pub from_address: String,
}

impl ServerConfig {
    /// Load the configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = require("DATABASE_URL")?;
        let base_url = require("BASE_URL")?;

        let host = optional("HOST")
            .unwrap_or_else(|| "127.0.0.1".to_string())
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".into(), e.to_string()))?;

        let port = optional("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".into(), e.to_string()))?;

        let env = match optional("APP_ENV").as_deref() {
            Some("production") => AppEnv::Production,
            Some("staging") => AppEnv::Staging,
            Some("local") | None => AppEnv::Local,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "APP_ENV".into(),
                    format!("unknown environment: {other}"),
                ));
            }
        };

        let stripe = StripeConfig {
            secret_key: SecretString::from(require("STRIPE_SECRET_KEY")?),
        };

        let usps = UspsConfig {
            enabled: optional("USPS_ENABLED").as_deref() == Some("true"),
            base_url: optional("USPS_BASE_URL")
                .unwrap_or_else(|| "https://api.usps.com".to_string()),
            consumer_key: optional("USPS_CONSUMER_KEY").map(SecretString::from),
            consumer_secret: optional("USPS_CONSUMER_SECRET").map(SecretString::from),
        };

        let email = EmailConfig {
            smtp_host: require("SMTP_HOST")?,
            smtp_port: optional("SMTP_PORT")
                .unwrap_or_else(|| "587".to_string())
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidEnvVar("SMTP_PORT".into(), e.to_string()))?,
            smtp_username: require("SMTP_USERNAME")?,
            smtp_password: SecretString::from(require("SMTP_PASSWORD")?),
            from_address: require("SMTP_FROM")?,
        };

        let sentry_sample_rate = optional("SENTRY_SAMPLE_RATE")
            .map_or(Ok(1.0), |v| {
                v.parse::<f32>()
                    .map_err(|e| ConfigError::InvalidEnvVar("SENTRY_SAMPLE_RATE".into(), e.to_string()))
            })?;

        let sentry_traces_sample_rate = optional("SENTRY_TRACES_SAMPLE_RATE")
            .map_or(Ok(0.1), |v| {
                v.parse::<f32>().map_err(|e| {
                    ConfigError::InvalidEnvVar("SENTRY_TRACES_SAMPLE_RATE".into(), e.to_string())
                })
            })?;

        Ok(Self {
            database_url: SecretString::from(database_url),
            host,
            port,
            base_url,
            env,
            stripe,
            usps,
            email,
            sentry_dsn: optional("SENTRY_DSN"),
            sentry_environment: optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// The socket address to bind the server to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Checkout success callback URL with the session-id placeholder Stripe
    /// substitutes at redirect time.
    #[must_use]
    pub fn checkout_success_url(&self) -> String {
        format!(
            "{}/checkout/success?session_id={{CHECKOUT_SESSION_ID}}",
            self.base_url.trim_end_matches('/')
        )
    }

    /// Checkout cancel callback URL (back to the storefront).
    #[must_use]
    pub fn checkout_cancel_url(&self) -> String {
        self.base_url.trim_end_matches('/').to_string()
    }
}

fn require(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_urls() {
        let config = ServerConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().expect("valid ip"),
            port: 3000,
            base_url: "https://dandelinedesigns.com/".to_string(),
            env: AppEnv::Local,
            stripe: StripeConfig {
                secret_key: SecretString::from("sk_test_xxx"),
            },
            usps: UspsConfig {
                enabled: false,
                base_url: "https://api.usps.com".to_string(),
                consumer_key: None,
                consumer_secret: None,
            },
            email: EmailConfig {
                smtp_host: "smtp.example.com".to_string(),
                smtp_port: 587,
                smtp_username: "user".to_string(),
                smtp_password: SecretString::from("pass"),
                from_address: "hello@dandelinedesigns.com".to_string(),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        };

        assert_eq!(
            config.checkout_success_url(),
            "https://dandelinedesigns.com/checkout/success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(config.checkout_cancel_url(), "https://dandelinedesigns.com");
    }

    #[test]
    fn test_app_env() {
        assert!(AppEnv::Production.is_production());
        assert!(!AppEnv::Local.is_production());
        assert_eq!(AppEnv::Staging.as_str(), "staging");
    }
}

//! Stripe API client.
//!
//! Dandeline uses Stripe for hosted checkout and as the catalog source of
//! truth. Outbound calls are synchronous, single-attempt, with a fixed
//! timeout; callers degrade gracefully on failure rather than retrying.
//!
//! # Operations
//!
//! - Create a hosted checkout session from cart contents
//! - Retrieve a completed session (expanded with line items, prices,
//!   products, customer) for order materialization
//! - List catalog products/prices for import
//! - List active shipping rates offered at checkout

mod client;
pub mod types;

pub use client::{CreateCheckoutSession, SessionLineItemInput, StripeClient};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with the Stripe API.
#[derive(Debug, Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stripe_error_display() {
        let err = StripeError::Api {
            status: 402,
            message: "Your card was declined.".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 402 - Your card was declined.");
    }
}

//! USPS shipment tracking client.
//!
//! Returns a normalized tracking payload for an order's tracking number.
//! Outside production (or when the integration is disabled) a fixed mock
//! payload stands in for the API; upstream failures degrade to an `ERROR`
//! payload instead of failing the request.

mod client;
pub mod types;

pub use client::TrackingClient;
pub use types::{TrackingEvent, TrackingInfo};

use thiserror::Error;

/// Errors that can occur when interacting with the USPS API.
///
/// Callers generally do not see these: the client converts failures into
/// an `ERROR` payload and logs them.
#[derive(Debug, Error)]
pub enum TrackingError {
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

//! Event quote request.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dandeline_core::{QuoteRequestId, QuoteServiceType, QuoteStatus};

/// A quote request submitted from the storefront.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteRequest {
    pub id: QuoteRequestId,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub service_type: QuoteServiceType,
    pub event_date: Option<NaiveDate>,
    pub event_location: Option<String>,
    pub guest_count: Option<i32>,
    pub budget: Option<Decimal>,
    pub description: String,
    pub status: QuoteStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a quote request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewQuoteRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub service_type: QuoteServiceType,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    #[serde(default)]
    pub event_location: Option<String>,
    #[serde(default)]
    pub guest_count: Option<i32>,
    #[serde(default)]
    pub budget: Option<Decimal>,
    pub description: String,
    #[serde(default)]
    pub status: QuoteStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update of a quote request. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQuoteRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub service_type: Option<QuoteServiceType>,
    pub event_date: Option<NaiveDate>,
    pub event_location: Option<String>,
    pub guest_count: Option<i32>,
    pub budget: Option<Decimal>,
    pub description: Option<String>,
    pub status: Option<QuoteStatus>,
    pub notes: Option<String>,
}

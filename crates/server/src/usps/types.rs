//! Normalized tracking payloads and the raw USPS response subset.

use serde::{Deserialize, Serialize};

/// Normalized tracking information returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct TrackingInfo {
    pub tracking_number: String,
    /// Human-readable status, e.g. "In Transit".
    pub status: String,
    /// Upper-snake status code, e.g. `IN_TRANSIT`, `DELIVERED`, `ERROR`.
    pub status_code: String,
    /// Expected delivery date (YYYY-MM-DD) when known.
    pub expected_delivery: Option<String>,
    pub events: Vec<TrackingEvent>,
}

/// One scan event in a package's history.
#[derive(Debug, Clone, Serialize)]
pub struct TrackingEvent {
    pub date: String,
    pub time: String,
    pub status: String,
    pub description: String,
    pub location: Option<String>,
    pub facility: Option<String>,
}

// =============================================================================
// Raw USPS Tracking API v3 response subset
// =============================================================================

/// Envelope of the tracking endpoint response.
#[derive(Debug, Deserialize)]
pub struct UspsTrackingResponse {
    #[serde(rename = "trackingInfo", default)]
    pub tracking_info: Option<UspsTrackingInfo>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UspsTrackingInfo {
    #[serde(rename = "trackingNumber", default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub summary: Option<UspsSummary>,
    #[serde(default)]
    pub events: Vec<UspsEvent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UspsSummary {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "expectedDeliveryDate", default)]
    pub expected_delivery_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UspsEvent {
    #[serde(rename = "eventDate", default)]
    pub event_date: Option<String>,
    #[serde(rename = "eventTime", default)]
    pub event_time: Option<String>,
    #[serde(rename = "eventType", default)]
    pub event_type: Option<String>,
    #[serde(rename = "eventDescription", default)]
    pub event_description: Option<String>,
    #[serde(rename = "eventCity", default)]
    pub event_city: Option<String>,
    #[serde(rename = "eventState", default)]
    pub event_state: Option<String>,
    #[serde(rename = "eventZIP", default)]
    pub event_zip: Option<String>,
    #[serde(rename = "eventFacility", default)]
    pub event_facility: Option<String>,
}

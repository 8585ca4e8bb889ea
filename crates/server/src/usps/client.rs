//! USPS Tracking API v3 client with mock and error fallbacks.

use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use secrecy::ExposeSecret;

use crate::config::{AppEnv, UspsConfig};

use super::types::{TrackingEvent, TrackingInfo, UspsTrackingResponse};
use super::TrackingError;

/// Fixed per-request timeout; there is no retry.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// USPS shipment tracking client.
#[derive(Clone)]
pub struct TrackingClient {
    client: reqwest::Client,
    config: UspsConfig,
    env: AppEnv,
}

impl TrackingClient {
    /// Create a new tracking client.
    #[must_use]
    pub fn new(config: &UspsConfig, env: AppEnv) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            config: config.clone(),
            env,
        }
    }

    /// Get normalized tracking information for a tracking number.
    ///
    /// Non-production environments and a disabled integration return the
    /// mock payload; upstream failures return the `ERROR` payload. This
    /// method never fails the caller.
    pub async fn get_tracking_info(&self, tracking_number: &str) -> TrackingInfo {
        if !self.env.is_production() || !self.config.enabled {
            return mock_tracking_info(tracking_number);
        }

        match self.fetch(tracking_number).await {
            Ok(info) => info,
            Err(e) => {
                tracing::error!(
                    tracking_number = %tracking_number,
                    error = %e,
                    "USPS tracking lookup failed"
                );
                error_tracking_info(tracking_number)
            }
        }
    }

    async fn fetch(&self, tracking_number: &str) -> Result<TrackingInfo, TrackingError> {
        let url = format!(
            "{}/tracking/v3/tracking/{tracking_number}",
            self.config.base_url.trim_end_matches('/')
        );

        let mut request = self.client.get(&url).query(&[("expand", "DETAIL")]);

        if let Some(key) = &self.config.consumer_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TrackingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: UspsTrackingResponse = response
            .json()
            .await
            .map_err(|e| TrackingError::Parse(e.to_string()))?;

        Ok(normalize(tracking_number, body))
    }
}

/// Normalize a raw USPS payload into [`TrackingInfo`].
fn normalize(tracking_number: &str, response: UspsTrackingResponse) -> TrackingInfo {
    let info = response.tracking_info.unwrap_or_default();
    let summary = info.summary.unwrap_or_default();
    let status = summary.status.unwrap_or_else(|| "Unknown".to_string());

    let events = info
        .events
        .into_iter()
        .map(|event| {
            let location = match (&event.event_city, &event.event_state) {
                (Some(city), Some(state)) => {
                    let zip = event.event_zip.as_deref().unwrap_or_default();
                    Some(format!("{city}, {state} {zip}").trim_end().to_string())
                }
                _ => None,
            };

            TrackingEvent {
                date: event.event_date.unwrap_or_default(),
                time: event.event_time.unwrap_or_default(),
                status: event.event_type.unwrap_or_default(),
                description: event.event_description.unwrap_or_default(),
                location,
                facility: event.event_facility,
            }
        })
        .collect();

    TrackingInfo {
        tracking_number: info
            .tracking_number
            .unwrap_or_else(|| tracking_number.to_string()),
        status_code: map_status(&status).to_string(),
        status,
        expected_delivery: summary.expected_delivery_date,
        events,
    }
}

/// Map a USPS status phrase to an upper-snake code.
fn map_status(status: &str) -> &'static str {
    match status {
        "Delivered" => "DELIVERED",
        "Out for Delivery" => "OUT_FOR_DELIVERY",
        "In Transit" => "IN_TRANSIT",
        "Shipped" => "SHIPPED",
        "Pre-Shipment" => "PRE_SHIPMENT",
        _ => "UNKNOWN",
    }
}

/// Fixed in-transit payload used outside production.
fn mock_tracking_info(tracking_number: &str) -> TrackingInfo {
    let base = Utc::now() - ChronoDuration::days(3);
    let fmt_date = |d: chrono::DateTime<Utc>| d.format("%Y-%m-%d %H:%M:%S").to_string();
    let fmt_time = |d: chrono::DateTime<Utc>| d.format("%H:%M:%S").to_string();

    TrackingInfo {
        tracking_number: tracking_number.to_string(),
        status: "In Transit".to_string(),
        status_code: "IN_TRANSIT".to_string(),
        expected_delivery: Some((Utc::now() + ChronoDuration::days(1)).format("%Y-%m-%d").to_string()),
        events: vec![
            TrackingEvent {
                date: fmt_date(base),
                time: fmt_time(base),
                status: "Shipping Label Created".to_string(),
                description: "USPS in possession of item".to_string(),
                location: Some("DENVER, CO 80202".to_string()),
                facility: Some("Denver Processing & Distribution Center".to_string()),
            },
            TrackingEvent {
                date: fmt_date(base + ChronoDuration::days(1)),
                time: fmt_time(base + ChronoDuration::days(1)),
                status: "In Transit".to_string(),
                description:
                    "Your item departed our facility in Denver, CO 80202 on its way to the destination"
                        .to_string(),
                location: Some("DENVER, CO 80202".to_string()),
                facility: Some("Denver Processing & Distribution Center".to_string()),
            },
            TrackingEvent {
                date: fmt_date(base + ChronoDuration::days(2)),
                time: fmt_time(base + ChronoDuration::days(2)),
                status: "In Transit".to_string(),
                description: "Your item arrived at our facility in Kansas City, MO 64144"
                    .to_string(),
                location: Some("KANSAS CITY, MO 64144".to_string()),
                facility: Some("Kansas City Processing & Distribution Center".to_string()),
            },
            TrackingEvent {
                date: fmt_date(Utc::now() - ChronoDuration::hours(4)),
                time: fmt_time(Utc::now() - ChronoDuration::hours(4)),
                status: "Out for Delivery".to_string(),
                description: "Out for delivery, expected delivery by end of day".to_string(),
                location: Some("CHICAGO, IL 60601".to_string()),
                facility: Some("Chicago Post Office".to_string()),
            },
        ],
    }
}

/// `ERROR` payload returned when the upstream lookup fails.
fn error_tracking_info(tracking_number: &str) -> TrackingInfo {
    let now = Utc::now();

    TrackingInfo {
        tracking_number: tracking_number.to_string(),
        status: "Error".to_string(),
        status_code: "ERROR".to_string(),
        expected_delivery: None,
        events: vec![TrackingEvent {
            date: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            time: now.format("%H:%M:%S").to_string(),
            status: "Error".to_string(),
            description:
                "Unable to retrieve tracking information. Please verify tracking number or try again later."
                    .to_string(),
            location: None,
            facility: None,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usps::types::{UspsEvent, UspsSummary, UspsTrackingInfo};

    #[test]
    fn test_map_status_known_values() {
        assert_eq!(map_status("Delivered"), "DELIVERED");
        assert_eq!(map_status("Out for Delivery"), "OUT_FOR_DELIVERY");
        assert_eq!(map_status("In Transit"), "IN_TRANSIT");
        assert_eq!(map_status("Shipped"), "SHIPPED");
        assert_eq!(map_status("Pre-Shipment"), "PRE_SHIPMENT");
        assert_eq!(map_status("Lost In Space"), "UNKNOWN");
    }

    #[test]
    fn test_mock_payload_shape() {
        let info = mock_tracking_info("9400100000000000000000");
        assert_eq!(info.status_code, "IN_TRANSIT");
        assert_eq!(info.events.len(), 4);
        assert!(info.expected_delivery.is_some());
    }

    #[test]
    fn test_error_payload_shape() {
        let info = error_tracking_info("9400100000000000000000");
        assert_eq!(info.status_code, "ERROR");
        assert_eq!(info.events.len(), 1);
        assert!(info.expected_delivery.is_none());
    }

    #[test]
    fn test_normalize_builds_location() {
        let response = UspsTrackingResponse {
            tracking_info: Some(UspsTrackingInfo {
                tracking_number: Some("9400123".to_string()),
                summary: Some(UspsSummary {
                    status: Some("Delivered".to_string()),
                    expected_delivery_date: Some("2026-08-01".to_string()),
                }),
                events: vec![UspsEvent {
                    event_date: Some("2026-08-01".to_string()),
                    event_time: Some("10:15:00".to_string()),
                    event_type: Some("Delivered".to_string()),
                    event_description: Some("Delivered, In/At Mailbox".to_string()),
                    event_city: Some("CHICAGO".to_string()),
                    event_state: Some("IL".to_string()),
                    event_zip: Some("60601".to_string()),
                    event_facility: None,
                }],
            }),
        };

        let info = normalize("9400123", response);
        assert_eq!(info.status_code, "DELIVERED");
        let event = info.events.first().expect("one event");
        assert_eq!(event.location.as_deref(), Some("CHICAGO, IL 60601"));
    }

    #[test]
    fn test_normalize_missing_summary_is_unknown() {
        let response = UspsTrackingResponse {
            tracking_info: None,
        };

        let info = normalize("9400999", response);
        assert_eq!(info.status, "Unknown");
        assert_eq!(info.status_code, "UNKNOWN");
        assert_eq!(info.tracking_number, "9400999");
    }
}

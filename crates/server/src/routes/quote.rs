//! Quote request route handler.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use dandeline_core::{Email, QuoteServiceType, QuoteStatus};

use crate::models::NewQuoteRequest;
use crate::services::{EntityService, QuoteRequestService};
use crate::state::AppState;

use super::contact::FormResponse;

/// Quote request form data.
#[derive(Debug, Deserialize)]
pub struct QuoteForm {
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
}

/// Submit a quote request.
///
/// POST /quote
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn store(
    State(state): State<AppState>,
    Json(form): Json<QuoteForm>,
) -> impl IntoResponse {
    let Ok(email) = Email::parse(&form.email) else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(FormResponse::error("Please enter a valid email address.")),
        );
    };

    if form.name.trim().is_empty() || form.description.trim().is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(FormResponse::error("Name and description are required.")),
        );
    }

    let service = QuoteRequestService::new(state.pool(), state.dispatcher());
    let input = NewQuoteRequest {
        name: form.name.trim().to_string(),
        email: email.into_inner(),
        phone_number: form.phone_number,
        service_type: form.service_type,
        event_date: form.event_date,
        event_location: form.event_location,
        guest_count: form.guest_count,
        budget: form.budget,
        description: form.description.trim().to_string(),
        status: QuoteStatus::Pending,
        notes: None,
    };

    match service.store(input, None).await {
        Ok(quote) => {
            tracing::info!(quote_request_id = %quote.id, "Quote request received");
            (StatusCode::OK, Json(FormResponse::ok()))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to store quote request");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FormResponse::error("Something went wrong. Please try again.")),
            )
        }
    }
}

//! Contact form route handler.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use dandeline_core::Email;

use crate::models::NewContactMessage;
use crate::services::{ContactMessageService, EntityService};
use crate::state::AppState;

/// Contact form data.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub name: String,
    #[serde(default)]
    pub business_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
}

/// Response for form submissions.
#[derive(Debug, Serialize)]
pub struct FormResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FormResponse {
    pub(crate) const fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub(crate) fn error(message: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
        }
    }
}

/// Submit a contact message.
///
/// POST /contact
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn store(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> impl IntoResponse {
    let Ok(email) = Email::parse(&form.email) else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(FormResponse::error("Please enter a valid email address.")),
        );
    };

    if form.name.trim().is_empty() || form.message.trim().is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(FormResponse::error("Name and message are required.")),
        );
    }

    let service = ContactMessageService::new(state.pool(), state.dispatcher());
    let input = NewContactMessage {
        name: form.name.trim().to_string(),
        business_name: form.business_name,
        email: email.into_inner(),
        phone_number: form.phone_number,
        subject: form.subject,
        message: form.message.trim().to_string(),
    };

    match service.store(input, None).await {
        Ok(message) => {
            tracing::info!(contact_message_id = %message.id, "Contact message received");
            (StatusCode::OK, Json(FormResponse::ok()))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to store contact message");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FormResponse::error("Something went wrong. Please try again.")),
            )
        }
    }
}

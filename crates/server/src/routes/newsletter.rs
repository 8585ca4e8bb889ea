//! Newsletter subscription route handler.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use dandeline_core::Email;

use crate::services::NewsletterSubscriberService;
use crate::state::AppState;

use super::contact::FormResponse;

/// Newsletter signup form data.
#[derive(Debug, Deserialize)]
pub struct SubscribeForm {
    pub email: String,
}

/// Subscribe to the newsletter.
///
/// POST /newsletter
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn store(
    State(state): State<AppState>,
    Json(form): Json<SubscribeForm>,
) -> impl IntoResponse {
    let Ok(email) = Email::parse(&form.email) else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(FormResponse::error("Please enter a valid email address.")),
        );
    };

    let service = NewsletterSubscriberService::new(state.pool());

    match service.subscribe(email.as_str(), Some("website")).await {
        Ok(subscriber) => {
            tracing::info!(subscriber_id = %subscriber.id, "Newsletter subscription");
            (StatusCode::OK, Json(FormResponse::ok()))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to subscribe");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FormResponse::error("Something went wrong. Please try again.")),
            )
        }
    }
}

//! Checkout route handlers.
//!
//! `POST /checkout` turns a cart into a hosted checkout session and hands
//! the session back to the storefront; `GET /checkout/success` is the
//! return URL Stripe redirects to, where the order is materialized.

use axum::{
    Json,
    extract::{Query, State},
    response::Redirect,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::AppError;
use crate::services::{CartItem, CheckoutService};
use crate::state::AppState;

/// Generic failure message shown when confirmation goes wrong; the real
/// error is logged, never surfaced.
const CONFIRM_ERROR_MESSAGE: &str =
    "There was an issue processing your order. Please contact support.";

/// Checkout form payload.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CartItem>,
}

/// Session handle returned to the storefront, which redirects the
/// customer to `url`.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub session_id: String,
    pub url: Option<String>,
}

/// Create a checkout session from the cart.
///
/// POST /checkout
#[instrument(skip(state, request), fields(item_count = request.items.len()))]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, AppError> {
    let service = CheckoutService::new(
        state.pool(),
        state.stripe(),
        state.config(),
        state.dispatcher(),
    );

    let handle = service.create_session(&request.items).await?;

    Ok(Json(CheckoutResponse {
        session_id: handle.session_id,
        url: handle.url,
    }))
}

/// Query parameters on the success callback.
#[derive(Debug, Deserialize)]
pub struct SuccessParams {
    pub session_id: Option<String>,
}

/// Handle the return from Stripe's hosted checkout.
///
/// GET /checkout/success?session_id=...
///
/// Redirects home with the order number on success and with a generic
/// error message on any failure; the customer is never shown a raw
/// upstream error.
#[instrument(skip(state, params))]
pub async fn success(
    State(state): State<AppState>,
    Query(params): Query<SuccessParams>,
) -> Redirect {
    let Some(session_id) = params.session_id.filter(|id| !id.is_empty()) else {
        tracing::error!("No session_id provided to checkout success");
        return redirect_with_error("Invalid checkout session.");
    };

    let service = CheckoutService::new(
        state.pool(),
        state.stripe(),
        state.config(),
        state.dispatcher(),
    );

    match service.confirm_session(&session_id).await {
        Ok(order) => {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("order", &order.order_number)
                .finish();
            Redirect::to(&format!("/?{query}"))
        }
        Err(e) => {
            tracing::error!(session_id = %session_id, error = %e, "Order creation failed");
            redirect_with_error(CONFIRM_ERROR_MESSAGE)
        }
    }
}

fn redirect_with_error(message: &str) -> Redirect {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("checkout_error", message)
        .finish();
    Redirect::to(&format!("/?{query}"))
}

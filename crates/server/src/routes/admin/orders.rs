//! Admin order routes.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use dandeline_core::OrderId;

use crate::error::AppError;
use crate::models::{Order, UpdateOrder};
use crate::services::{EntityService, OrderService};
use crate::state::AppState;

/// GET /admin/orders
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Order>>, AppError> {
    let service = OrderService::new(state.pool(), state.dispatcher());
    Ok(Json(service.get_all().await?))
}

/// GET /admin/orders/{id}
///
/// Returns the order with its line items loaded.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Order>, AppError> {
    let service = OrderService::new(state.pool(), state.dispatcher());
    let order = service
        .get_by_id(OrderId::new(id), None)
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("order {id}")))?;
    Ok(Json(order))
}

/// PATCH /admin/orders/{id}
///
/// Fulfillment updates. A status change queues the customer's
/// status-update email (with the dedicated template when shipping).
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateOrder>,
) -> Result<Json<Order>, AppError> {
    let service = OrderService::new(state.pool(), state.dispatcher());
    let order = service
        .get_by_id(OrderId::new(id), Some(&[]))
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("order {id}")))?;
    let updated = service.update(input, &order, None).await?;
    Ok(Json(updated))
}

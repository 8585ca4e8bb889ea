//! Shipment tracking route handler.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use dandeline_core::OrderId;

use crate::db::{OrderRepository, Repository};
use crate::error::AppError;
use crate::state::AppState;
use crate::usps::TrackingInfo;

/// Look up USPS tracking for an order.
///
/// GET /orders/{id}/tracking
///
/// The lookup itself never fails: upstream errors come back as an `ERROR`
/// status payload.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TrackingInfo>, AppError> {
    let order = OrderRepository::new(state.pool())
        .find_by_id(OrderId::new(id))
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("order {id}")))?;

    let Some(tracking_number) = order.tracking_number.as_deref() else {
        return Err(AppError::NotFound(format!(
            "order {id} has no tracking number"
        )));
    };

    let info = state.tracking().get_tracking_info(tracking_number).await;
    Ok(Json(info))
}

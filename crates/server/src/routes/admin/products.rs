//! Admin product routes.
//!
//! Products are created by the catalog import, not by hand; the admin
//! surface lists, edits, deletes, imports, and picks the current price.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use dandeline_core::{PriceId, ProductId};

use crate::db::PriceRepository;
use crate::error::AppError;
use crate::models::{Price, Product, UpdateProduct};
use crate::services::{CatalogImportService, EntityService, ImportSummary, ProductService};
use crate::state::AppState;

/// GET /admin/products
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    let service = ProductService::new(state.pool());
    Ok(Json(service.get_all().await?))
}

/// GET /admin/products/{id}
///
/// Returns the product with its category, prices, and historical line
/// items loaded.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>, AppError> {
    let service = ProductService::new(state.pool());
    let product = service
        .get_by_id(ProductId::new(id), None)
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("product {id}")))?;
    Ok(Json(product))
}

/// PATCH /admin/products/{id}
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateProduct>,
) -> Result<Json<Product>, AppError> {
    let service = ProductService::new(state.pool());
    let product = service
        .get_by_id(ProductId::new(id), Some(&[]))
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("product {id}")))?;
    let updated = service.update(input, &product, None).await?;
    Ok(Json(updated))
}

/// DELETE /admin/products/{id}
///
/// Soft delete; historical line items keep their snapshot and reference.
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let service = ProductService::new(state.pool());
    let product = service
        .get_by_id(ProductId::new(id), Some(&[]))
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("product {id}")))?;
    service.delete(&product).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Import request parameters.
#[derive(Debug, Deserialize)]
pub struct ImportParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub force: bool,
}

const fn default_limit() -> u32 {
    50
}

/// POST /admin/products/import-stripe
///
/// Pull products and prices from the Stripe catalog. Existing products
/// are skipped unless `force` is set.
#[instrument(skip(state), fields(limit = params.limit, force = params.force))]
pub async fn import_stripe(
    State(state): State<AppState>,
    Json(params): Json<ImportParams>,
) -> Result<Json<ImportSummary>, AppError> {
    let service = CatalogImportService::new(state.pool(), state.stripe());
    let summary = service.import_products(params.limit, params.force).await?;
    Ok(Json(summary))
}

/// POST /admin/products/{id}/prices/{price_id}/current
///
/// Make one price the product's current price, clearing the flag on the
/// others first so at most one stays set.
#[instrument(skip(state))]
pub async fn set_current_price(
    State(state): State<AppState>,
    Path((id, price_id)): Path<(i32, i32)>,
) -> Result<Json<Price>, AppError> {
    let prices = PriceRepository::new(state.pool());
    let product_id = ProductId::new(id);

    prices.clear_current(product_id).await?;
    let price = prices
        .set_current(product_id, PriceId::new(price_id))
        .await
        .map_err(|e| AppError::from_lookup(e, &format!("price {price_id} of product {id}")))?;

    Ok(Json(price))
}

//! Storefront catalog route handler.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::db::{PriceRepository, ProductRepository};
use crate::error::AppError;
use crate::models::Product;
use crate::state::AppState;

/// List active products with their prices (current first) for the store
/// page.
///
/// GET /store
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    let products = ProductRepository::new(state.pool());
    let prices = PriceRepository::new(state.pool());

    let mut listing = products.list_active().await?;
    for product in &mut listing {
        let product_prices = prices.list_for_product(product.id).await?;
        product.prices = Some(
            product_prices
                .into_iter()
                .filter(|price| price.active)
                .collect(),
        );
    }

    Ok(Json(listing))
}

/// Show one active product by slug, with its active prices.
///
/// GET /store/{slug}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Product>, AppError> {
    let mut product = ProductRepository::new(state.pool())
        .find_by_slug(&slug)
        .await?
        .filter(|product| product.is_active)
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    let prices = PriceRepository::new(state.pool())
        .list_for_product(product.id)
        .await?;
    product.prices = Some(prices.into_iter().filter(|price| price.active).collect());

    Ok(Json(product))
}

//! Stripe catalog import.
//!
//! Pulls products and their prices from the Stripe catalog into local
//! rows, reconciling by Stripe id. Per-product and per-price failures are
//! caught, logged, and counted; a single failure never aborts the batch.
//!
//! # Skip policy
//!
//! An existing product (matched by Stripe product id) is **skipped unless
//! `force` is set**; with `force`, it is re-synced from upstream. Locally
//! curated `category_id` and `is_featured` survive a forced re-sync.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;
use thiserror::Error;

use dandeline_core::{CategoryId, PriceType, money::minor_to_decimal, slugify};

use crate::db::{
    CategoryRepository, PriceRepository, ProductRepository, Repository, RepositoryError,
};
use crate::models::{NewCategory, NewPrice, NewProduct, Product, UpdatePrice, UpdateProduct};
use crate::stripe::{CatalogPrice, CatalogProduct, PackageDimensions, StripeClient, StripeError};

use super::products::ProductService;

/// Slug of the sentinel category imported products land in.
pub const IMPORT_CATEGORY_SLUG: &str = "imported-from-stripe";

/// How many prices are pulled per product.
const PRICE_PAGE_LIMIT: u32 = 100;

/// Errors that abort an entire import run (listing the catalog itself).
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Stripe catalog listing failed.
    #[error("stripe error: {0}")]
    Stripe(#[from] StripeError),

    /// Database failure outside any per-item scope.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Outcome counters for one import run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub imported: u32,
    pub skipped: u32,
    pub products_failed: u32,
    pub prices_imported: u32,
    pub prices_failed: u32,
    pub prices_delisted: u64,
}

/// Catalog import workflow service.
pub struct CatalogImportService<'a> {
    pool: &'a PgPool,
    stripe: &'a StripeClient,
}

impl<'a> CatalogImportService<'a> {
    /// Create a new catalog import service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, stripe: &'a StripeClient) -> Self {
        Self { pool, stripe }
    }

    /// Import up to `limit` active catalog products and their prices.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` only when the catalog listing itself fails;
    /// per-item failures are counted in the summary instead.
    pub async fn import_products(
        &self,
        limit: u32,
        force: bool,
    ) -> Result<ImportSummary, CatalogError> {
        let upstream = self.stripe.list_products(limit).await?;
        tracing::info!(count = upstream.data.len(), force, "Starting catalog import");

        let products = ProductRepository::new(self.pool);
        let mut summary = ImportSummary::default();
        let mut sentinel: Option<CategoryId> = None;

        for catalog_product in &upstream.data {
            let existing = match products.find_by_stripe_id(&catalog_product.id).await {
                Ok(existing) => existing,
                Err(e) => {
                    tracing::error!(
                        stripe_product_id = %catalog_product.id,
                        error = %e,
                        "Failed to look up product"
                    );
                    summary.products_failed += 1;
                    continue;
                }
            };

            if should_skip(existing.is_some(), force) {
                tracing::debug!(
                    stripe_product_id = %catalog_product.id,
                    name = %catalog_product.name,
                    "Skipping existing product"
                );
                summary.skipped += 1;
                continue;
            }

            let product = match self
                .upsert_product(catalog_product, existing, &mut sentinel)
                .await
            {
                Ok(product) => product,
                Err(e) => {
                    tracing::error!(
                        stripe_product_id = %catalog_product.id,
                        name = %catalog_product.name,
                        error = %e,
                        "Failed to import product"
                    );
                    summary.products_failed += 1;
                    continue;
                }
            };

            self.import_prices_for_product(&catalog_product.id, &product, &mut summary)
                .await;

            summary.imported += 1;
            tracing::info!(
                stripe_product_id = %catalog_product.id,
                product_id = %product.id,
                "Imported product"
            );
        }

        tracing::info!(
            imported = summary.imported,
            skipped = summary.skipped,
            failed = summary.products_failed,
            prices_imported = summary.prices_imported,
            prices_failed = summary.prices_failed,
            prices_delisted = summary.prices_delisted,
            "Catalog import completed"
        );

        Ok(summary)
    }

    /// Create or re-sync one product from its upstream record.
    async fn upsert_product(
        &self,
        upstream: &CatalogProduct,
        existing: Option<Product>,
        sentinel: &mut Option<CategoryId>,
    ) -> Result<Product, RepositoryError> {
        let service = ProductService::new(self.pool);

        match existing {
            Some(existing) => {
                // Re-derive the slug only when the name changed it; the
                // update record leaves category_id/is_featured untouched.
                let derived = slugify(&upstream.name);
                let slug = if derived == existing.slug {
                    None
                } else {
                    Some(service.ensure_unique_slug(&derived, Some(existing.id)).await?)
                };

                let mut fields = resync_product_fields(upstream);
                fields.slug = slug;
                ProductRepository::new(self.pool)
                    .update(fields, &existing)
                    .await
            }
            None => {
                let category_id = match sentinel {
                    Some(id) => *id,
                    None => {
                        let id = self.sentinel_category().await?;
                        *sentinel = Some(id);
                        id
                    }
                };

                let slug = service
                    .ensure_unique_slug(&slugify(&upstream.name), None)
                    .await?;
                ProductRepository::new(self.pool)
                    .store(new_product_fields(upstream, slug, category_id))
                    .await
            }
        }
    }

    /// Import one product's prices, then delist local prices gone upstream.
    async fn import_prices_for_product(
        &self,
        stripe_product_id: &str,
        product: &Product,
        summary: &mut ImportSummary,
    ) {
        let prices = PriceRepository::new(self.pool);

        let upstream = match self
            .stripe
            .list_prices_for_product(stripe_product_id, PRICE_PAGE_LIMIT)
            .await
        {
            Ok(list) => list,
            Err(e) => {
                tracing::error!(
                    stripe_product_id = %stripe_product_id,
                    error = %e,
                    "Failed to list prices for product"
                );
                summary.prices_failed += 1;
                return;
            }
        };

        let mut has_current = match prices.has_current(product.id).await {
            Ok(has_current) => has_current,
            Err(e) => {
                tracing::error!(product_id = %product.id, error = %e, "Failed to probe current price");
                true // don't risk flagging a second current price
            }
        };

        let keep: Vec<String> = upstream.data.iter().map(|p| p.id.clone()).collect();

        for catalog_price in &upstream.data {
            let mark_current = catalog_price.active && !has_current;

            match self.upsert_price(catalog_price, product, mark_current).await {
                Ok(()) => {
                    summary.prices_imported += 1;
                    if mark_current {
                        has_current = true;
                    }
                }
                Err(e) => {
                    tracing::error!(
                        stripe_price_id = %catalog_price.id,
                        error = %e,
                        "Failed to import price"
                    );
                    summary.prices_failed += 1;
                }
            }
        }

        // Prices removed upstream are delisted, never deleted
        match prices.deactivate_missing(product.id, &keep).await {
            Ok(delisted) => summary.prices_delisted += delisted,
            Err(e) => {
                tracing::error!(product_id = %product.id, error = %e, "Failed to delist missing prices");
            }
        }
    }

    /// Create or update one price row from its upstream record.
    async fn upsert_price(
        &self,
        upstream: &CatalogPrice,
        product: &Product,
        mark_current: bool,
    ) -> Result<(), RepositoryError> {
        let prices = PriceRepository::new(self.pool);

        match prices.find_by_stripe_id(&upstream.id).await? {
            Some(existing) => {
                let mut fields = resync_price_fields(upstream);
                if mark_current {
                    fields.is_current = Some(true);
                }
                prices.update(fields, &existing).await?;
            }
            None => {
                prices
                    .store(new_price_fields(upstream, product, mark_current))
                    .await?;
            }
        }

        Ok(())
    }

    /// The sentinel category imported products are filed under.
    async fn sentinel_category(&self) -> Result<CategoryId, RepositoryError> {
        let category = CategoryRepository::new(self.pool)
            .find_or_create_by_slug(NewCategory {
                name: "Imported from Stripe".to_string(),
                slug: Some(IMPORT_CATEGORY_SLUG.to_string()),
                description: Some("Products imported from the Stripe catalog".to_string()),
                is_active: true,
                sort_order: 0,
            })
            .await?;

        Ok(category.id)
    }
}

/// Skip policy: an existing product is only re-synced under `force`.
#[must_use]
pub const fn should_skip(exists: bool, force: bool) -> bool {
    exists && !force
}

/// "LxWxH" shipping dimension string.
fn dimensions_string(dims: &PackageDimensions) -> String {
    format!("{}x{}x{}", dims.length, dims.width, dims.height)
}

fn metadata_value(metadata: &std::collections::HashMap<String, String>) -> Option<serde_json::Value> {
    if metadata.is_empty() {
        None
    } else {
        serde_json::to_value(metadata).ok()
    }
}

/// Fields for a product seen for the first time.
#[must_use]
pub fn new_product_fields(
    upstream: &CatalogProduct,
    slug: String,
    category_id: CategoryId,
) -> NewProduct {
    NewProduct {
        stripe_product_id: Some(upstream.id.clone()),
        category_id,
        name: upstream.name.clone(),
        slug: Some(slug),
        description: upstream.description.clone().unwrap_or_default(),
        sku: None,
        image_url: upstream.images.first().cloned(),
        images: (!upstream.images.is_empty()).then(|| upstream.images.clone()),
        package_dimensions: upstream.package_dimensions.as_ref().map(dimensions_string),
        weight: upstream
            .package_dimensions
            .as_ref()
            .and_then(|dims| Decimal::try_from(dims.weight).ok()),
        shippable: upstream.shippable.unwrap_or(true),
        tax_code: upstream.tax_code.clone(),
        metadata: metadata_value(&upstream.metadata),
        unit_label: upstream.unit_label.clone(),
        is_active: upstream.active,
        is_featured: false,
    }
}

/// Fields for re-syncing an existing product.
///
/// `category_id` and `is_featured` stay `None` so the existing values are
/// preserved; the slug is decided by the caller.
#[must_use]
pub fn resync_product_fields(upstream: &CatalogProduct) -> UpdateProduct {
    UpdateProduct {
        stripe_product_id: Some(upstream.id.clone()),
        category_id: None,
        name: Some(upstream.name.clone()),
        slug: None,
        description: Some(upstream.description.clone().unwrap_or_default()),
        sku: None,
        image_url: upstream.images.first().cloned(),
        images: (!upstream.images.is_empty()).then(|| upstream.images.clone()),
        package_dimensions: upstream.package_dimensions.as_ref().map(dimensions_string),
        weight: upstream
            .package_dimensions
            .as_ref()
            .and_then(|dims| Decimal::try_from(dims.weight).ok()),
        shippable: upstream.shippable,
        tax_code: upstream.tax_code.clone(),
        metadata: metadata_value(&upstream.metadata),
        unit_label: upstream.unit_label.clone(),
        is_active: Some(upstream.active),
        is_featured: None,
    }
}

fn price_type_of(upstream: &CatalogPrice) -> PriceType {
    if upstream.price_type == "recurring" {
        PriceType::Recurring
    } else {
        PriceType::OneTime
    }
}

fn recurring_value(upstream: &CatalogPrice) -> Option<serde_json::Value> {
    upstream.recurring.as_ref().map(|recurring| {
        json!({
            "interval": recurring.interval,
            "interval_count": recurring.interval_count,
            "usage_type": recurring.usage_type,
        })
    })
}

/// Fields for a price seen for the first time.
#[must_use]
pub fn new_price_fields(
    upstream: &CatalogPrice,
    product: &Product,
    mark_current: bool,
) -> NewPrice {
    let minor = upstream.unit_amount.unwrap_or(0);

    NewPrice {
        stripe_price_id: upstream.id.clone(),
        product_id: product.id,
        active: upstream.active,
        is_current: mark_current,
        currency: upstream.currency.to_uppercase(),
        price_type: price_type_of(upstream),
        unit_amount: minor_to_decimal(minor),
        unit_amount_minor: Some(minor),
        billing_scheme: upstream.billing_scheme.clone(),
        recurring: recurring_value(upstream),
        nickname: upstream.nickname.clone(),
        metadata: metadata_value(&upstream.metadata),
        stripe_created_at: DateTime::<Utc>::from_timestamp(upstream.created, 0),
    }
}

/// Fields for re-syncing an existing price. `is_current` is left alone
/// unless the caller decides to mark it.
#[must_use]
pub fn resync_price_fields(upstream: &CatalogPrice) -> UpdatePrice {
    let minor = upstream.unit_amount.unwrap_or(0);

    UpdatePrice {
        active: Some(upstream.active),
        is_current: None,
        currency: Some(upstream.currency.to_uppercase()),
        price_type: Some(price_type_of(upstream)),
        unit_amount: Some(minor_to_decimal(minor)),
        unit_amount_minor: Some(minor),
        billing_scheme: upstream.billing_scheme.clone(),
        recurring: recurring_value(upstream),
        nickname: upstream.nickname.clone(),
        metadata: metadata_value(&upstream.metadata),
        stripe_created_at: DateTime::<Utc>::from_timestamp(upstream.created, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn upstream_product() -> CatalogProduct {
        CatalogProduct {
            id: "prod_1".to_string(),
            name: "Spring Bouquet".to_string(),
            active: true,
            description: Some("A dozen seasonal stems".to_string()),
            images: vec!["https://img.example.com/spring.jpg".to_string()],
            package_dimensions: Some(PackageDimensions {
                length: 12.0,
                width: 8.0,
                height: 6.0,
                weight: 24.5,
            }),
            shippable: Some(true),
            tax_code: Some("txcd_99999999".to_string()),
            metadata: HashMap::from([("season".to_string(), "spring".to_string())]),
            unit_label: None,
        }
    }

    fn upstream_price(active: bool) -> CatalogPrice {
        CatalogPrice {
            id: "price_1".to_string(),
            active,
            currency: "usd".to_string(),
            price_type: "one_time".to_string(),
            unit_amount: Some(1999),
            billing_scheme: Some("per_unit".to_string()),
            nickname: None,
            recurring: None,
            metadata: HashMap::new(),
            created: 1_723_700_000,
            product: "prod_1".to_string(),
        }
    }

    #[test]
    fn test_skip_policy() {
        // Existing products are skipped unless force is set
        assert!(should_skip(true, false));
        assert!(!should_skip(true, true));
        assert!(!should_skip(false, false));
        assert!(!should_skip(false, true));
    }

    #[test]
    fn test_new_product_fields_mapping() {
        let fields = new_product_fields(
            &upstream_product(),
            "spring-bouquet".to_string(),
            CategoryId::new(9),
        );

        assert_eq!(fields.stripe_product_id.as_deref(), Some("prod_1"));
        assert_eq!(fields.category_id, CategoryId::new(9));
        assert_eq!(fields.slug.as_deref(), Some("spring-bouquet"));
        assert_eq!(fields.package_dimensions.as_deref(), Some("12x8x6"));
        assert_eq!(fields.weight, Decimal::try_from(24.5).ok());
        assert_eq!(
            fields.image_url.as_deref(),
            Some("https://img.example.com/spring.jpg")
        );
        assert!(!fields.is_featured);
        assert!(fields.is_active);
    }

    #[test]
    fn test_resync_preserves_category_and_featured() {
        let fields = resync_product_fields(&upstream_product());

        // None means COALESCE keeps whatever the row already has
        assert!(fields.category_id.is_none());
        assert!(fields.is_featured.is_none());
        assert_eq!(fields.name.as_deref(), Some("Spring Bouquet"));
    }

    #[test]
    fn test_new_price_fields_converts_minor_units() {
        let product = sample_product();
        let fields = new_price_fields(&upstream_price(true), &product, true);

        assert_eq!(fields.unit_amount, Decimal::new(1999, 2));
        assert_eq!(fields.unit_amount_minor, Some(1999));
        assert_eq!(fields.currency, "USD");
        assert_eq!(fields.price_type, PriceType::OneTime);
        assert!(fields.is_current);
        assert!(fields.stripe_created_at.is_some());
    }

    #[test]
    fn test_recurring_price_descriptor() {
        let mut upstream = upstream_price(true);
        upstream.price_type = "recurring".to_string();
        upstream.recurring = Some(crate::stripe::RecurringDetails {
            interval: "month".to_string(),
            interval_count: Some(1),
            usage_type: Some("licensed".to_string()),
        });

        let fields = new_price_fields(&upstream, &sample_product(), false);
        assert_eq!(fields.price_type, PriceType::Recurring);
        let recurring = fields.recurring.expect("recurring descriptor");
        assert_eq!(recurring["interval"], "month");
    }

    #[test]
    fn test_resync_price_leaves_current_flag_alone() {
        let fields = resync_price_fields(&upstream_price(false));
        assert!(fields.is_current.is_none());
        assert_eq!(fields.active, Some(false));
    }

    fn sample_product() -> Product {
        use chrono::Utc;
        use dandeline_core::ProductId;

        Product {
            id: ProductId::new(1),
            stripe_product_id: Some("prod_1".to_string()),
            category_id: CategoryId::new(1),
            name: "Spring Bouquet".to_string(),
            slug: "spring-bouquet".to_string(),
            description: String::new(),
            sku: None,
            image_url: None,
            images: None,
            package_dimensions: None,
            weight: None,
            shippable: true,
            tax_code: None,
            metadata: None,
            unit_label: None,
            is_active: true,
            is_featured: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            category: None,
            prices: None,
            line_items: None,
        }
    }
}

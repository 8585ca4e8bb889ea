//! Integration tests for the catalog import mapping and policy.

use std::collections::HashMap;

use rust_decimal::Decimal;

use dandeline_core::{CategoryId, PriceType, ProductId};
use dandeline_server::models::Product;
use dandeline_server::services::catalog::{
    IMPORT_CATEGORY_SLUG, new_price_fields, new_product_fields, resync_price_fields,
    resync_product_fields, should_skip,
};
use dandeline_server::stripe::types::{CatalogPrice, CatalogProduct, PackageDimensions};

fn upstream_product(name: &str) -> CatalogProduct {
    CatalogProduct {
        id: "prod_imp".to_string(),
        name: name.to_string(),
        active: true,
        description: Some("Imported description".to_string()),
        images: vec![
            "https://img.example.com/a.jpg".to_string(),
            "https://img.example.com/b.jpg".to_string(),
        ],
        package_dimensions: Some(PackageDimensions {
            length: 10.0,
            width: 10.0,
            height: 14.0,
            weight: 32.0,
        }),
        shippable: Some(true),
        tax_code: None,
        metadata: HashMap::new(),
        unit_label: None,
    }
}

fn upstream_price(id: &str, active: bool, unit_amount: i64) -> CatalogPrice {
    CatalogPrice {
        id: id.to_string(),
        active,
        currency: "usd".to_string(),
        price_type: "one_time".to_string(),
        unit_amount: Some(unit_amount),
        billing_scheme: Some("per_unit".to_string()),
        nickname: None,
        recurring: None,
        metadata: HashMap::new(),
        created: 1_723_700_000,
        product: "prod_imp".to_string(),
    }
}

fn local_product() -> Product {
    use chrono::Utc;

    Product {
        id: ProductId::new(3),
        stripe_product_id: Some("prod_imp".to_string()),
        category_id: CategoryId::new(7),
        name: "Peony Bundle".to_string(),
        slug: "peony-bundle".to_string(),
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
        is_featured: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        category: None,
        prices: None,
        line_items: None,
    }
}

// =============================================================================
// Skip/force policy
// =============================================================================

#[test]
fn existing_products_are_skipped_without_force() {
    assert!(should_skip(true, false));
}

#[test]
fn force_resyncs_existing_and_new_products_always_import() {
    assert!(!should_skip(true, true));
    assert!(!should_skip(false, false));
}

// =============================================================================
// Field preservation on re-import
// =============================================================================

#[test]
fn forced_resync_preserves_curated_fields() {
    // The update record carries no category_id/is_featured, so a COALESCE
    // update keeps the locally curated values (category 7, featured)
    let fields = resync_product_fields(&upstream_product("Peony Bundle"));

    assert!(fields.category_id.is_none());
    assert!(fields.is_featured.is_none());
    assert_eq!(fields.name.as_deref(), Some("Peony Bundle"));
    assert_eq!(fields.description.as_deref(), Some("Imported description"));
}

#[test]
fn new_imports_land_in_the_sentinel_category_unfeatured() {
    assert_eq!(IMPORT_CATEGORY_SLUG, "imported-from-stripe");

    let fields = new_product_fields(
        &upstream_product("Peony Bundle"),
        "peony-bundle".to_string(),
        CategoryId::new(99),
    );

    assert_eq!(fields.category_id, CategoryId::new(99));
    assert!(!fields.is_featured);
    assert_eq!(fields.image_url.as_deref(), Some("https://img.example.com/a.jpg"));
    assert_eq!(
        fields.images.as_deref().map(<[String]>::len),
        Some(2)
    );
    assert_eq!(fields.package_dimensions.as_deref(), Some("10x10x14"));
}

// =============================================================================
// Price mapping
// =============================================================================

#[test]
fn imported_prices_convert_minor_units() {
    let fields = new_price_fields(&upstream_price("price_1", true, 4500), &local_product(), false);

    assert_eq!(fields.unit_amount, Decimal::new(4500, 2));
    assert_eq!(fields.unit_amount_minor, Some(4500));
    assert_eq!(fields.currency, "USD");
    assert_eq!(fields.price_type, PriceType::OneTime);
    assert_eq!(fields.product_id, ProductId::new(3));
}

#[test]
fn first_active_price_can_be_marked_current() {
    let fields = new_price_fields(&upstream_price("price_1", true, 4500), &local_product(), true);
    assert!(fields.is_current);
}

#[test]
fn resync_never_touches_the_current_flag() {
    let fields = resync_price_fields(&upstream_price("price_1", false, 4500));

    assert!(fields.is_current.is_none());
    // Deactivation upstream propagates; the row itself survives
    assert_eq!(fields.active, Some(false));
}

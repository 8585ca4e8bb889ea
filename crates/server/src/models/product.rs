//! Catalog product.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dandeline_core::{CategoryId, ProductId};

use super::category::default_true;
use super::{Category, LineItem, Price};

/// A catalog product.
///
/// `stripe_product_id` is the reconciliation key for catalog import; it
/// stays `None` for products created by hand.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub stripe_product_id: Option<String>,
    pub category_id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub sku: Option<String>,
    pub image_url: Option<String>,
    pub images: Option<Vec<String>>,
    /// Shipping dimensions as "LxWxH" (inches), as reported upstream.
    pub package_dimensions: Option<String>,
    /// Weight in ounces.
    pub weight: Option<Decimal>,
    pub shippable: bool,
    pub tax_code: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub unit_label: Option<String>,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prices: Option<Vec<Price>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_items: Option<Vec<LineItem>>,
}

impl Product {
    /// The current display price, when prices are loaded.
    #[must_use]
    pub fn current_price(&self) -> Option<&Price> {
        self.prices
            .as_deref()
            .and_then(|prices| prices.iter().find(|p| p.is_current))
    }
}

/// Eager-loadable relations of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductRelation {
    Category,
    Prices,
    LineItems,
}

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    #[serde(default)]
    pub stripe_product_id: Option<String>,
    pub category_id: CategoryId,
    pub name: String,
    /// Derived from `name` by the service when absent.
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub package_dimensions: Option<String>,
    #[serde(default)]
    pub weight: Option<Decimal>,
    #[serde(default = "default_true")]
    pub shippable: bool,
    #[serde(default)]
    pub tax_code: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub unit_label: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
}

/// Partial update of a product. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProduct {
    pub stripe_product_id: Option<String>,
    pub category_id: Option<CategoryId>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub image_url: Option<String>,
    pub images: Option<Vec<String>>,
    pub package_dimensions: Option<String>,
    pub weight: Option<Decimal>,
    pub shippable: Option<bool>,
    pub tax_code: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub unit_label: Option<String>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

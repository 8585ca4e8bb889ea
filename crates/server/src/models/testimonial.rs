//! Customer testimonial.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dandeline_core::TestimonialId;

use super::category::default_true;

/// A customer testimonial shown on the storefront.
#[derive(Debug, Clone, Serialize)]
pub struct Testimonial {
    pub id: TestimonialId,
    pub name: String,
    pub title: Option<String>,
    pub quote: String,
    pub is_featured: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a testimonial.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTestimonial {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    pub quote: String,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Partial update of a testimonial. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTestimonial {
    pub name: Option<String>,
    pub title: Option<String>,
    pub quote: Option<String>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
}

//! Contact form message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dandeline_core::ContactMessageId;

/// A message submitted through the contact form.
#[derive(Debug, Clone, Serialize)]
pub struct ContactMessage {
    pub id: ContactMessageId,
    pub name: String,
    pub business_name: Option<String>,
    pub email: String,
    pub phone_number: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a contact message.
#[derive(Debug, Clone, Deserialize)]
pub struct NewContactMessage {
    pub name: String,
    #[serde(default)]
    pub business_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
}

/// Partial update of a contact message. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContactMessage {
    pub is_read: Option<bool>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

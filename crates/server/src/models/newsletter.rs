//! Newsletter subscribers and templates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dandeline_core::{NewsletterSubscriberId, NewsletterTemplateId, SubscriberStatus, TemplateStatus};

/// A newsletter subscriber.
#[derive(Debug, Clone, Serialize)]
pub struct NewsletterSubscriber {
    pub id: NewsletterSubscriberId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub status: SubscriberStatus,
    pub subscribed_at: Option<DateTime<Utc>>,
    pub unsubscribed_at: Option<DateTime<Utc>>,
    pub source: Option<String>,
    pub preferences: Option<serde_json::Value>,
    pub tags: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a subscriber.
#[derive(Debug, Clone, Deserialize)]
pub struct NewNewsletterSubscriber {
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub status: SubscriberStatus,
    #[serde(default)]
    pub subscribed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub preferences: Option<serde_json::Value>,
    #[serde(default)]
    pub tags: Option<serde_json::Value>,
}

/// Partial update of a subscriber. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNewsletterSubscriber {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub status: Option<SubscriberStatus>,
    pub subscribed_at: Option<DateTime<Utc>>,
    pub unsubscribed_at: Option<DateTime<Utc>>,
    pub source: Option<String>,
    pub preferences: Option<serde_json::Value>,
    pub tags: Option<serde_json::Value>,
}

/// A newsletter email template with send statistics.
#[derive(Debug, Clone, Serialize)]
pub struct NewsletterTemplate {
    pub id: NewsletterTemplateId,
    pub name: String,
    pub subject: String,
    pub content: String,
    pub preview_text: Option<String>,
    pub status: TemplateStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub recipients_count: i32,
    pub opens_count: i32,
    pub clicks_count: i32,
    pub tags: Option<serde_json::Value>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a template.
#[derive(Debug, Clone, Deserialize)]
pub struct NewNewsletterTemplate {
    pub name: String,
    pub subject: String,
    pub content: String,
    #[serde(default)]
    pub preview_text: Option<String>,
    #[serde(default)]
    pub status: TemplateStatus,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Option<serde_json::Value>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// Partial update of a template. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNewsletterTemplate {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub content: Option<String>,
    pub preview_text: Option<String>,
    pub status: Option<TemplateStatus>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub recipients_count: Option<i32>,
    pub opens_count: Option<i32>,
    pub clicks_count: Option<i32>,
    pub tags: Option<serde_json::Value>,
    pub metadata: Option<serde_json::Value>,
}

//! In-app admin notification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dandeline_core::{NotificationId, NotificationType};

/// An in-app notification shown on the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub action_url: Option<String>,
    pub action_text: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a notification.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewNotification {
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub action_url: Option<String>,
    #[serde(default)]
    pub action_text: Option<String>,
}

//! Sales lead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dandeline_core::{LeadId, LeadSource, LeadStatus};

/// A sales lead in the CRM pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub company: Option<String>,
    pub status: LeadStatus,
    pub source: Option<LeadSource>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a lead.
#[derive(Debug, Clone, Deserialize)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub source: Option<LeadSource>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update of a lead. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLead {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub company: Option<String>,
    pub status: Option<LeadStatus>,
    pub source: Option<LeadSource>,
    pub notes: Option<String>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type LeadId = i64;

pub const LEAD_SOURCE_IMPORT: &str = "import";
pub const LEAD_STATUS_NEW: &str = "new";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub details: Option<String>,
    pub source: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

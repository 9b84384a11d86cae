use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// An employee inquiry awaiting an HR/admin decision.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Inquiry {
    pub id: u64,
    /// Generated reference code handed back to the submitter.
    pub reference: String,
    pub employee_id: u64,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub decline_notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum InquiryStatus {
    Pending,
    Approved,
    Declined,
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: u64,
    pub assigned_by: u64,
    pub deadline: Option<NaiveDate>,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum TaskStatus {
    Pending,
    #[strum(serialize = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_literals_match_the_dashboard() {
        assert_eq!(TaskStatus::InProgress.to_string(), "In Progress");
        assert_eq!(TaskStatus::from_str("In Progress").unwrap(), TaskStatus::InProgress);
        assert!(TaskStatus::from_str("Done").is_err());
    }
}

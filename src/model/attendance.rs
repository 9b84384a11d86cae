use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// One attendance log row. Hour buckets are never stored; they are
/// recomputed from the clock times on every read.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttendanceLog {
    pub id: u64,
    pub employee_id: u64,
    pub date: NaiveDate,
    pub clock_in: Option<NaiveTime>,
    pub clock_out: Option<NaiveTime>,
    pub status: String,
}

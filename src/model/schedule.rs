use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::timeclock::{ShiftPolicy, TimeClockError};

/// A work schedule row. Carries the shift-policy columns; the validated
/// [`ShiftPolicy`] is derived through [`Schedule::shift_policy`], never
/// assembled by hand elsewhere.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Schedule {
    pub id: u64,
    pub employee_id: u64,
    pub schedule_name: String,
    pub schedule_type: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Comma-separated weekday names, e.g. "Mon,Tue,Wed".
    pub work_days: String,
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    pub lateness_grace_min: u32,
    pub absence_grace_min: u32,
    pub full_day_cap: f64,
    pub half_day_cap: f64,
}

impl Schedule {
    pub fn shift_policy(&self) -> Result<ShiftPolicy, TimeClockError> {
        ShiftPolicy::new(
            self.work_start,
            self.work_end,
            parse_work_days(&self.work_days)?,
            self.lateness_grace_min,
            self.absence_grace_min,
            self.full_day_cap,
            self.half_day_cap,
        )
    }
}

/// Parses the stored weekday list ("Mon,Tue" or full names, any case).
pub fn parse_work_days(raw: &str) -> Result<Vec<Weekday>, TimeClockError> {
    let mut days = Vec::new();
    for token in raw.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let day = Weekday::from_str(token).map_err(|_| TimeClockError::InvalidPolicy {
            message: format!("unknown work day '{token}'"),
        })?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    if days.is_empty() {
        return Err(TimeClockError::InvalidPolicy {
            message: "work_days is empty".to_string(),
        });
    }
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_abbreviated_and_full_names() {
        assert_eq!(
            parse_work_days("Mon,Tue,Wednesday").unwrap(),
            vec![Weekday::Mon, Weekday::Tue, Weekday::Wed]
        );
    }

    #[test]
    fn deduplicates_and_trims() {
        assert_eq!(
            parse_work_days(" mon , Mon ,tue").unwrap(),
            vec![Weekday::Mon, Weekday::Tue]
        );
    }

    #[test]
    fn rejects_unknown_day_and_empty_list() {
        assert!(parse_work_days("Mon,Funday").is_err());
        assert!(parse_work_days("").is_err());
        assert!(parse_work_days(" , ,").is_err());
    }

    #[test]
    fn schedule_row_yields_validated_policy() {
        let schedule = Schedule {
            id: 1,
            employee_id: 7,
            schedule_name: "Development Team Schedule".to_string(),
            schedule_type: "Full Time".to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            work_days: "Mon,Tue,Wed,Thu,Fri".to_string(),
            work_start: NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
            work_end: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            lateness_grace_min: 15,
            absence_grace_min: 30,
            full_day_cap: 8.0,
            half_day_cap: 4.0,
        };
        let policy = schedule.shift_policy().unwrap();
        assert!(policy.is_work_day(Weekday::Fri));
        assert!(!policy.is_work_day(Weekday::Sat));
    }

    #[test]
    fn contradictory_grace_columns_fail_policy_derivation() {
        let schedule = Schedule {
            id: 2,
            employee_id: 7,
            schedule_name: "Broken".to_string(),
            schedule_type: "Full Time".to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            work_days: "Mon".to_string(),
            work_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            work_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            lateness_grace_min: 30,
            absence_grace_min: 15,
            full_day_cap: 8.0,
            half_day_cap: 4.0,
        };
        assert!(schedule.shift_policy().is_err());
    }
}

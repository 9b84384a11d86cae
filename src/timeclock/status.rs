use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};
use utoipa::ToSchema;

use super::error::TimeClockError;

/// Attendance status for a single work day.
///
/// The wire form matches the dashboard's five literals, including the
/// space in `"Half Day"`. May be supplied externally (manual override on a
/// log row) or derived from the clock-in via [`super::classify_attendance`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    #[strum(serialize = "Half Day")]
    #[serde(rename = "Half Day")]
    HalfDay,
    Leave,
}

impl AttendanceStatus {
    /// Parses a status literal, surfacing `UnknownStatus` instead of the
    /// silent 8-hour-cap fallback the old dashboard applied.
    pub fn parse(value: &str) -> Result<Self, TimeClockError> {
        Self::from_str(value.trim()).map_err(|_| TimeClockError::UnknownStatus {
            value: value.to_string(),
        })
    }
}

impl Default for AttendanceStatus {
    fn default() -> Self {
        AttendanceStatus::Present
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_five_literals() {
        assert_eq!(AttendanceStatus::parse("Present").unwrap(), AttendanceStatus::Present);
        assert_eq!(AttendanceStatus::parse("Absent").unwrap(), AttendanceStatus::Absent);
        assert_eq!(AttendanceStatus::parse("Late").unwrap(), AttendanceStatus::Late);
        assert_eq!(AttendanceStatus::parse("Half Day").unwrap(), AttendanceStatus::HalfDay);
        assert_eq!(AttendanceStatus::parse("Leave").unwrap(), AttendanceStatus::Leave);
    }

    #[test]
    fn half_day_round_trips_with_space() {
        assert_eq!(AttendanceStatus::HalfDay.to_string(), "Half Day");
    }

    #[test]
    fn unknown_literal_is_an_error_not_a_fallback() {
        let err = AttendanceStatus::parse("Vacation").unwrap_err();
        assert!(matches!(err, TimeClockError::UnknownStatus { .. }));
    }
}

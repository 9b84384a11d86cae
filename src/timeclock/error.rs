use chrono::NaiveTime;
use thiserror::Error;

/// Errors produced by the time-accounting core.
///
/// Write paths surface these as 400 responses; read paths that only display
/// hours degrade to a zeroed result and log a warning instead, so one bad
/// row never fails a whole listing.
#[derive(Debug, Error)]
pub enum TimeClockError {
    /// A clock value was neither a valid `HH:MM` time nor the `--` sentinel.
    #[error("invalid time value '{value}', expected HH:MM or --")]
    InvalidTimeFormat { value: String },

    /// An attendance status string did not match any known status.
    #[error("unknown attendance status '{value}'")]
    UnknownStatus { value: String },

    /// A shift policy failed validation at construction time.
    #[error("invalid shift policy: {message}")]
    InvalidPolicy { message: String },

    /// Clock-out earlier than clock-in. Shifts are interpreted within one
    /// calendar day; overnight wrap is rejected, not silently negative.
    #[error("clock-out {clock_out} is earlier than clock-in {clock_in}")]
    ClockOutBeforeClockIn {
        clock_in: NaiveTime,
        clock_out: NaiveTime,
    },
}

pub type TimeClockResult<T> = Result<T, TimeClockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_time_format_displays_value() {
        let err = TimeClockError::InvalidTimeFormat {
            value: "9am".to_string(),
        };
        assert_eq!(err.to_string(), "invalid time value '9am', expected HH:MM or --");
    }

    #[test]
    fn clock_order_error_displays_both_times() {
        let err = TimeClockError::ClockOutBeforeClockIn {
            clock_in: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            clock_out: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "clock-out 09:00:00 is earlier than clock-in 17:00:00"
        );
    }
}

use chrono::{Duration, NaiveTime, Weekday};

use super::error::TimeClockError;
use super::status::AttendanceStatus;

/// Expected work days/hours and grace periods for one schedule.
///
/// A policy can only be obtained through [`ShiftPolicy::new`], so every
/// instance in the system is internally consistent: misconfiguration is
/// rejected when the policy is loaded, never discovered per record.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftPolicy {
    work_start: NaiveTime,
    work_end: NaiveTime,
    work_days: Vec<Weekday>,
    lateness_grace_min: u32,
    absence_grace_min: u32,
    full_day_cap: f64,
    half_day_cap: f64,
}

impl ShiftPolicy {
    pub fn new(
        work_start: NaiveTime,
        work_end: NaiveTime,
        work_days: Vec<Weekday>,
        lateness_grace_min: u32,
        absence_grace_min: u32,
        full_day_cap: f64,
        half_day_cap: f64,
    ) -> Result<Self, TimeClockError> {
        if work_end <= work_start {
            return Err(invalid(format!(
                "work_end {} must be after work_start {}",
                work_end, work_start
            )));
        }
        if absence_grace_min < lateness_grace_min {
            return Err(invalid(format!(
                "absence grace ({absence_grace_min}m) shorter than lateness grace ({lateness_grace_min}m)"
            )));
        }
        // Grace windows must stay within the calendar day, otherwise the
        // classification comparisons wrap past midnight.
        let (_, wrapped) = work_start
            .overflowing_add_signed(Duration::minutes(i64::from(absence_grace_min)));
        if wrapped != 0 {
            return Err(invalid("absence grace window extends past midnight".into()));
        }
        if !full_day_cap.is_finite() || !half_day_cap.is_finite() {
            return Err(invalid("hour caps must be finite".into()));
        }
        if full_day_cap < 0.0 || half_day_cap < 0.0 {
            return Err(invalid("hour caps must not be negative".into()));
        }
        if half_day_cap > full_day_cap {
            return Err(invalid(format!(
                "half-day cap ({half_day_cap}) exceeds full-day cap ({full_day_cap})"
            )));
        }
        Ok(Self {
            work_start,
            work_end,
            work_days,
            lateness_grace_min,
            absence_grace_min,
            full_day_cap,
            half_day_cap,
        })
    }

    pub fn work_start(&self) -> NaiveTime {
        self.work_start
    }

    pub fn work_end(&self) -> NaiveTime {
        self.work_end
    }

    pub fn is_work_day(&self, day: Weekday) -> bool {
        self.work_days.contains(&day)
    }

    /// Latest clock-in still classified Present.
    pub fn lateness_deadline(&self) -> NaiveTime {
        self.work_start + Duration::minutes(i64::from(self.lateness_grace_min))
    }

    /// Latest clock-in still classified Late; anything after is Absent.
    pub fn absence_deadline(&self) -> NaiveTime {
        self.work_start + Duration::minutes(i64::from(self.absence_grace_min))
    }

    /// Maximum hours counted as "regular" for the given status. Status
    /// overrides raw duration: an Absent/Leave row caps at zero even when
    /// both clock times are present.
    pub fn regular_hours_cap(&self, status: AttendanceStatus) -> f64 {
        match status {
            AttendanceStatus::Present | AttendanceStatus::Late => self.full_day_cap,
            AttendanceStatus::HalfDay => self.half_day_cap,
            AttendanceStatus::Absent | AttendanceStatus::Leave => 0.0,
        }
    }
}

impl Default for ShiftPolicy {
    /// Nine-to-five, Monday through Friday, 15/30 minute grace windows and
    /// the 8/4 hour caps the dashboard assumed.
    fn default() -> Self {
        Self {
            work_start: NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"),
            work_end: NaiveTime::from_hms_opt(17, 0, 0).expect("valid time"),
            work_days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            lateness_grace_min: 15,
            absence_grace_min: 30,
            full_day_cap: 8.0,
            half_day_cap: 4.0,
        }
    }
}

fn invalid(message: String) -> TimeClockError {
    TimeClockError::InvalidPolicy { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn weekdays() -> Vec<Weekday> {
        vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri]
    }

    #[test]
    fn rejects_absence_grace_shorter_than_lateness_grace() {
        let err = ShiftPolicy::new(t(9, 0), t(17, 0), weekdays(), 30, 15, 8.0, 4.0).unwrap_err();
        assert!(matches!(err, TimeClockError::InvalidPolicy { .. }));
    }

    #[test]
    fn rejects_work_end_not_after_work_start() {
        assert!(ShiftPolicy::new(t(17, 0), t(9, 0), weekdays(), 15, 30, 8.0, 4.0).is_err());
        assert!(ShiftPolicy::new(t(9, 0), t(9, 0), weekdays(), 15, 30, 8.0, 4.0).is_err());
    }

    #[test]
    fn rejects_half_day_cap_above_full_day_cap() {
        let err = ShiftPolicy::new(t(9, 0), t(17, 0), weekdays(), 15, 30, 4.0, 8.0).unwrap_err();
        assert!(matches!(err, TimeClockError::InvalidPolicy { .. }));
    }

    #[test]
    fn rejects_grace_window_wrapping_past_midnight() {
        let err =
            ShiftPolicy::new(t(23, 50), t(23, 59), weekdays(), 5, 20, 8.0, 4.0).unwrap_err();
        assert!(matches!(err, TimeClockError::InvalidPolicy { .. }));
    }

    #[test]
    fn equal_grace_windows_are_allowed() {
        assert!(ShiftPolicy::new(t(9, 0), t(17, 0), weekdays(), 15, 15, 8.0, 4.0).is_ok());
    }

    #[test]
    fn caps_follow_status() {
        let policy = ShiftPolicy::default();
        assert_eq!(policy.regular_hours_cap(AttendanceStatus::Present), 8.0);
        assert_eq!(policy.regular_hours_cap(AttendanceStatus::Late), 8.0);
        assert_eq!(policy.regular_hours_cap(AttendanceStatus::HalfDay), 4.0);
        assert_eq!(policy.regular_hours_cap(AttendanceStatus::Absent), 0.0);
        assert_eq!(policy.regular_hours_cap(AttendanceStatus::Leave), 0.0);
    }

    #[test]
    fn deadlines_add_grace_to_work_start() {
        let policy = ShiftPolicy::default();
        assert_eq!(policy.lateness_deadline(), t(9, 15));
        assert_eq!(policy.absence_deadline(), t(9, 30));
    }

    #[test]
    fn work_day_membership() {
        let policy = ShiftPolicy::default();
        assert!(policy.is_work_day(Weekday::Wed));
        assert!(!policy.is_work_day(Weekday::Sun));
    }
}

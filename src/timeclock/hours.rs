use chrono::NaiveTime;
use serde::Serialize;

use super::error::TimeClockError;
use super::policy::ShiftPolicy;
use super::status::AttendanceStatus;

/// Wire sentinel for "no clock event recorded".
pub const CLOCK_SENTINEL: &str = "--";

/// Hour buckets derived from one attendance record.
///
/// Values are kept unrounded; display rounding to one decimal happens at
/// the serialization edge via [`ComputedHours::rounded`], and only after
/// any aggregation across days, so payroll totals do not accumulate
/// per-day rounding error.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ComputedHours {
    pub total: f64,
    pub regular: f64,
    pub overtime: f64,
}

impl ComputedHours {
    /// The "not computable" result callers get when either clock event is
    /// missing. All-zero means "could not compute", not "zero worked".
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn rounded(self) -> Self {
        Self {
            total: round1(self.total),
            regular: round1(self.regular),
            overtime: round1(self.overtime),
        }
    }
}

/// Rounds to one decimal digit for display.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Normalizes a clock string from the wire.
///
/// `"--"`, the empty string and pure whitespace all mean "no event";
/// anything else must parse as a 24-hour `HH:MM` (seconds tolerated).
pub fn parse_clock(value: &str) -> Result<Option<NaiveTime>, TimeClockError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == CLOCK_SENTINEL {
        return Ok(None);
    }
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map(Some)
        .map_err(|_| TimeClockError::InvalidTimeFormat {
            value: trimmed.to_string(),
        })
}

/// Formats a clock value back into its wire form.
pub fn format_clock(value: Option<NaiveTime>) -> String {
    match value {
        Some(t) => t.format("%H:%M").to_string(),
        None => CLOCK_SENTINEL.to_string(),
    }
}

/// Converts a clock-in/out pair into hour buckets under the given policy.
///
/// Either side missing yields the zero result without attempting a partial
/// computation. A clock-out earlier than the clock-in is rejected: shifts
/// are interpreted within a single calendar day and never wrap overnight.
///
/// Invariant: `regular + overtime == total` whenever both times are
/// present, before and after rounding (within one-decimal tolerance).
pub fn compute_hours(
    clock_in: Option<NaiveTime>,
    clock_out: Option<NaiveTime>,
    status: AttendanceStatus,
    policy: &ShiftPolicy,
) -> Result<ComputedHours, TimeClockError> {
    let (Some(start), Some(end)) = (clock_in, clock_out) else {
        return Ok(ComputedHours::zero());
    };
    if end < start {
        return Err(TimeClockError::ClockOutBeforeClockIn {
            clock_in: start,
            clock_out: end,
        });
    }

    let total = (end - start).num_seconds() as f64 / 3600.0;
    let cap = policy.regular_hours_cap(status);
    let regular = total.min(cap);
    let overtime = (total - cap).max(0.0);

    Ok(ComputedHours {
        total,
        regular,
        overtime,
    })
}

/// Sums unrounded hour buckets across records (payroll-period totals).
pub fn aggregate<I>(items: I) -> ComputedHours
where
    I: IntoIterator<Item = ComputedHours>,
{
    items.into_iter().fold(ComputedHours::zero(), |acc, h| ComputedHours {
        total: acc.total + h.total,
        regular: acc.regular + h.regular,
        overtime: acc.overtime + h.overtime,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn policy() -> ShiftPolicy {
        ShiftPolicy::default()
    }

    #[test]
    fn late_day_with_overtime() {
        // 09:15 - 18:00 is 8.75h; Late caps regular at 8.
        let hours = compute_hours(
            Some(t(9, 15)),
            Some(t(18, 0)),
            AttendanceStatus::Late,
            &policy(),
        )
        .unwrap();
        assert_eq!(hours.total, 8.75);
        assert_eq!(hours.regular, 8.0);
        assert_eq!(hours.overtime, 0.75);

        let display = hours.rounded();
        assert_eq!(display.total, 8.8);
        assert_eq!(display.overtime, 0.8);
    }

    #[test]
    fn half_day_fills_its_cap_exactly() {
        let hours = compute_hours(
            Some(t(9, 0)),
            Some(t(13, 0)),
            AttendanceStatus::HalfDay,
            &policy(),
        )
        .unwrap();
        assert_eq!(hours.total, 4.0);
        assert_eq!(hours.regular, 4.0);
        assert_eq!(hours.overtime, 0.0);
    }

    #[test]
    fn absent_caps_regular_at_zero_even_with_clock_times() {
        let hours = compute_hours(
            Some(t(9, 0)),
            Some(t(17, 0)),
            AttendanceStatus::Absent,
            &policy(),
        )
        .unwrap();
        // total still reflects raw elapsed time
        assert_eq!(hours.total, 8.0);
        assert_eq!(hours.regular, 0.0);
        assert_eq!(hours.overtime, 8.0);
    }

    #[test]
    fn missing_clock_in_yields_zero_result() {
        let hours =
            compute_hours(None, Some(t(17, 0)), AttendanceStatus::Present, &policy()).unwrap();
        assert_eq!(hours, ComputedHours::zero());
    }

    #[test]
    fn missing_clock_out_yields_zero_result() {
        let hours =
            compute_hours(Some(t(9, 0)), None, AttendanceStatus::Present, &policy()).unwrap();
        assert_eq!(hours, ComputedHours::zero());
    }

    #[test]
    fn clock_out_before_clock_in_is_rejected() {
        let err = compute_hours(
            Some(t(17, 0)),
            Some(t(9, 0)),
            AttendanceStatus::Present,
            &policy(),
        )
        .unwrap_err();
        assert!(matches!(err, TimeClockError::ClockOutBeforeClockIn { .. }));
    }

    #[test]
    fn sentinel_and_empty_normalize_to_missing() {
        assert_eq!(parse_clock("--").unwrap(), None);
        assert_eq!(parse_clock("").unwrap(), None);
        assert_eq!(parse_clock("   ").unwrap(), None);
    }

    #[test]
    fn parses_hh_mm_and_hh_mm_ss() {
        assert_eq!(parse_clock("09:15").unwrap(), Some(t(9, 15)));
        assert_eq!(parse_clock("09:15:00").unwrap(), Some(t(9, 15)));
    }

    #[test]
    fn malformed_clock_is_an_error() {
        assert!(matches!(
            parse_clock("9am").unwrap_err(),
            TimeClockError::InvalidTimeFormat { .. }
        ));
        assert!(matches!(
            parse_clock("25:00").unwrap_err(),
            TimeClockError::InvalidTimeFormat { .. }
        ));
    }

    #[test]
    fn format_clock_round_trips_the_sentinel() {
        assert_eq!(format_clock(None), "--");
        assert_eq!(format_clock(Some(t(8, 5))), "08:05");
    }

    #[test]
    fn aggregate_sums_before_rounding() {
        // Three days of 7h45m: per-day display rounding would give 7.8 * 3
        // = 23.4; the true sum is 23.25, displayed as 23.3.
        let day = compute_hours(
            Some(t(9, 0)),
            Some(t(16, 45)),
            AttendanceStatus::Present,
            &policy(),
        )
        .unwrap();
        let period = aggregate([day, day, day]).rounded();
        assert_eq!(period.total, 23.3);
    }

    #[test]
    fn rounding_is_one_decimal() {
        assert_eq!(round1(8.749), 8.7);
        assert_eq!(round1(8.75), 8.8);
        assert_eq!(round1(0.0), 0.0);
    }

    proptest! {
        /// For any valid ordered pair, the buckets partition the total.
        #[test]
        fn regular_plus_overtime_equals_total(
            start_min in 0u32..1440,
            len_min in 0u32..720,
            status_idx in 0usize..5,
        ) {
            prop_assume!(start_min + len_min < 1440);
            let statuses = [
                AttendanceStatus::Present,
                AttendanceStatus::Absent,
                AttendanceStatus::Late,
                AttendanceStatus::HalfDay,
                AttendanceStatus::Leave,
            ];
            let start = NaiveTime::from_hms_opt(start_min / 60, start_min % 60, 0).unwrap();
            let end_min = start_min + len_min;
            let end = NaiveTime::from_hms_opt(end_min / 60, end_min % 60, 0).unwrap();

            let hours =
                compute_hours(Some(start), Some(end), statuses[status_idx], &policy()).unwrap();
            prop_assert!((hours.regular + hours.overtime - hours.total).abs() < 1e-9);

            let rounded = hours.rounded();
            prop_assert!((rounded.regular + rounded.overtime - rounded.total).abs() <= 0.05 + 1e-9);
        }

        /// Absent and Leave always cap regular hours at zero.
        #[test]
        fn zero_cap_statuses_never_earn_regular_hours(
            start_min in 0u32..720,
            len_min in 0u32..700,
        ) {
            let start = NaiveTime::from_hms_opt(start_min / 60, start_min % 60, 0).unwrap();
            let end_min = start_min + len_min;
            let end = NaiveTime::from_hms_opt(end_min / 60, end_min % 60, 0).unwrap();

            for status in [AttendanceStatus::Absent, AttendanceStatus::Leave] {
                let hours = compute_hours(Some(start), Some(end), status, &policy()).unwrap();
                prop_assert_eq!(hours.regular, 0.0);
                prop_assert!((hours.overtime - hours.total).abs() < 1e-9);
            }
        }
    }
}

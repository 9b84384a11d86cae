use chrono::NaiveTime;

use super::policy::ShiftPolicy;
use super::status::AttendanceStatus;

/// Classifies a clock-in against the policy's two nested grace windows.
///
/// On time through the lateness grace is Present, inside the wider absence
/// grace is Late, anything later (or no clock-in at all) is Absent. Policy
/// validation guarantees the absence window is never the narrower one.
pub fn classify_attendance(
    clock_in: Option<NaiveTime>,
    policy: &ShiftPolicy,
) -> AttendanceStatus {
    let Some(clock_in) = clock_in else {
        return AttendanceStatus::Absent;
    };
    if clock_in <= policy.lateness_deadline() {
        AttendanceStatus::Present
    } else if clock_in <= policy.absence_deadline() {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Absent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    // Default policy: work start 09:00, lateness grace 15m, absence grace 30m.

    #[test]
    fn within_lateness_grace_is_present() {
        let policy = ShiftPolicy::default();
        assert_eq!(classify_attendance(Some(t(8, 30)), &policy), AttendanceStatus::Present);
        assert_eq!(classify_attendance(Some(t(9, 10)), &policy), AttendanceStatus::Present);
    }

    #[test]
    fn between_grace_windows_is_late() {
        let policy = ShiftPolicy::default();
        assert_eq!(classify_attendance(Some(t(9, 20)), &policy), AttendanceStatus::Late);
    }

    #[test]
    fn past_absence_grace_is_absent() {
        let policy = ShiftPolicy::default();
        assert_eq!(classify_attendance(Some(t(9, 45)), &policy), AttendanceStatus::Absent);
    }

    #[test]
    fn missing_clock_in_is_absent() {
        let policy = ShiftPolicy::default();
        assert_eq!(classify_attendance(None, &policy), AttendanceStatus::Absent);
    }

    #[test]
    fn window_boundaries_are_inclusive() {
        let policy = ShiftPolicy::default();
        assert_eq!(classify_attendance(Some(t(9, 15)), &policy), AttendanceStatus::Present);
        assert_eq!(classify_attendance(Some(t(9, 30)), &policy), AttendanceStatus::Late);
        assert_eq!(
            classify_attendance(Some(t(9, 31)), &policy),
            AttendanceStatus::Absent
        );
    }
}

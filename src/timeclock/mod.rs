//! Attendance time accounting.
//!
//! Turns raw clock events and a shift policy into reportable hour buckets
//! (total / regular / overtime) and an attendance classification. Every
//! screen of the dashboard that shows hours goes through this one module;
//! the rules are not re-derived per endpoint.
//!
//! All functions here are pure and side-effect-free.

pub mod classify;
pub mod error;
pub mod hours;
pub mod policy;
pub mod status;

pub use classify::classify_attendance;
pub use error::{TimeClockError, TimeClockResult};
pub use hours::{ComputedHours, aggregate, compute_hours, format_clock, parse_clock, round1};
pub use policy::ShiftPolicy;
pub use status::AttendanceStatus;

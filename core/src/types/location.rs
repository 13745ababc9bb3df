use chrono::{NaiveDateTime, Timelike};

use super::Fixed4;

/// One tracked position of a registered vehicle: the unit of work of every
/// insert pathway.
///
/// Records carry no identity. The backend assigns a surrogate key on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRecord {
    pub registration_number: String,
    /// Wall-clock time of generation, truncated to centiseconds.
    pub tracked_when: NaiveDateTime,
    pub longitude: Fixed4,
    pub latitude: Fixed4,
}

impl LocationRecord {
    /// `tracked_when` in its persisted text form.
    pub fn tracked_when_text(&self) -> String {
        format_tracked_when(&self.tracked_when)
    }
}

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS.cc`.
pub fn format_tracked_when(ts: &NaiveDateTime) -> String {
    format!(
        "{}.{:02}",
        ts.format("%Y-%m-%d %H:%M:%S"),
        ts.nanosecond() % 1_000_000_000 / 10_000_000
    )
}

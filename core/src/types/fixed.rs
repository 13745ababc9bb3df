use std::fmt;

use crate::constants::{COORDINATE_PRECISION, COORDINATE_SCALE_DIGITS};

/// Fixed-point decimal with four fractional digits, stored as the value
/// multiplied by [`Fixed4::SCALE`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed4(i64);

impl Fixed4 {
    pub const SCALE: i64 = 10i64.pow(COORDINATE_SCALE_DIGITS);
    pub const ZERO: Fixed4 = Fixed4(0);
    /// Exclusive bound on the magnitude of a raw value that fits a
    /// DECIMAL(18, 4) column.
    pub const COLUMN_LIMIT: i64 = 10i64.pow(COORDINATE_PRECISION);

    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn from_int(value: i64) -> Self {
        Self(value * Self::SCALE)
    }

    /// The scaled integer, as persisted in the coordinate columns.
    pub const fn raw(self) -> i64 {
        self.0
    }

    pub fn integer_part(self) -> i64 {
        self.0 / Self::SCALE
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }
}

impl fmt::Display for Fixed4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = Self::SCALE as u64;
        write!(f, "{sign}{}.{:04}", abs / scale, abs % scale)
    }
}

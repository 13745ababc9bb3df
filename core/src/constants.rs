//! Workload constants shared by the generator and the storage pathways.

/// Rows inserted per pathway by the reference workload.
pub const DEFAULT_ROW_COUNT: u64 = 50_000;

/// Registration numbers cycle through this many distinct codes.
pub const REGISTRATION_CYCLE: u64 = 100;
/// Zero-padded width of the numeric part of a registration number.
pub const REGISTRATION_DIGITS: usize = 3;
pub const REGISTRATION_PREFIX: &str = "EA";
pub const REGISTRATION_SUFFIX: &str = "-GL";
/// Column width of `registration_number` in every pathway table.
pub const REGISTRATION_MAX_LEN: usize = 20;

/// Fractional digits of every coordinate column.
pub const COORDINATE_SCALE_DIGITS: u32 = 4;
/// Total digits of every coordinate column.
pub const COORDINATE_PRECISION: u32 = 18;
/// Generated coordinates lie in `[0, COORDINATE_UPPER_BOUND)`.
pub const COORDINATE_UPPER_BOUND: i64 = 100;

/// Timestamps keep this many fractional-second digits.
pub const TIMESTAMP_SUBSEC_DIGITS: u16 = 2;

// Fixed record written by the compiled pathway.
pub const TEMPLATE_REGISTRATION: &str = "EA-232-JB";
/// 125.4 at scale 4.
pub const TEMPLATE_LONGITUDE_RAW: i64 = 1_254_000;
/// 132.7 at scale 4.
pub const TEMPLATE_LATITUDE_RAW: i64 = 1_327_000;

//! Record generator: synthetic location records indexed by a counter.
//!
//! The registration number is a pure function of the counter. The timestamp
//! and coordinates come from an injected [`Clock`] and random source, so
//! tests can pin both.

use chrono::{Local, NaiveDateTime, SubsecRound};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{
    COORDINATE_UPPER_BOUND, REGISTRATION_CYCLE, REGISTRATION_DIGITS, REGISTRATION_PREFIX,
    REGISTRATION_SUFFIX, TEMPLATE_LATITUDE_RAW, TEMPLATE_LONGITUDE_RAW, TEMPLATE_REGISTRATION,
    TIMESTAMP_SUBSEC_DIGITS,
};
use crate::types::{Fixed4, LocationRecord};

/// Source of "now" for generated records.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// `"EA" + zero-padded(counter mod 100, width 3) + "-GL"`.
pub fn registration_number(counter: u64) -> String {
    format!(
        "{REGISTRATION_PREFIX}{:0width$}{REGISTRATION_SUFFIX}",
        counter % REGISTRATION_CYCLE,
        width = REGISTRATION_DIGITS
    )
}

/// The record the compiled pathway repeats for every row.
///
/// `tracked_when` is taken from `clock`. Every other field is fixed.
pub fn compiled_template(clock: &impl Clock) -> LocationRecord {
    LocationRecord {
        registration_number: TEMPLATE_REGISTRATION.to_string(),
        tracked_when: clock.now().trunc_subsecs(TIMESTAMP_SUBSEC_DIGITS),
        longitude: Fixed4::from_raw(TEMPLATE_LONGITUDE_RAW),
        latitude: Fixed4::from_raw(TEMPLATE_LATITUDE_RAW),
    }
}

pub struct RecordGenerator<C: Clock, R: Rng> {
    clock: C,
    rng: R,
}

impl RecordGenerator<SystemClock, StdRng> {
    /// Wall clock and an entropy-seeded random source.
    pub fn system() -> Self {
        Self::new(SystemClock, StdRng::from_entropy())
    }
}

impl<C: Clock, R: Rng> RecordGenerator<C, R> {
    pub fn new(clock: C, rng: R) -> Self {
        Self { clock, rng }
    }

    pub fn generate(&mut self, counter: u64) -> LocationRecord {
        LocationRecord {
            registration_number: registration_number(counter),
            tracked_when: self.clock.now().trunc_subsecs(TIMESTAMP_SUBSEC_DIGITS),
            longitude: self.coordinate(),
            latitude: self.coordinate(),
        }
    }

    fn coordinate(&mut self) -> Fixed4 {
        Fixed4::from_raw(self.rng.gen_range(0..COORDINATE_UPPER_BOUND * Fixed4::SCALE))
    }
}

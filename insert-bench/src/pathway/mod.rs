//! Insert pathways and the common `InsertPathway` trait.
//!
//! Three pathways share one capability contract but differ in storage
//! durability and dispatch cost:
//! - [`PathwayKind::Disk`]: file-backed table, one prepared `INSERT` per row
//! - [`PathwayKind::Memory`]: in-memory table, one prepared `INSERT` per row
//! - [`PathwayKind::CompiledMemory`]: in-memory table, the whole batch runs as
//!   one prepared statement inside the engine
//!
//! [`sqlite::SqlitePathway`] binds all three to SQLite.

pub mod sqlite;

use std::fmt;
use std::str::FromStr;

use bench_core::types::{Fixed4, LocationRecord};
use thiserror::Error;

use crate::error::BackendError;

/// Identity of a pathway. Callers dispatch on this, not on concrete types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathwayKind {
    Disk,
    Memory,
    CompiledMemory,
}

/// How a pathway consumes a workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workload {
    /// The runner generates each record and inserts it with one call.
    PerRow,
    /// The pathway generates and inserts the whole batch itself.
    FixedBatch,
}

impl PathwayKind {
    /// Every pathway, in reporting order.
    pub const ALL: [PathwayKind; 3] = [
        PathwayKind::Disk,
        PathwayKind::Memory,
        PathwayKind::CompiledMemory,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PathwayKind::Disk => "disk",
            PathwayKind::Memory => "memory",
            PathwayKind::CompiledMemory => "compiled-memory",
        }
    }

    pub fn workload(self) -> Workload {
        match self {
            PathwayKind::Disk | PathwayKind::Memory => Workload::PerRow,
            PathwayKind::CompiledMemory => Workload::FixedBatch,
        }
    }

    /// Table owned by this pathway. No pathway touches another's table.
    pub fn table_name(self) -> &'static str {
        match self {
            PathwayKind::Disk => "location_disk",
            PathwayKind::Memory => "location_memory",
            PathwayKind::CompiledMemory => "location_compiled",
        }
    }
}

impl fmt::Display for PathwayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown pathway '{0}' (expected disk, memory or compiled-memory)")]
pub struct UnknownPathway(pub String);

impl FromStr for PathwayKind {
    type Err = UnknownPathway;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disk" => Ok(PathwayKind::Disk),
            "memory" => Ok(PathwayKind::Memory),
            "compiled-memory" | "compiled" => Ok(PathwayKind::CompiledMemory),
            _ => Err(UnknownPathway(s.to_string())),
        }
    }
}

/// A row read back from a pathway table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredLocation {
    pub id: i64,
    pub registration_number: String,
    pub tracked_when: String,
    pub longitude: Fixed4,
    pub latitude: Fixed4,
}

/// Capability shared by every pathway.
///
/// A pathway is provisioned once and then benchmarked any number of times.
/// It holds no per-call state; everything a run touches lives in the
/// transaction returned by [`InsertPathway::begin`].
pub trait InsertPathway {
    fn kind(&self) -> PathwayKind;

    /// Human-readable name for reports.
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Create the pathway's table if it does not exist yet.
    fn provision(&mut self) -> Result<(), BackendError>;

    /// Fails with [`BackendError::Missing`] when the table is absent.
    fn verify_provisioned(&self) -> Result<(), BackendError>;

    /// Open the transaction scope for one run.
    fn begin(&mut self) -> Result<Box<dyn PathwayTransaction + '_>, BackendError>;

    fn row_count(&self) -> Result<u64, BackendError>;

    /// All rows in identity order.
    fn rows(&self) -> Result<Vec<StoredLocation>, BackendError>;

    /// Delete every row. Identities keep increasing afterwards.
    fn truncate(&mut self) -> Result<(), BackendError>;
}

/// Scoped transaction over one pathway table.
///
/// Dropping the scope without calling [`PathwayTransaction::commit`] rolls
/// back every row inserted through it.
pub trait PathwayTransaction {
    /// Insert one generated record. Per-row pathways only.
    fn insert_one(&mut self, record: &LocationRecord) -> Result<(), BackendError>;

    /// Insert `row_count` copies of the fixed template record in one
    /// backend call. Fixed-batch pathways only.
    fn insert_fixed_batch(&mut self, row_count: u64) -> Result<(), BackendError>;

    fn commit(self: Box<Self>) -> Result<(), BackendError>;
}

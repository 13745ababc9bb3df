//! SQLite bindings for the three pathways.
//!
//! Each pathway owns its own connection and table. Disk uses a database file
//! with full synchronous commits; both in-memory pathways use `:memory:`
//! tuned for latency.

use std::path::Path;

use bench_core::constants::REGISTRATION_MAX_LEN;
use bench_core::generator::{compiled_template, SystemClock};
use bench_core::types::{Fixed4, LocationRecord};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

use super::{InsertPathway, PathwayKind, PathwayTransaction, StoredLocation, Workload};
use crate::error::BackendError;

const INSERT_DISK_SQL: &str = "INSERT INTO location_disk
     (registration_number, tracked_when, longitude, latitude)
     VALUES (?1, ?2, ?3, ?4)";

const INSERT_MEMORY_SQL: &str = "INSERT INTO location_memory
     (registration_number, tracked_when, longitude, latitude)
     VALUES (?1, ?2, ?3, ?4)";

/// The whole batch as one statement: the engine expands the row sequence
/// and inserts every row without returning to the caller in between.
const COMPILED_BATCH_SQL: &str = "WITH RECURSIVE batch(n) AS (
         SELECT 0 WHERE ?1 > 0
         UNION ALL
         SELECT n + 1 FROM batch WHERE n + 1 < ?1
     )
     INSERT INTO location_compiled
         (registration_number, tracked_when, longitude, latitude)
     SELECT ?2, ?3, ?4, ?5 FROM batch";

/// Configure a connection for durable on-disk commits.
pub fn configure_disk_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = FULL;",
    )
}

/// Configure a connection for maximum in-memory performance.
pub fn configure_memory_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "PRAGMA synchronous = OFF;
         PRAGMA cache_size = -131072;
         PRAGMA temp_store = MEMORY;
         PRAGMA page_size = 4096;",
    )
}

/// Coordinates are stored as raw [`Fixed4`] integers, bounded like a
/// DECIMAL(18, 4) column.
fn create_table_sql(table: &str) -> String {
    let limit = Fixed4::COLUMN_LIMIT;
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            registration_number TEXT    NOT NULL CHECK (length(registration_number) <= {REGISTRATION_MAX_LEN}),
            tracked_when        TEXT    NOT NULL,
            longitude           INTEGER NOT NULL CHECK (longitude > -{limit} AND longitude < {limit}),
            latitude            INTEGER NOT NULL CHECK (latitude > -{limit} AND latitude < {limit})
        );"
    )
}

pub struct SqlitePathway {
    kind: PathwayKind,
    conn: Connection,
}

impl SqlitePathway {
    /// Durable pathway backed by the database file at `path`.
    pub fn open_disk(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        let conn = Connection::open(path).map_err(BackendError::Unavailable)?;
        configure_disk_connection(&conn).map_err(BackendError::Unavailable)?;
        Ok(Self {
            kind: PathwayKind::Disk,
            conn,
        })
    }

    pub fn open_memory() -> Result<Self, BackendError> {
        Self::open_in_memory(PathwayKind::Memory)
    }

    pub fn open_compiled_memory() -> Result<Self, BackendError> {
        Self::open_in_memory(PathwayKind::CompiledMemory)
    }

    /// Open the pathway for `kind`. `disk_path` is only used for
    /// [`PathwayKind::Disk`].
    pub fn open(kind: PathwayKind, disk_path: &Path) -> Result<Self, BackendError> {
        match kind {
            PathwayKind::Disk => Self::open_disk(disk_path),
            PathwayKind::Memory | PathwayKind::CompiledMemory => Self::open_in_memory(kind),
        }
    }

    fn open_in_memory(kind: PathwayKind) -> Result<Self, BackendError> {
        let conn = Connection::open_in_memory().map_err(BackendError::Unavailable)?;
        configure_memory_connection(&conn).map_err(BackendError::Unavailable)?;
        Ok(Self { kind, conn })
    }

    /// Underlying connection, for diagnostics and fault injection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn table(&self) -> &'static str {
        self.kind.table_name()
    }
}

impl InsertPathway for SqlitePathway {
    fn kind(&self) -> PathwayKind {
        self.kind
    }

    fn provision(&mut self) -> Result<(), BackendError> {
        self.conn.execute_batch(&create_table_sql(self.table()))?;
        log::debug!("{}: provisioned table {}", self.name(), self.table());
        Ok(())
    }

    fn verify_provisioned(&self) -> Result<(), BackendError> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [self.table()],
                |row| row.get(0),
            )
            .optional()?;
        match found {
            Some(_) => Ok(()),
            None => Err(BackendError::Missing(format!(
                "no such table: {}",
                self.table()
            ))),
        }
    }

    fn begin(&mut self) -> Result<Box<dyn PathwayTransaction + '_>, BackendError> {
        let kind = self.kind;
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        Ok(Box::new(SqliteTransaction { kind, tx }))
    }

    fn row_count(&self) -> Result<u64, BackendError> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", self.table()),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn rows(&self) -> Result<Vec<StoredLocation>, BackendError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, registration_number, tracked_when, longitude, latitude
             FROM {} ORDER BY id",
            self.table()
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok(StoredLocation {
                id: row.get(0)?,
                registration_number: row.get(1)?,
                tracked_when: row.get(2)?,
                longitude: Fixed4::from_raw(row.get(3)?),
                latitude: Fixed4::from_raw(row.get(4)?),
            })
        })?;
        let mut result = Vec::new();
        for r in rows {
            result.push(r?);
        }
        Ok(result)
    }

    fn truncate(&mut self) -> Result<(), BackendError> {
        let removed = self
            .conn
            .execute(&format!("DELETE FROM {}", self.table()), [])?;
        log::debug!("{}: truncated {removed} rows", self.name());
        Ok(())
    }
}

struct SqliteTransaction<'conn> {
    kind: PathwayKind,
    tx: Transaction<'conn>,
}

impl SqliteTransaction<'_> {
    fn require(&self, workload: Workload, operation: &'static str) -> Result<(), BackendError> {
        if self.kind.workload() == workload {
            Ok(())
        } else {
            Err(BackendError::Unsupported {
                pathway: self.kind.name(),
                operation,
            })
        }
    }
}

impl PathwayTransaction for SqliteTransaction<'_> {
    fn insert_one(&mut self, record: &LocationRecord) -> Result<(), BackendError> {
        self.require(Workload::PerRow, "insert_one")?;
        let sql = match self.kind {
            PathwayKind::Disk => INSERT_DISK_SQL,
            _ => INSERT_MEMORY_SQL,
        };
        let mut stmt = self.tx.prepare_cached(sql)?;
        stmt.execute(params![
            record.registration_number,
            record.tracked_when_text(),
            record.longitude.raw(),
            record.latitude.raw(),
        ])?;
        Ok(())
    }

    fn insert_fixed_batch(&mut self, row_count: u64) -> Result<(), BackendError> {
        self.require(Workload::FixedBatch, "insert_fixed_batch")?;
        let rows = i64::try_from(row_count).map_err(|_| BackendError::Unsupported {
            pathway: self.kind.name(),
            operation: "batches larger than i64::MAX rows",
        })?;
        let template = compiled_template(&SystemClock);
        let mut stmt = self.tx.prepare_cached(COMPILED_BATCH_SQL)?;
        stmt.execute(params![
            rows,
            template.registration_number,
            template.tracked_when_text(),
            template.longitude.raw(),
            template.latitude.raw(),
        ])?;
        Ok(())
    }

    fn commit(self: Box<Self>) -> Result<(), BackendError> {
        self.tx.commit()?;
        Ok(())
    }
}

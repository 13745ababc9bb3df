//! Benchmark runner: drives one workload through one pathway inside a single
//! transaction and times it.
//!
//! A run moves through `Idle -> Running -> Committed | Aborted`. Timing
//! brackets the whole transaction, from `begin` to `commit`. No result exists
//! for an aborted run.

use std::time::{Duration, Instant};

use bench_core::generator::{Clock, RecordGenerator};
use rand::Rng;

use crate::error::BenchError;
use crate::pathway::{InsertPathway, PathwayTransaction, Workload};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Committed,
    Aborted,
}

/// Timing of one fully committed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkResult {
    pub pathway_name: &'static str,
    pub row_count: u64,
    pub elapsed: Duration,
}

impl BenchmarkResult {
    pub fn elapsed_millis(&self) -> u128 {
        self.elapsed.as_millis()
    }

    /// Inserted rows per second, or 0 when nothing was measured.
    pub fn rows_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.row_count as f64 / secs
    }
}

pub struct BenchmarkRunner<C: Clock, R: Rng> {
    generator: RecordGenerator<C, R>,
    state: RunState,
}

impl<C: Clock, R: Rng> BenchmarkRunner<C, R> {
    pub fn new(generator: RecordGenerator<C, R>) -> Self {
        Self {
            generator,
            state: RunState::Idle,
        }
    }

    /// State reached by the most recent run.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Insert `row_count` rows through `pathway` as one transaction.
    ///
    /// Per-row pathways receive records for counters `0..row_count` in
    /// order; fixed-batch pathways receive a single batch call. Any failure
    /// rolls the transaction back and is returned unchanged.
    pub fn run(
        &mut self,
        pathway: &mut dyn InsertPathway,
        row_count: u64,
    ) -> Result<BenchmarkResult, BenchError> {
        let name = pathway.name();
        self.state = RunState::Idle;

        pathway
            .verify_provisioned()
            .map_err(|e| e.in_run(name, None))?;

        let workload = pathway.kind().workload();
        log::debug!("{name}: Idle -> Running ({row_count} rows, {workload:?})");
        self.state = RunState::Running;
        let start = Instant::now();

        let outcome = match pathway.begin() {
            Ok(tx) => self.drive(tx, name, workload, row_count),
            Err(e) => Err(e.in_run(name, None)),
        };

        match outcome {
            Ok(()) => {
                let elapsed = start.elapsed();
                self.state = RunState::Committed;
                log::debug!("{name}: Running -> Committed");
                Ok(BenchmarkResult {
                    pathway_name: name,
                    row_count,
                    elapsed,
                })
            }
            Err(e) => {
                self.state = RunState::Aborted;
                log::debug!("{name}: Running -> Aborted");
                Err(e)
            }
        }
    }

    /// Fill and commit `tx`. Returning early drops `tx`, which rolls back.
    fn drive(
        &mut self,
        mut tx: Box<dyn PathwayTransaction + '_>,
        name: &'static str,
        workload: Workload,
        row_count: u64,
    ) -> Result<(), BenchError> {
        match workload {
            Workload::PerRow => {
                for counter in 0..row_count {
                    let record = self.generator.generate(counter);
                    tx.insert_one(&record)
                        .map_err(|e| e.in_run(name, Some(counter)))?;
                }
            }
            Workload::FixedBatch => {
                tx.insert_fixed_batch(row_count)
                    .map_err(|e| e.in_run(name, None))?;
            }
        }
        tx.commit().map_err(|e| e.in_run(name, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;
    use crate::pathway::{PathwayKind, StoredLocation};
    use bench_core::generator::FixedClock;
    use bench_core::types::LocationRecord;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// In-process pathway that records what it is asked to do and can reject
    /// a chosen row.
    struct ScriptedPathway {
        kind: PathwayKind,
        provisioned: bool,
        reject_at: Option<u64>,
        committed: Vec<LocationRecord>,
        log: Vec<String>,
    }

    impl ScriptedPathway {
        fn new(kind: PathwayKind) -> Self {
            Self {
                kind,
                provisioned: true,
                reject_at: None,
                committed: Vec::new(),
                log: Vec::new(),
            }
        }
    }

    struct ScriptedTx<'a> {
        owner: &'a mut ScriptedPathway,
        staged: Vec<LocationRecord>,
    }

    impl Drop for ScriptedTx<'_> {
        fn drop(&mut self) {
            self.owner.log.push("end".into());
        }
    }

    impl PathwayTransaction for ScriptedTx<'_> {
        fn insert_one(&mut self, record: &LocationRecord) -> Result<(), BackendError> {
            if self.owner.reject_at == Some(self.staged.len() as u64) {
                return Err(BackendError::Rejected("scripted".into()));
            }
            self.staged.push(record.clone());
            Ok(())
        }

        fn insert_fixed_batch(&mut self, row_count: u64) -> Result<(), BackendError> {
            self.owner.log.push(format!("batch {row_count}"));
            Ok(())
        }

        fn commit(mut self: Box<Self>) -> Result<(), BackendError> {
            let staged = std::mem::take(&mut self.staged);
            self.owner.committed.extend(staged);
            self.owner.log.push("commit".into());
            Ok(())
        }
    }

    impl InsertPathway for ScriptedPathway {
        fn kind(&self) -> PathwayKind {
            self.kind
        }

        fn provision(&mut self) -> Result<(), BackendError> {
            self.provisioned = true;
            Ok(())
        }

        fn verify_provisioned(&self) -> Result<(), BackendError> {
            if self.provisioned {
                Ok(())
            } else {
                Err(BackendError::Missing("scripted".into()))
            }
        }

        fn begin(&mut self) -> Result<Box<dyn PathwayTransaction + '_>, BackendError> {
            self.log.push("begin".into());
            Ok(Box::new(ScriptedTx {
                owner: self,
                staged: Vec::new(),
            }))
        }

        fn row_count(&self) -> Result<u64, BackendError> {
            Ok(self.committed.len() as u64)
        }

        fn rows(&self) -> Result<Vec<StoredLocation>, BackendError> {
            Ok(Vec::new())
        }

        fn truncate(&mut self) -> Result<(), BackendError> {
            self.committed.clear();
            Ok(())
        }
    }

    fn runner() -> BenchmarkRunner<FixedClock, StdRng> {
        let clock = FixedClock(
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        );
        BenchmarkRunner::new(RecordGenerator::new(clock, StdRng::seed_from_u64(7)))
    }

    #[test]
    fn starts_idle() {
        assert_eq!(runner().state(), RunState::Idle);
    }

    #[test]
    fn per_row_inserts_counters_in_order() {
        let mut pathway = ScriptedPathway::new(PathwayKind::Memory);
        let mut runner = runner();

        let result = runner.run(&mut pathway, 250).unwrap();

        assert_eq!(runner.state(), RunState::Committed);
        assert_eq!(result.pathway_name, "memory");
        assert_eq!(result.row_count, 250);
        assert_eq!(pathway.committed.len(), 250);
        for (counter, record) in pathway.committed.iter().enumerate() {
            assert_eq!(
                record.registration_number,
                bench_core::generator::registration_number(counter as u64)
            );
        }
        assert_eq!(pathway.log, ["begin", "commit", "end"]);
    }

    #[test]
    fn fixed_batch_is_one_call() {
        let mut pathway = ScriptedPathway::new(PathwayKind::CompiledMemory);
        let mut runner = runner();

        runner.run(&mut pathway, 42).unwrap();

        assert_eq!(runner.state(), RunState::Committed);
        assert_eq!(pathway.log, ["begin", "batch 42", "commit", "end"]);
    }

    #[test]
    fn rejection_aborts_without_commit() {
        let mut pathway = ScriptedPathway::new(PathwayKind::Disk);
        pathway.reject_at = Some(3);
        let mut runner = runner();

        let err = runner.run(&mut pathway, 10).unwrap_err();

        assert_eq!(runner.state(), RunState::Aborted);
        assert!(matches!(
            err,
            BenchError::InsertRejected {
                pathway: "disk",
                counter: Some(3),
                ..
            }
        ));
        assert!(pathway.committed.is_empty());
        assert_eq!(pathway.log, ["begin", "end"]);
    }

    #[test]
    fn unprovisioned_fails_before_running() {
        let mut pathway = ScriptedPathway::new(PathwayKind::Memory);
        pathway.provisioned = false;
        let mut runner = runner();

        let err = runner.run(&mut pathway, 10).unwrap_err();

        assert!(matches!(err, BenchError::Provisioning { .. }));
        assert_eq!(runner.state(), RunState::Idle);
        assert!(pathway.log.is_empty());
    }

    #[test]
    fn rows_per_sec_handles_zero_elapsed() {
        let result = BenchmarkResult {
            pathway_name: "disk",
            row_count: 10,
            elapsed: Duration::ZERO,
        };
        assert_eq!(result.rows_per_sec(), 0.0);

        let result = BenchmarkResult {
            elapsed: Duration::from_millis(500),
            ..result
        };
        assert_eq!(result.elapsed_millis(), 500);
        assert!((result.rows_per_sec() - 20.0).abs() < 1e-9);
    }
}

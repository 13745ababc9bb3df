//! Runs the selected pathways one after another and collects a [`Report`].
//!
//! Every selected pathway is opened and provisioned before the first run, so
//! provisioning failures surface before any timing is taken. Runs never
//! overlap in time.

use bench_core::generator::Clock;
use rand::Rng;

use crate::config::BenchConfig;
use crate::error::BenchError;
use crate::pathway::sqlite::SqlitePathway;
use crate::pathway::{InsertPathway, PathwayKind};
use crate::report::{Report, ReportEmitter};
use crate::runner::{BenchmarkResult, BenchmarkRunner};

/// A committed run together with how many rows its table gained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathwayRun {
    pub result: BenchmarkResult,
    pub rows_added: u64,
}

/// Open, provision and (optionally) clear one pathway.
pub fn provision_pathway(
    kind: PathwayKind,
    config: &BenchConfig,
) -> Result<SqlitePathway, BenchError> {
    let name = kind.name();
    let mut pathway =
        SqlitePathway::open(kind, &config.disk_path).map_err(|e| e.in_run(name, None))?;
    pathway.provision().map_err(|e| e.in_run(name, None))?;

    if config.reset {
        pathway.truncate().map_err(|e| e.in_run(name, None))?;
    }
    Ok(pathway)
}

/// Benchmark one provisioned pathway and measure its table growth.
pub fn run_pathway<C: Clock, R: Rng>(
    pathway: &mut SqlitePathway,
    row_count: u64,
    runner: &mut BenchmarkRunner<C, R>,
) -> Result<PathwayRun, BenchError> {
    let name = pathway.name();
    let before = pathway.row_count().map_err(|e| e.in_run(name, None))?;
    let result = runner.run(pathway, row_count)?;
    let after = pathway.row_count().map_err(|e| e.in_run(name, None))?;

    let rows_added = after.saturating_sub(before);
    if rows_added != row_count {
        log::warn!("{name}: expected {row_count} new rows, table gained {rows_added}");
    }
    log::debug!("{name}: table rows {before} -> {after}");

    Ok(PathwayRun { result, rows_added })
}

/// Benchmark every pathway in `config.pathways`, in order.
///
/// Pathways that fail to provision are reported before any run starts and
/// are skipped; a pathway whose run fails is reported and the remaining
/// pathways still run.
pub fn run_suite<C: Clock, R: Rng>(
    config: &BenchConfig,
    runner: &mut BenchmarkRunner<C, R>,
    emitter: &mut dyn ReportEmitter,
) -> Report {
    let mut report = Report::default();

    let mut ready = Vec::with_capacity(config.pathways.len());
    for &kind in &config.pathways {
        match provision_pathway(kind, config) {
            Ok(pathway) => ready.push(pathway),
            Err(e) => {
                log::error!("{e}");
                emitter.fail(&e);
                report.failures.push(e);
            }
        }
    }

    for mut pathway in ready {
        let kind = pathway.kind();
        log::info!("Benchmarking {kind} with {} rows...", config.row_count);
        match run_pathway(&mut pathway, config.row_count, runner) {
            Ok(run) => {
                log::info!("{kind}: done in {} ms", run.result.elapsed_millis());
                emitter.emit(&run.result);
                report.rows_added.push((run.result.pathway_name, run.rows_added));
                report.results.push(run.result);
            }
            Err(e) => {
                log::error!("{e}");
                emitter.fail(&e);
                report.failures.push(e);
            }
        }
    }

    report
}

//! Report module: one timing line per pathway plus a comparison summary.

use std::io::{self, Write};

use crate::error::BenchError;
use crate::runner::BenchmarkResult;

/// Sink for finished runs.
///
/// Emitting never fails the benchmark: sink errors are logged and dropped.
pub trait ReportEmitter {
    fn emit(&mut self, result: &BenchmarkResult);

    /// Called for a pathway that failed to provision or run.
    fn fail(&mut self, _error: &BenchError) {}
}

/// Writes `name -> N ms` lines to any writer.
pub struct ConsoleReport<W: Write> {
    out: W,
}

impl ConsoleReport<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportEmitter for ConsoleReport<W> {
    fn emit(&mut self, result: &BenchmarkResult) {
        if let Err(e) = writeln!(self.out, "{}", format_line(result)) {
            log::warn!("failed to write result for {}: {e}", result.pathway_name);
        }
    }

    fn fail(&mut self, error: &BenchError) {
        if let Err(e) = writeln!(self.out, "{:<16}-> failed: {error}", error.pathway()) {
            log::warn!("failed to write failure for {}: {e}", error.pathway());
        }
    }
}

/// `"disk            ->      1234 ms  (50000 rows, 40518 rows/s)"`
pub fn format_line(result: &BenchmarkResult) -> String {
    format!(
        "{:<16}-> {:>9} ms  ({} rows, {:.0} rows/s)",
        result.pathway_name,
        result.elapsed_millis(),
        result.row_count,
        result.rows_per_sec()
    )
}

/// Outcome of a whole suite, in run order.
#[derive(Debug, Default)]
pub struct Report {
    pub results: Vec<BenchmarkResult>,
    pub failures: Vec<BenchError>,
    /// Rows each committed pathway's table gained during its run.
    pub rows_added: Vec<(&'static str, u64)>,
}

impl Report {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Table growth recorded for `pathway_name`, if it committed.
    pub fn rows_added_for(&self, pathway_name: &str) -> Option<u64> {
        self.rows_added
            .iter()
            .find(|(name, _)| *name == pathway_name)
            .map(|(_, rows)| *rows)
    }

    /// Elapsed time of the slowest pathway, the baseline for ratios.
    fn slowest_us(&self) -> f64 {
        self.results
            .iter()
            .map(|r| r.elapsed.as_secs_f64() * 1e6)
            .fold(0.0, f64::max)
    }

    /// How many times faster than the slowest pathway `result` ran.
    pub fn speedup(&self, result: &BenchmarkResult) -> f64 {
        let us = result.elapsed.as_secs_f64() * 1e6;
        if us <= 0.0 {
            return 0.0;
        }
        self.slowest_us() / us
    }

    /// Render the comparison summary.
    pub fn write_summary(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "\n{}", "=".repeat(72))?;
        writeln!(out, "  Insert Pathway Benchmark Report")?;
        writeln!(out, "{}", "=".repeat(72))?;

        if !self.results.is_empty() {
            writeln!(
                out,
                "  {:18} {:>10} {:>12} {:>14} {:>10}",
                "Pathway", "Rows", "Elapsed (ms)", "Rows/s", "Speedup"
            )?;
            writeln!(out, "  {}", "-".repeat(68))?;
            for r in &self.results {
                writeln!(
                    out,
                    "  {:18} {:>10} {:>12} {:>14.0} {:>9.2}x",
                    r.pathway_name,
                    r.row_count,
                    r.elapsed_millis(),
                    r.rows_per_sec(),
                    self.speedup(r)
                )?;
            }
        }

        if !self.failures.is_empty() {
            writeln!(out, "\n  Failed pathways (no timing recorded):")?;
            for e in &self.failures {
                writeln!(out, "  {:18} {}", e.pathway(), e)?;
            }
        }

        writeln!(out)
    }
}

/// Print the comparison summary to stdout.
pub fn print_report(report: &Report) {
    if let Err(e) = report.write_summary(&mut io::stdout().lock()) {
        log::warn!("failed to print report: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn result(name: &'static str, ms: u64) -> BenchmarkResult {
        BenchmarkResult {
            pathway_name: name,
            row_count: 1_000,
            elapsed: Duration::from_millis(ms),
        }
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn line_names_pathway_and_millis() {
        let line = format_line(&result("memory", 250));
        assert!(line.starts_with("memory"), "{line}");
        assert!(line.contains("->"), "{line}");
        assert!(line.contains("250 ms"), "{line}");
        assert!(line.contains("1000 rows"), "{line}");
        assert!(line.contains("4000 rows/s"), "{line}");
    }

    #[test]
    fn console_emits_one_line_per_result() {
        let mut console = ConsoleReport::new(Vec::new());
        console.emit(&result("disk", 900));
        console.emit(&result("memory", 300));
        console.emit(&result("compiled-memory", 10));

        let text = String::from_utf8(console.into_inner()).unwrap();
        let names: Vec<&str> = text
            .lines()
            .map(|l| l.split_whitespace().next().unwrap())
            .collect();
        assert_eq!(names, ["disk", "memory", "compiled-memory"]);
    }

    #[test]
    fn sink_errors_are_swallowed() {
        let mut console = ConsoleReport::new(BrokenSink);
        console.emit(&result("disk", 1));
    }

    #[test]
    fn failures_are_written_under_the_pathway_name() {
        let mut console = ConsoleReport::new(Vec::new());
        console.fail(&crate::error::BenchError::Provisioning {
            pathway: "disk",
            reason: "unable to open database file".into(),
        });
        console.emit(&result("memory", 300));

        let text = String::from_utf8(console.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("disk"), "{}", lines[0]);
        assert!(lines[0].contains("failed"), "{}", lines[0]);
        assert!(lines[0].contains("unable to open database file"), "{}", lines[0]);
        assert!(lines[1].starts_with("memory"), "{}", lines[1]);
    }

    #[test]
    fn speedup_relative_to_slowest() {
        let report = Report {
            results: vec![result("disk", 800), result("memory", 200)],
            ..Report::default()
        };
        assert!((report.speedup(&report.results[0]) - 1.0).abs() < 1e-9);
        assert!((report.speedup(&report.results[1]) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn summary_lists_failures_without_timing() {
        let report = Report {
            results: vec![result("memory", 5)],
            failures: vec![crate::error::BackendError::Rejected("boom".into())
                .in_run("disk", Some(3))],
            ..Report::default()
        };
        let mut out = Vec::new();
        report.write_summary(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("memory"));
        assert!(text.contains("Failed pathways"));
        assert!(text.contains("disk: insert rejected at row 3: boom"));
        assert!(report.has_failures());
    }
}

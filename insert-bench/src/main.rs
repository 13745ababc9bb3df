//! Standalone benchmark runner that prints one timing line per pathway and a
//! comparison summary.
//!
//! Usage:
//!   cargo run --release -p insert-bench
//!   cargo run --release -p insert-bench -- memory compiled --rows 100000
//!   INSERT_BENCH_DB_PATH=/var/tmp/bench.db cargo run --release -p insert-bench

use std::process;

use bench_core::generator::RecordGenerator;
use insert_bench::config::{BenchConfig, USAGE};
use insert_bench::report::{print_report, ConsoleReport};
use insert_bench::runner::BenchmarkRunner;
use insert_bench::suite::run_suite;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{USAGE}");
        return;
    }

    let config = BenchConfig::load(&args).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {e:#}");
        process::exit(2);
    });

    bench_core::initialize_logger(config.log_level, config.log_file.as_deref()).unwrap_or_else(
        |e| {
            eprintln!("Failed to initialize logger: {e}. Exiting.");
            process::exit(1);
        },
    );

    println!("Running insert pathway benchmark...");
    println!("  Rows per pathway: {}", config.row_count);
    println!("  Disk database:    {}", config.disk_path.display());
    println!();

    let mut runner = BenchmarkRunner::new(RecordGenerator::system());
    let mut console = ConsoleReport::stdout();
    let report = run_suite(&config, &mut runner, &mut console);

    print_report(&report);

    if report.has_failures() {
        process::exit(1);
    }
}

//! Runtime configuration: `.env`, environment variables, then command-line
//! arguments, each overriding the previous.
//!
//! | Variable                 | Flag          | Default                      |
//! |--------------------------|---------------|------------------------------|
//! | `INSERT_BENCH_ROWS`      | `--rows N`    | 50000                        |
//! | `INSERT_BENCH_DB_PATH`   | `--db PATH`   | `<temp dir>/insert-bench.db` |
//! | `INSERT_BENCH_RESET`     | `--reset`     | off                          |
//! | `INSERT_BENCH_LOG_LEVEL` |               | `info`                       |
//! | `INSERT_BENCH_LOG_FILE`  |               | none                         |
//!
//! Positional arguments select pathways (`disk`, `memory`, `compiled-memory`
//! or `all`). With none given, all three run.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use bench_core::constants::DEFAULT_ROW_COUNT;
use log::LevelFilter;

use crate::pathway::PathwayKind;

pub const USAGE: &str = "\
Usage: insert-bench [PATHWAY...] [--rows N] [--db PATH] [--reset]

Pathways: disk, memory, compiled-memory (alias: compiled), all
  --rows N     rows inserted per pathway (default 50000)
  --db PATH    database file for the disk pathway
  --reset      delete existing rows before each run
  -h, --help   show this message";

#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    pub row_count: u64,
    pub pathways: Vec<PathwayKind>,
    pub disk_path: PathBuf,
    pub reset: bool,
    pub log_level: LevelFilter,
    pub log_file: Option<String>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            row_count: DEFAULT_ROW_COUNT,
            pathways: PathwayKind::ALL.to_vec(),
            disk_path: std::env::temp_dir().join("insert-bench.db"),
            reset: false,
            log_level: LevelFilter::Info,
            log_file: None,
        }
    }
}

impl BenchConfig {
    /// Load `.env` (if any), then read the process environment and `args`
    /// (without the program name).
    pub fn load(args: &[String]) -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(e).context("failed to read .env");
            }
        }
        Self::from_sources(|key| std::env::var(key).ok(), args)
    }

    /// Build from an environment lookup and argument list.
    pub fn from_sources(env: impl Fn(&str) -> Option<String>, args: &[String]) -> Result<Self> {
        let mut config = Self::default();

        if let Some(rows) = env("INSERT_BENCH_ROWS") {
            config.row_count = parse_rows(&rows).context("INSERT_BENCH_ROWS")?;
        }
        if let Some(path) = env("INSERT_BENCH_DB_PATH") {
            config.disk_path = PathBuf::from(path);
        }
        if let Some(reset) = env("INSERT_BENCH_RESET") {
            config.reset = parse_bool(&reset).context("INSERT_BENCH_RESET")?;
        }
        if let Some(level) = env("INSERT_BENCH_LOG_LEVEL") {
            config.log_level = level
                .parse()
                .with_context(|| format!("INSERT_BENCH_LOG_LEVEL: invalid level '{level}'"))?;
        }
        config.log_file = env("INSERT_BENCH_LOG_FILE").filter(|p| !p.is_empty());

        let mut pathways = Vec::new();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--rows" => {
                    let value = iter.next().context("--rows needs a value")?;
                    config.row_count = parse_rows(value).context("--rows")?;
                }
                "--db" => {
                    let value = iter.next().context("--db needs a value")?;
                    config.disk_path = PathBuf::from(value);
                }
                "--reset" => config.reset = true,
                "all" => pathways.extend(PathwayKind::ALL),
                flag if flag.starts_with('-') => bail!("unknown option '{flag}'\n\n{USAGE}"),
                name => pathways.push(name.parse::<PathwayKind>()?),
            }
        }
        if !pathways.is_empty() {
            config.pathways.clear();
            for kind in pathways {
                if !config.pathways.contains(&kind) {
                    config.pathways.push(kind);
                }
            }
        }

        Ok(config)
    }
}

fn parse_rows(value: &str) -> Result<u64> {
    let cleaned: String = value.trim().chars().filter(|c| *c != '_').collect();
    cleaned
        .parse()
        .with_context(|| format!("invalid row count '{value}'"))
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("invalid boolean '{other}'"),
    }
}

//! Insert Pathway Benchmark
//!
//! Measures how long it takes to insert the same number of synthetic location
//! rows through three structurally different execution paths:
//! - **disk**: durable file-backed table, one interpreted `INSERT` per row
//! - **memory**: in-memory table, one interpreted `INSERT` per row
//! - **compiled-memory**: in-memory table, the whole batch executed as one
//!   prepared statement inside the engine
//!
//! Each run is a single all-or-nothing transaction and reports one elapsed
//! wall-clock duration.
//!
//! Run the benchmark: `cargo run --release -p insert-bench`
//! Run tests: `cargo test`

pub mod config;
pub mod error;
pub mod pathway;
pub mod report;
pub mod runner;
pub mod suite;

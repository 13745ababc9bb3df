//! Error types for pathways and benchmark runs.

use rusqlite::ErrorCode;
use thiserror::Error;

/// Failure reported by a storage backend for a single pathway operation.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend refused a row (constraint or trigger).
    #[error("row rejected: {0}")]
    Rejected(String),
    /// The pathway's table does not exist.
    #[error("table missing: {0}")]
    Missing(String),
    #[error("backend unavailable: {0}")]
    Unavailable(#[source] rusqlite::Error),
    /// The pathway does not offer the requested workload.
    #[error("{pathway} does not support {operation}")]
    Unsupported {
        pathway: &'static str,
        operation: &'static str,
    },
}

impl From<rusqlite::Error> for BackendError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(e, msg) = &err {
            if e.code == ErrorCode::ConstraintViolation {
                return BackendError::Rejected(msg.clone().unwrap_or_else(|| e.to_string()));
            }
            if let Some(msg) = msg.as_deref().filter(|m| m.starts_with("no such table")) {
                return BackendError::Missing(msg.to_string());
            }
        }
        BackendError::Unavailable(err)
    }
}

impl BackendError {
    /// Attach run context. `counter` is the row being inserted when the
    /// failure happened, or `None` for whole-batch operations.
    pub fn in_run(self, pathway: &'static str, counter: Option<u64>) -> BenchError {
        match self {
            BackendError::Rejected(message) => BenchError::InsertRejected {
                pathway,
                counter,
                message,
            },
            BackendError::Missing(reason) => BenchError::Provisioning { pathway, reason },
            BackendError::Unavailable(source) => BenchError::BackendUnavailable { pathway, source },
            BackendError::Unsupported { pathway, operation } => {
                BenchError::Unsupported { pathway, operation }
            }
        }
    }
}

/// Failure of a whole benchmark run. No timing is produced when a run fails.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("{pathway}: not provisioned: {reason}")]
    Provisioning {
        pathway: &'static str,
        reason: String,
    },
    #[error("{pathway}: insert rejected at {}: {message}", describe_counter(.counter))]
    InsertRejected {
        pathway: &'static str,
        counter: Option<u64>,
        message: String,
    },
    #[error("{pathway}: backend unavailable: {source}")]
    BackendUnavailable {
        pathway: &'static str,
        #[source]
        source: rusqlite::Error,
    },
    #[error("{pathway} does not support {operation}")]
    Unsupported {
        pathway: &'static str,
        operation: &'static str,
    },
}

impl BenchError {
    pub fn pathway(&self) -> &'static str {
        match self {
            BenchError::Provisioning { pathway, .. }
            | BenchError::InsertRejected { pathway, .. }
            | BenchError::BackendUnavailable { pathway, .. }
            | BenchError::Unsupported { pathway, .. } => pathway,
        }
    }
}

fn describe_counter(counter: &Option<u64>) -> String {
    match counter {
        Some(c) => format!("row {c}"),
        None => "batch".to_string(),
    }
}

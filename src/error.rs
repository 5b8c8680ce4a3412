use std::process::ExitStatus;
use std::time::Duration;

use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum EntrykitError {
    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("database error: {0}")]
    Database(#[from] SqlxError),

    #[error("connection attempt timed out after {0:?}")]
    AttemptTimeout(Duration),

    #[error("database not ready after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        source: Box<EntrykitError>,
    },

    #[error("migration command exited with {status}")]
    MigrationFailed { status: ExitStatus },

    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("unknown group: {0}")]
    UnknownGroup(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("system call failed: {0}")]
    Sys(#[from] nix::Error),
}

/// Whether an error is a transient "not yet ready" condition that a
/// later probe attempt can reasonably be expected to clear.
pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for EntrykitError {
    fn is_retryable(&self) -> bool {
        match self {
            // The attempt deadline fired before the server answered.
            EntrykitError::AttemptTimeout(_) => true,
            EntrykitError::Database(e) => is_transient_db_error(e),
            _ => false,
        }
    }
}

/// PostgreSQL SQLSTATEs that occur while the server (or an init script)
/// is still starting: 57P03 "cannot_connect_now", 3D000 "database does
/// not exist yet". Authentication and protocol failures are permanent
/// and must not consume the retry budget.
fn is_transient_db_error(e: &SqlxError) -> bool {
    match e {
        SqlxError::Io(_) => true,
        SqlxError::PoolTimedOut => true,
        SqlxError::Database(db) => matches!(
            db.code().as_deref(),
            Some("57P03") | Some("3D000")
        ),
        _ => false,
    }
}

//! Schema migration step.
//!
//! The migration tool is external to this binary (the application image
//! ships it); the entrypoint only invokes it and propagates failure.
//! The command line is split on whitespace and spawned directly, with
//! no shell in between.

use tokio::process::Command;
use tracing::info;

use crate::error::EntrykitError;

/// Split a configured command line into argv. Empty input is a
/// configuration error, not an empty exec.
pub fn split_command(raw: &str) -> Result<Vec<String>, EntrykitError> {
    let argv: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
    if argv.is_empty() {
        return Err(EntrykitError::InvalidConfig(
            "MIGRATE_COMMAND is empty".to_string(),
        ));
    }
    Ok(argv)
}

/// Run the migration command to completion. A non-zero exit status is
/// fatal to the startup sequence.
pub async fn run(command: &str) -> Result<(), EntrykitError> {
    let argv = split_command(command)?;
    info!(command = %command, "running schema migrations");

    let status = Command::new(&argv[0]).args(&argv[1..]).status().await?;
    if !status.success() {
        return Err(EntrykitError::MigrationFailed { status });
    }

    info!("migrations completed");
    Ok(())
}

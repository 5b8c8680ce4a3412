//! Startup configuration, read once from the process environment.
//!
//! Required keys: `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`,
//! `DB_PASSWORD`. A missing or unparsable required key fails extraction
//! with the offending field named, before any connection attempt is
//! made. Everything else is optional with explicit defaults.

use std::path::PathBuf;

use figment::Figment;
use figment::providers::Env;
use serde::Deserialize;

use crate::error::EntrykitError;

/// The database endpoint and credentials the prober connects to.
///
/// When `url` is set it is used verbatim for connecting; the discrete
/// fields remain required either way.
#[derive(Debug, Clone)]
pub struct ConnectionTarget {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub target: ConnectionTarget,
    pub run_migrations: bool,
    pub migrate_command: Option<String>,
    pub app_user: String,
    pub app_group: Option<String>,
    pub data_dirs: Vec<PathBuf>,
}

/// Raw environment mapping as figment extracts it. Env keys are matched
/// case-insensitively, so `DB_HOST` lands in `db_host`.
#[derive(Debug, Deserialize)]
struct RawConfig {
    db_host: String,
    db_port: u16,
    db_name: String,
    db_user: String,
    db_password: String,
    #[serde(default)]
    database_url: Option<String>,
    #[serde(default)]
    run_migrations: bool,
    #[serde(default)]
    migrate_command: Option<String>,
    #[serde(default = "default_app_user")]
    app_user: String,
    #[serde(default)]
    app_group: Option<String>,
    #[serde(default)]
    app_data_dirs: Option<String>,
}

fn default_app_user() -> String {
    "app".to_string()
}

impl Config {
    pub fn from_env() -> Result<Self, EntrykitError> {
        let raw: RawConfig = Figment::new()
            .merge(Env::raw().only(&[
                "DB_HOST",
                "DB_PORT",
                "DB_NAME",
                "DB_USER",
                "DB_PASSWORD",
                "DATABASE_URL",
                "RUN_MIGRATIONS",
                "MIGRATE_COMMAND",
                "APP_USER",
                "APP_GROUP",
                "APP_DATA_DIRS",
            ]))
            .extract()?;
        Self::validate(raw)
    }

    fn validate(raw: RawConfig) -> Result<Self, EntrykitError> {
        if raw.run_migrations
            && raw
                .migrate_command
                .as_deref()
                .is_none_or(|c| c.trim().is_empty())
        {
            return Err(EntrykitError::InvalidConfig(
                "RUN_MIGRATIONS is set but MIGRATE_COMMAND is empty".to_string(),
            ));
        }

        let data_dirs = raw
            .app_data_dirs
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect();

        Ok(Self {
            target: ConnectionTarget {
                host: raw.db_host,
                port: raw.db_port,
                database: raw.db_name,
                username: raw.db_user,
                password: raw.db_password,
                url: raw.database_url,
            },
            run_migrations: raw.run_migrations,
            migrate_command: raw.migrate_command,
            app_user: raw.app_user,
            app_group: raw.app_group,
            data_dirs,
        })
    }
}

use std::convert::Infallible;

use clap::Parser;
use mimalloc::MiMalloc;
use nix::unistd::geteuid;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use entrykit::cli::Cli;
use entrykit::config::Config;
use entrykit::error::EntrykitError;
use entrykit::probe::ProbePolicy;
use entrykit::{launch, migrate, ownership, probe};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()))
    });
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        error!(error = %err, "startup aborted");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<Infallible, EntrykitError> {
    let cfg = Config::from_env()?;

    info!(
        host = %cfg.target.host,
        port = cfg.target.port,
        database = %cfg.target.database,
        "waiting for database"
    );
    let connected = probe::wait_until_ready(&ProbePolicy::default(), || {
        probe::connect_once(&cfg.target)
    })
    .await?;
    info!(attempt = connected.attempt, "database is ready");

    let owner = if geteuid().is_root() {
        Some(ownership::resolve_owner(
            &cfg.app_user,
            cfg.app_group.as_deref(),
        )?)
    } else {
        warn!("not running as root, skipping ownership fix and privilege drop");
        None
    };

    if let Some(owner) = &owner {
        for dir in &cfg.data_dirs {
            let changed = ownership::chown_recursive(dir, owner)?;
            info!(path = %dir.display(), entries = changed, "adjusted volume ownership");
        }
    }

    if cfg.run_migrations {
        // Validation guarantees the command is present when the flag is set.
        if let Some(command) = cfg.migrate_command.as_deref() {
            migrate::run(command).await?;
        }
    }

    launch::exec_as(owner.as_ref(), &cli.command)
}

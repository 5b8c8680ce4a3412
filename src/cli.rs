use clap::Parser;

/// Container entrypoint: wait for PostgreSQL, fix volume ownership,
/// optionally run migrations, then exec the application.
#[derive(Parser, Debug)]
#[command(name = "entrykit", version)]
pub struct Cli {
    /// Command (and arguments) to exec once startup preparation is done.
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        required = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,
}

//! cidash - CI dashboard notification records and GitHub status webhook
//!
//! - `serve`: run the HTTP server (webhook, health, build email listing)
//! - `migrate`: create the build email tables
//! - `emails`: inspect or record build emails

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "cidash",
    author,
    version,
    about = "CI dashboard notification records and GitHub status webhook"
)]
struct Cli {
    /// Config file (default: ~/.cidash/config.toml)
    #[arg(long, global = true, env = "CIDASH_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging (unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (requires the telemetry feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),
    /// Create or update the database schema
    Migrate(commands::migrate::MigrateArgs),
    /// Inspect or record build emails (sent, lookup, record)
    Emails(commands::emails::EmailsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })?;

    let config = commands::load_config(cli.config.as_deref())?;

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args, config).await,
        Commands::Migrate(args) => commands::run_migrate(args, config).await,
        Commands::Emails(args) => commands::run_emails(args, config).await,
    };

    tracing_setup::shutdown();
    result
}

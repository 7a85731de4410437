//! HTTP server command

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use cidash_core::DashConfig;
use cidash_server::db::{create_lazy_pool, migrations};
use cidash_server::{run_server, AppState, CheckUpdater, GitHubCheckClient, LoggingCheckUpdater, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides config)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Create missing tables before serving
    #[arg(long)]
    pub migrate: bool,
}

fn check_updater(config: &DashConfig) -> Result<Arc<dyn CheckUpdater>> {
    match config.github {
        Some(ref github) => {
            tracing::info!(owner = %github.owner, repo = %github.repo, "GitHub checks enabled");
            let client = GitHubCheckClient::new(github, config.server.base_url.clone())
                .context("Failed to build GitHub client")?;
            Ok(Arc::new(client))
        }
        None => {
            tracing::info!("No [github] config; check updates will only be logged");
            Ok(Arc::new(LoggingCheckUpdater))
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, config: DashConfig) -> Result<()> {
    let database_url = args.database_url.unwrap_or_else(|| config.database.url.clone());
    let bind_addr = args.bind.unwrap_or(config.server.bind);

    let pool = create_lazy_pool(&database_url, config.database.max_connections)
        .context("Invalid database URL")?;

    if args.migrate {
        migrations::run(&pool).await.context("Migrations failed")?;
    }

    let state = AppState::new(pool, check_updater(&config)?);
    let server_config = ServerConfig {
        bind_addr,
        cors_permissive: args.cors_permissive || config.server.cors_permissive,
    };

    tracing::info!("Starting cidash server on {}", bind_addr);
    run_server(state, server_config).await.context("Server error")?;

    Ok(())
}

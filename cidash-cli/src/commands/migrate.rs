//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use cidash_core::DashConfig;
use cidash_server::db::{create_pool, migrations};

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

pub async fn run_migrate(args: MigrateArgs, config: DashConfig) -> Result<()> {
    let database_url = args.database_url.unwrap_or(config.database.url);

    let pool = create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    migrations::run(&pool).await.context("Migrations failed")?;

    println!("Schema is up to date");
    Ok(())
}

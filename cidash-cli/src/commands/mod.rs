//! Command implementations for the cidash CLI

pub mod emails;
pub mod migrate;
pub mod serve;

pub use emails::run_emails;
pub use migrate::run_migrate;
pub use serve::run_serve;

use anyhow::{Context, Result};
use cidash_core::DashConfig;
use std::path::Path;

/// Load config from an explicit path or the default location.
pub fn load_config(path: Option<&Path>) -> Result<DashConfig> {
    match path {
        Some(path) => DashConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => DashConfig::load().context("Failed to load config"),
    }
}

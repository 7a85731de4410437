//! Repository status ("check") updaters
//!
//! The webhook only knows a commit hash; what happens to it is up to the
//! configured updater.

pub mod github;

use async_trait::async_trait;

pub use github::GitHubCheckClient;

/// Check update error
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("check update for {sha} rejected with status {status}: {body}")]
    Status {
        sha: String,
        status: u16,
        body: String,
    },
}

/// Creates or refreshes the dashboard's check for a commit
#[async_trait]
pub trait CheckUpdater: Send + Sync {
    async fn create_or_update_check(&self, sha: &str) -> Result<(), CheckError>;

    /// Integration name reported by the health endpoint
    fn integration(&self) -> &'static str;
}

/// Updater used when no repository integration is configured
#[derive(Debug, Default, Clone)]
pub struct LoggingCheckUpdater;

#[async_trait]
impl CheckUpdater for LoggingCheckUpdater {
    async fn create_or_update_check(&self, sha: &str) -> Result<(), CheckError> {
        tracing::info!(sha, "check update requested (no repository integration configured)");
        Ok(())
    }

    fn integration(&self) -> &'static str {
        "log"
    }
}

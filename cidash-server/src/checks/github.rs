//! GitHub checks API client

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Serialize;

use cidash_core::config::GitHubSection;

use super::{CheckError, CheckUpdater};

/// Name the dashboard's check runs are created under.
///
/// The webhook ignores `check_run` events carrying this name unless they
/// were re-requested, so our own updates do not loop back.
pub const CHECK_NAME: &str = "CDash";

#[derive(Debug, Serialize)]
struct CheckRunRequest<'a> {
    name: &'a str,
    head_sha: &'a str,
    status: &'a str,
    details_url: String,
}

/// Creates check runs on a GitHub repository
#[derive(Debug, Clone)]
pub struct GitHubCheckClient {
    http: Client,
    api_url: String,
    owner: String,
    repo: String,
    token: Option<String>,
    dashboard_url: String,
}

impl GitHubCheckClient {
    pub fn new(config: &GitHubSection, dashboard_url: impl Into<String>) -> Result<Self, CheckError> {
        let http = Client::builder()
            .user_agent(concat!("cidash/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            token: config.token.clone(),
            dashboard_url: dashboard_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn check_runs_url(&self) -> String {
        format!("{}/repos/{}/{}/check-runs", self.api_url, self.owner, self.repo)
    }

    fn details_url(&self, sha: &str) -> String {
        format!("{}/index.php?filtercount=1&field1=revision&compare1=63&value1={}", self.dashboard_url, sha)
    }
}

#[async_trait]
impl CheckUpdater for GitHubCheckClient {
    async fn create_or_update_check(&self, sha: &str) -> Result<(), CheckError> {
        let body = CheckRunRequest {
            name: CHECK_NAME,
            head_sha: sha,
            status: "in_progress",
            details_url: self.details_url(sha),
        };

        let mut request = self
            .http
            .post(self.check_runs_url())
            .header(header::ACCEPT, "application/vnd.github+json")
            .json(&body);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CheckError::Status {
                sha: sha.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(sha, owner = %self.owner, repo = %self.repo, "check run created");
        Ok(())
    }

    fn integration(&self) -> &'static str {
        "github"
    }
}

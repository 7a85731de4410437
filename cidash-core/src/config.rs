//! Dashboard configuration
//!
//! Read from `~/.cidash/config.toml` when present, then overridden by
//! environment variables. Every section has defaults so a bare install runs.

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DashError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub github: Option<GitHubSection>,
    pub notifications: NotificationSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: SocketAddr,
    /// Public base URL, used for check run details links
    pub base_url: String,
    pub cors_permissive: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            base_url: "http://localhost:8080".to_string(),
            cors_permissive: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/cidash".to_string(),
            max_connections: 5,
        }
    }
}

/// GitHub checks integration; absent means check updates are only logged
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubSection {
    #[serde(default = "default_github_api")]
    pub api_url: String,
    pub owner: String,
    pub repo: String,
    #[serde(default)]
    pub token: Option<String>,
}

fn default_github_api() -> String {
    "https://api.github.com".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSection {
    /// Log full message contents instead of the send-status line
    pub debug: bool,
}

impl DashConfig {
    /// Load from the default path, falling back to defaults when missing.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path` (defaults if it does not exist), then apply env overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)
                .map_err(|e| DashError::invalid_config(path, e.to_string()))?
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Self::default()
        };

        config.apply_env()?;
        Ok(config)
    }

    /// Config file path: ~/.cidash/config.toml
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cidash/config.toml")
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = env::var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(bind) = env::var("CIDASH_BIND") {
            self.server.bind = bind
                .parse()
                .map_err(|_| DashError::config(format!("CIDASH_BIND is not an address: {}", bind)))?;
        }
        if let Ok(token) = env::var("GITHUB_TOKEN") {
            if let Some(ref mut github) = self.github {
                github.token = Some(token);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = DashConfig::default();
        assert_eq!(config.server.bind.port(), 8080);
        assert_eq!(config.database.max_connections, 5);
        assert!(config.github.is_none());
        assert!(!config.notifications.debug);
    }

    #[test]
    fn parses_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
base_url = "https://cdash.example.org"

[github]
owner = "kitware"
repo = "cmake"

[notifications]
debug = true
"#
        )
        .unwrap();

        let config = DashConfig::load_from(file.path()).unwrap();

        assert_eq!(config.server.base_url, "https://cdash.example.org");
        assert_eq!(config.server.bind.port(), 8080);
        let github = config.github.unwrap();
        assert_eq!(github.api_url, "https://api.github.com");
        assert_eq!(github.repo, "cmake");
        assert!(config.notifications.debug);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(config.github.is_none());
    }

    #[test]
    fn invalid_toml_is_reported_with_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nbind = ").unwrap();

        let err = DashConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, DashError::InvalidConfig { .. }));
    }
}

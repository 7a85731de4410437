//! cidash-server: persistence and HTTP surface for the CI dashboard
//!
//! - `db`: Postgres pool, schema, and the build email repository
//! - `checks`: repository status updaters (GitHub checks, or log only)
//! - `http`: axum server with the GitHub webhook route

pub mod checks;
pub mod db;
pub mod http;

pub use checks::{CheckError, CheckUpdater, GitHubCheckClient, LoggingCheckUpdater};
pub use db::{BuildEmailRepo, DbError};
pub use http::{build_router, run_server, AppState, ServerConfig};

/// Structured error types for cidash-core.
///
/// Library consumers get `thiserror` enums; the `cidash` binary wraps them
/// in `anyhow` at the edge.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cidash-core operations
#[derive(Error, Debug)]
pub enum DashError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// A build email is missing one or more required fields
    #[error("Missing: {fields}; cannot save BuildEmail for {recipient}.")]
    MissingFields { fields: String, recipient: String },

    /// Config file could not be parsed
    #[error("Invalid config file {path:?}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    /// Configuration value is unusable
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for cidash-core operations
pub type Result<T> = std::result::Result<T, DashError>;

impl DashError {
    /// Create a missing fields error from the absent field names
    pub fn missing_fields(fields: &[&str], recipient: Option<&str>) -> Self {
        Self::MissingFields {
            fields: fields.join(", "),
            recipient: recipient.unwrap_or_default().to_string(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_message_lists_fields_and_recipient() {
        let err = DashError::missing_fields(&["BuildId", "Category"], Some("dev@example.com"));
        assert_eq!(
            err.to_string(),
            "Missing: BuildId, Category; cannot save BuildEmail for dev@example.com."
        );
    }

    #[test]
    fn missing_fields_without_recipient() {
        let err = DashError::missing_fields(&["UserId"], None);
        assert_eq!(err.to_string(), "Missing: UserId; cannot save BuildEmail for .");
    }

    #[test]
    fn io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: DashError = io_err.into();

        assert!(matches!(err, DashError::Io { .. }));
    }
}

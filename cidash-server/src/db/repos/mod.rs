//! Repository implementations for database access

pub mod build_emails;

pub use build_emails::BuildEmailRepo;

use cidash_core::DashError;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Invalid(#[from] DashError),
}

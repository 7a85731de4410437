//! Route handlers organized by resource

pub mod build_emails;
pub mod github_webhook;
pub mod health;

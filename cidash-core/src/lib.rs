//! cidash-core: domain types for the CI dashboard
//!
//! Build email records, outgoing notifications, configuration and errors.
//! No I/O beyond reading the config file; persistence lives in cidash-server.

pub mod build_email;
pub mod config;
pub mod error;
pub mod notification;

pub use build_email::{BuildEmail, BuildEmailCollection};
pub use config::DashConfig;
pub use error::{DashError, Result};
pub use notification::{EmailMessage, Notification};

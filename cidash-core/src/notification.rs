//! Outgoing notifications and their send-status log line

use crate::build_email::BuildEmailCollection;

/// Anything the dashboard delivers to a person
pub trait Notification {
    fn recipient(&self) -> &str;
    fn subject(&self) -> &str;
    fn body(&self) -> &str;

    /// Short type name used in log lines
    fn kind(&self) -> &'static str;
}

/// A composed notification email
///
/// Carries the build email records it stands for, so they can be saved
/// once the message has gone out.
#[derive(Debug, Clone, Default)]
pub struct EmailMessage {
    recipient: String,
    subject: String,
    body: String,
    build_emails: BuildEmailCollection,
}

impl EmailMessage {
    pub fn new(
        recipient: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
            build_emails: BuildEmailCollection::new(),
        }
    }

    pub fn with_build_emails(mut self, build_emails: BuildEmailCollection) -> Self {
        self.build_emails = build_emails;
        self
    }

    pub fn build_emails(&self) -> &BuildEmailCollection {
        &self.build_emails
    }
}

impl Notification for EmailMessage {
    fn recipient(&self) -> &str {
        &self.recipient
    }

    fn subject(&self) -> &str {
        &self.subject
    }

    fn body(&self) -> &str {
        &self.body
    }

    fn kind(&self) -> &'static str {
        "EmailMessage"
    }
}

/// Format the send status of a notification.
///
/// ```
/// use cidash_core::notification::{status_line, EmailMessage};
///
/// let msg = EmailMessage::new("dev@example.com", "FAILED (b=1): proj", "");
/// assert_eq!(
///     status_line(&msg, true),
///     "[SENT] EmailMessage titled, 'FAILED (b=1): proj' to dev@example.com"
/// );
/// ```
pub fn status_line(notification: &dyn Notification, sent: bool) -> String {
    let status = if sent { "SENT" } else { "NOT SENT" };
    format!(
        "[{}] {} titled, '{}' to {}",
        status,
        notification.kind(),
        notification.subject(),
        notification.recipient()
    )
}

/// Log whether a notification went out.
///
/// With `debug` set, the full message is logged instead of the status line
/// so test setups can inspect what would have been delivered.
pub fn log_notification(notification: &dyn Notification, sent: bool, debug: bool) {
    if debug {
        tracing::debug!(tag = "TESTING: EMAIL", "{}", notification.recipient());
        tracing::debug!(tag = "TESTING: EMAILTITLE", "{}", notification.subject());
        tracing::debug!(tag = "TESTING: EMAILBODY", "{}", notification.body());
    } else {
        tracing::info!(
            target: "cidash::notification",
            sent,
            "{}",
            status_line(notification, sent)
        );
    }
}

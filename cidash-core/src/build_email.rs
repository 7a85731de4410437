//! Build email records
//!
//! A `BuildEmail` remembers that a notification of some category was sent
//! to a user for a build. Records are append-only: built in memory, stored
//! once, and read back as fresh values.

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DashError, Result};

/// Record of a notification email sent for a build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildEmail {
    user_id: Option<i32>,
    build_id: Option<i32>,
    category: Option<i16>,
    email: Option<String>,
    time: Option<NaiveDateTime>,
    sent: bool,
}

impl BuildEmail {
    /// Empty record; `was_sent()` is false until read back from storage.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_id(mut self, user_id: i32) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_build_id(mut self, build_id: i32) -> Self {
        self.build_id = Some(build_id);
        self
    }

    pub fn with_category(mut self, category: i16) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_time(mut self, time: NaiveDateTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_sent(mut self, sent: bool) -> Self {
        self.sent = sent;
        self
    }

    /// Set the send time to now, truncated to whole seconds.
    pub fn stamp_now(mut self) -> Self {
        self.time = Some(Utc::now().naive_utc().trunc_subsecs(0));
        self
    }

    pub fn user_id(&self) -> Option<i32> {
        self.user_id
    }

    pub fn build_id(&self) -> Option<i32> {
        self.build_id
    }

    pub fn category(&self) -> Option<i16> {
        self.category
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn time(&self) -> Option<NaiveDateTime> {
        self.time
    }

    pub fn was_sent(&self) -> bool {
        self.sent
    }

    /// Names of the required fields that are absent.
    ///
    /// Zero counts as absent: ids and categories start at 1.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.build_id.unwrap_or(0) == 0 {
            missing.push("BuildId");
        }
        if self.user_id.unwrap_or(0) == 0 {
            missing.push("UserId");
        }
        if self.category.unwrap_or(0) == 0 {
            missing.push("Category");
        }
        missing
    }

    /// Check that the record can be persisted.
    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DashError::missing_fields(&missing, self.email()))
        }
    }
}

/// Build emails grouped by recipient address
///
/// A single recipient may be notified about several categories of the
/// same build, so each address maps to a list.
#[derive(Debug, Clone, Default)]
pub struct BuildEmailCollection {
    by_recipient: BTreeMap<String, Vec<BuildEmail>>,
}

impl BuildEmailCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record under its recipient address (empty when unknown).
    pub fn add(&mut self, email: BuildEmail) {
        let recipient = email.email().unwrap_or_default().to_string();
        self.by_recipient.entry(recipient).or_default().push(email);
    }

    /// Total number of records across all recipients
    pub fn len(&self) -> usize {
        self.by_recipient.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_recipient.is_empty()
    }

    pub fn recipients(&self) -> impl Iterator<Item = &str> {
        self.by_recipient.keys().map(String::as_str)
    }

    pub fn for_recipient(&self, recipient: &str) -> &[BuildEmail] {
        self.by_recipient
            .get(recipient)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All records, flattened in recipient order
    pub fn iter(&self) -> impl Iterator<Item = &BuildEmail> {
        self.by_recipient.values().flatten()
    }

    /// Whether `recipient` already received a notification of `category`.
    pub fn was_sent(&self, recipient: &str, category: i16) -> bool {
        self.for_recipient(recipient)
            .iter()
            .any(|e| e.was_sent() && e.category() == Some(category))
    }
}

impl FromIterator<BuildEmail> for BuildEmailCollection {
    fn from_iter<I: IntoIterator<Item = BuildEmail>>(iter: I) -> Self {
        let mut collection = Self::new();
        for email in iter {
            collection.add(email);
        }
        collection
    }
}

//! Build email repository
//!
//! Records which notification categories were mailed to which users for a
//! build. Writes are append-only INSERTs; there is no update or delete path.

use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool};

use cidash_core::config::NotificationSection;
use cidash_core::notification::log_notification;
use cidash_core::{BuildEmail, BuildEmailCollection, EmailMessage};

use super::DbError;

/// Row of `buildemail` joined with the recipient's address
#[derive(Debug, FromRow)]
struct SentEmailRow {
    userid: i32,
    category: i16,
    time: NaiveDateTime,
    email: String,
}

/// Build email repository
pub struct BuildEmailRepo<'a> {
    pool: &'a PgPool,
    debug_notifications: bool,
}

impl<'a> BuildEmailRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            debug_notifications: false,
        }
    }

    /// Take delivery logging mode from the `[notifications]` config section.
    pub fn with_notifications(mut self, notifications: &NotificationSection) -> Self {
        self.debug_notifications = notifications.debug;
        self
    }

    pub fn debug_notifications(&self) -> bool {
        self.debug_notifications
    }

    /// Insert a record of `email` having been sent.
    ///
    /// Fails with `DbError::Invalid` before touching the database when user,
    /// build or category is missing. Returns the stored record, time stamped.
    pub async fn insert(&self, email: &BuildEmail) -> Result<BuildEmail, DbError> {
        email.validate()?;

        let stored = email.clone().stamp_now().with_sent(true);

        sqlx::query(
            r#"
            INSERT INTO buildemail (userid, buildid, category, time)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(stored.user_id())
        .bind(stored.build_id())
        .bind(stored.category())
        .bind(stored.time())
        .execute(self.pool)
        .await?;

        Ok(stored)
    }

    /// Save a record, reporting only success or failure.
    ///
    /// Missing fields and database errors are logged and yield `false`.
    pub async fn save(&self, email: &BuildEmail) -> bool {
        match self.insert(email).await {
            Ok(stored) => {
                tracing::debug!(
                    user_id = ?stored.user_id(),
                    build_id = ?stored.build_id(),
                    category = ?stored.category(),
                    "build email saved"
                );
                true
            }
            Err(DbError::Invalid(e)) => {
                tracing::warn!("{}", e);
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to save build email");
                false
            }
        }
    }

    /// Save every build email carried by a sent message.
    ///
    /// Returns how many records were stored.
    pub async fn save_notification(&self, message: &EmailMessage) -> usize {
        let mut saved = 0;
        for email in message.build_emails().iter() {
            if self.save(email).await {
                saved += 1;
            }
        }
        saved
    }

    /// Log a delivery attempt and, if the message went out, record its
    /// build emails. Returns how many records were stored.
    ///
    /// In debug mode the full message is logged instead of the status line.
    pub async fn record_delivery(&self, message: &EmailMessage, sent: bool) -> usize {
        log_notification(message, sent, self.debug_notifications);
        if sent {
            self.save_notification(message).await
        } else {
            0
        }
    }

    /// Look up the record of a previously sent email.
    ///
    /// Returns an unsent, empty record when no row matches.
    pub async fn get_for_user(
        &self,
        user_id: i32,
        build_id: i32,
        category: i16,
    ) -> Result<BuildEmail, DbError> {
        let time: Option<NaiveDateTime> = sqlx::query_scalar(
            r#"
            SELECT time FROM buildemail
            WHERE userid = $1 AND buildid = $2 AND category = $3
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(build_id)
        .bind(category)
        .fetch_optional(self.pool)
        .await?;

        Ok(match time {
            Some(time) => BuildEmail::new()
                .with_sent(true)
                .with_user_id(user_id)
                .with_build_id(build_id)
                .with_category(category)
                .with_time(time),
            None => BuildEmail::new(),
        })
    }

    /// All emails sent for a build, with recipient addresses.
    ///
    /// Single query: JOIN against the user table (no N+1).
    pub async fn sent_for_build(&self, build_id: i32) -> Result<BuildEmailCollection, DbError> {
        let rows: Vec<SentEmailRow> = sqlx::query_as(
            r#"
            SELECT b.userid, b.category, b.time, u.email
            FROM buildemail b
            JOIN "user" u ON u.id = b.userid
            WHERE b.buildid = $1
            ORDER BY b.time, b.userid, b.category
            "#,
        )
        .bind(build_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                BuildEmail::new()
                    .with_build_id(build_id)
                    .with_category(row.category)
                    .with_email(row.email)
                    .with_user_id(row.userid)
                    .with_time(row.time)
                    .with_sent(true)
            })
            .collect())
    }
}

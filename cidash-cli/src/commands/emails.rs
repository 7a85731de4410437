//! Inspect recorded build emails

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use cidash_core::{BuildEmail, BuildEmailCollection, DashConfig, EmailMessage};
use cidash_server::db::create_pool;
use cidash_server::BuildEmailRepo;

#[derive(Parser, Debug)]
pub struct EmailsArgs {
    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: EmailsCommand,
}

#[derive(Subcommand, Debug)]
pub enum EmailsCommand {
    /// List every email recorded for a build
    Sent {
        /// Build id
        build_id: i32,
    },
    /// Show whether a user was mailed about a build category
    Lookup {
        /// Recipient user id
        #[arg(long)]
        user: i32,
        /// Build id
        #[arg(long)]
        build: i32,
        /// Notification category code
        #[arg(long)]
        category: i16,
    },
    /// Record that a notification email went out for a build
    Record {
        /// Recipient user id
        #[arg(long)]
        user: i32,
        /// Build id
        #[arg(long)]
        build: i32,
        /// Notification category code
        #[arg(long)]
        category: i16,
        /// Recipient address
        #[arg(long)]
        to: String,
        /// Subject line of the delivered email
        #[arg(long, default_value = "")]
        subject: String,
    },
}

pub async fn run_emails(args: EmailsArgs, config: DashConfig) -> Result<()> {
    let database_url = args
        .database_url
        .unwrap_or_else(|| config.database.url.clone());
    let pool = create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    let repo = BuildEmailRepo::new(&pool).with_notifications(&config.notifications);

    match args.command {
        EmailsCommand::Sent { build_id } => {
            let sent = repo
                .sent_for_build(build_id)
                .await
                .with_context(|| format!("Failed to load emails for build {}", build_id))?;

            if args.json {
                let rows: Vec<_> = sent
                    .iter()
                    .map(|e| {
                        json!({
                            "user_id": e.user_id(),
                            "email": e.email(),
                            "category": e.category(),
                            "time": e.time(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if sent.is_empty() {
                println!("No emails recorded for build {}", build_id);
            } else {
                for email in sent.iter() {
                    println!(
                        "{:<32} category {:>3}  {}",
                        email.email().unwrap_or("-"),
                        email.category().unwrap_or_default(),
                        email.time().map(|t| t.to_string()).unwrap_or_default()
                    );
                }
            }
        }
        EmailsCommand::Lookup { user, build, category } => {
            let found = repo
                .get_for_user(user, build, category)
                .await
                .context("Lookup failed")?;

            if args.json {
                println!(
                    "{}",
                    json!({ "sent": found.was_sent(), "time": found.time() })
                );
            } else if found.was_sent() {
                println!(
                    "sent at {}",
                    found.time().map(|t| t.to_string()).unwrap_or_default()
                );
            } else {
                println!("not sent");
            }
        }
        EmailsCommand::Record {
            user,
            build,
            category,
            to,
            subject,
        } => {
            let emails: BuildEmailCollection = [BuildEmail::new()
                .with_user_id(user)
                .with_build_id(build)
                .with_category(category)
                .with_email(to.clone())]
            .into_iter()
            .collect();
            let message = EmailMessage::new(to, subject, "").with_build_emails(emails);

            let saved = repo.record_delivery(&message, true).await;
            if saved == 0 {
                anyhow::bail!("Build email was not recorded (see log for details)");
            }
            println!("recorded");
        }
    }

    Ok(())
}

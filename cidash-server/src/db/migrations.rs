//! Schema for the build email tables

use sqlx::PgPool;

use super::repos::DbError;

/// Create the `user` and `buildemail` tables if they do not exist.
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running build email migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS "user" (
            id SERIAL PRIMARY KEY,
            email VARCHAR(255) NOT NULL DEFAULT '',
            firstname VARCHAR(40) NOT NULL DEFAULT '',
            lastname VARCHAR(40) NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS buildemail (
            userid INTEGER NOT NULL,
            buildid INTEGER NOT NULL,
            category SMALLINT NOT NULL,
            time TIMESTAMP NOT NULL DEFAULT '1980-01-01 00:00:00'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS buildemail_user_build_category ON buildemail (userid, buildid, category)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS buildemail_buildid ON buildemail (buildid)")
        .execute(pool)
        .await?;

    tracing::info!("Build email migrations complete");
    Ok(())
}

use std::str::FromStr;

use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;

pub mod models;

pub type DbPool = SqlitePool;

pub async fn init(cfg: &Config) -> Result<DbPool> {
    let db_url = format!("sqlite://{}?mode=rwc", cfg.database.path);

    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(20)
        .connect_with(
            sqlx::sqlite::SqliteConnectOptions::from_str(&db_url)?.create_if_missing(true),
        )
        .await?;

    sqlx::migrate!("./src/db/migrations").run(&pool).await?;

    // WAL so admission reads don't queue behind admin writes
    sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;

    sqlx::query("PRAGMA synchronous=NORMAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout=5000").execute(&pool).await?;

    tracing::info!("Database connected: {}", cfg.database.path);
    Ok(pool)
}

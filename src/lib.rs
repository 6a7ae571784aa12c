mod db_helpers;
mod errors;
mod models;

use anyhow::Context;
pub use anyhow::Result;
pub use db_helpers::*;
pub use errors::DataError;
pub use models::*;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

const DEFAULT_MAX_CONNECTIONS: u32 = 20;
const IDLE_TIMEOUT: Duration = Duration::from_secs(30);
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Connects the process-wide pool and brings the schema up to date. Missing
/// configuration is fatal here, before any query runs.
pub async fn init_db() -> Result<PgPool> {
    let db_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let max_connections = match std::env::var("DATABASE_MAX_CONNECTIONS") {
        Ok(value) => value
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be an integer")?,
        Err(_) => DEFAULT_MAX_CONNECTIONS,
    };

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .idle_timeout(IDLE_TIMEOUT)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(&db_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Running migrations");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations completed");

    Ok(pool)
}

pub async fn close_db(pool: &PgPool) {
    pool.close().await;
}

//! MySQL pool for the summary table

use crate::schema::{tables, CREATE_DAILY_SUMMARY_TABLE};
use crate::{DbError, DbResult};
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Check the scheme and parse a `mysql://` / `mariadb://` URL
fn connect_options(database_url: &str) -> DbResult<MySqlConnectOptions> {
    let scheme = database_url.split("://").next().unwrap_or_default();
    if scheme != "mysql" && scheme != "mariadb" {
        return Err(DbError::UnsupportedUrl(format!(
            "scheme `{}` is not mysql or mariadb",
            scheme
        )));
    }

    // sqlx only understands the mysql scheme.
    let url = match database_url.strip_prefix("mariadb://") {
        Some(rest) => format!("mysql://{}", rest),
        None => database_url.to_string(),
    };
    Ok(MySqlConnectOptions::from_str(&url)?)
}

/// Cloneable handle on the summary database
#[derive(Clone)]
pub struct DbClient {
    pool: MySqlPool,
}

impl DbClient {
    pub async fn new(database_url: &str) -> DbResult<Self> {
        let options = connect_options(database_url)?;
        let pool = MySqlPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await?;

        info!("Database pool opened ({} connections max)", MAX_CONNECTIONS);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Create the summary table and its indexes if missing
    pub async fn ensure_schema(&self) -> DbResult<()> {
        sqlx::query(CREATE_DAILY_SUMMARY_TABLE)
            .execute(&self.pool)
            .await?;
        info!("Summary table `{}` ready", tables::DAILY_SUMMARY);
        Ok(())
    }

    /// Wait for in-flight queries, then close every connection
    pub async fn close(self) {
        self.pool.close().await;
    }
}

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;
use std::time::Duration;

use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::DatabaseConfig;

const LEADS_SCHEMA: &str = include_str!("../../../resources/leads/schema.sql");

const LEADS_SCHEMA_VERSION: i32 = 1;

pub fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Open the lead database pool. In-memory databases get a single, never-recycled
/// connection so every query sees the same database.
pub async fn connect_pool(config: &DatabaseConfig) -> Result<SqlitePool> {
    let memory = is_memory_url(&config.url);

    let mut options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| AppError::ConfigError(format!("Failed to parse database URL: {}", e)))?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(config.busy_timeout_secs));
    if !memory {
        options = options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);
    }

    let pool_options = if memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(config.max_connections)
    };

    pool_options
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
        .map_err(|e| AppError::StoreUnavailable(format!("Failed to connect lead DB: {}", e)))
}

/// Create or upgrade the schema. A database newer than this build is refused.
pub async fn init_lead_db(pool: &SqlitePool) -> Result<()> {
    let current_version = read_user_version(pool).await?;
    if current_version > LEADS_SCHEMA_VERSION {
        return Err(AppError::DatabaseError(format!(
            "Lead database schema too new: db user_version={} > supported_version={}",
            current_version, LEADS_SCHEMA_VERSION
        )));
    }

    for stmt in split_sql_statements(LEADS_SCHEMA) {
        sqlx::query(&stmt).execute(pool).await.map_err(|e| {
            AppError::DatabaseError(format!("Failed to apply lead schema statement: {}", e))
        })?;
    }

    set_user_version(pool, LEADS_SCHEMA_VERSION).await?;

    tracing::debug!(version = LEADS_SCHEMA_VERSION, "Lead database schema ready");
    Ok(())
}

async fn read_user_version(pool: &SqlitePool) -> Result<i32> {
    sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to read PRAGMA user_version: {}", e)))
}

async fn set_user_version(pool: &SqlitePool, version: i32) -> Result<()> {
    let sql = format!("PRAGMA user_version = {}", version);
    sqlx::query(&sql)
        .execute(pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to set PRAGMA user_version: {}", e)))?;
    Ok(())
}

/// Splits on `;`, ignoring semicolons inside quotes and `--` comments.
fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut in_single = false;
    let mut in_line_comment = false;

    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        if in_line_comment {
            if c == '\n' {
                in_line_comment = false;
                buf.push(c);
            }
            continue;
        }

        match c {
            '-' if !in_single && chars.peek() == Some(&'-') => {
                in_line_comment = true;
            }
            '\'' => {
                in_single = !in_single;
                buf.push(c);
            }
            ';' if !in_single => {
                let stmt = buf.trim();
                if !stmt.is_empty() {
                    out.push(stmt.to_string());
                }
                buf.clear();
            }
            _ => buf.push(c),
        }
    }

    let tail = buf.trim();
    if !tail.is_empty() {
        out.push(tail.to_string());
    }

    out
}

//! Application SQLite database.
//!
//! One database per installation, stored in the platform data directory.
//! It holds the model configurations, model group presets, and the
//! key-value application metadata. Chat content lives in the chat store
//! and is not managed here.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Schema for the application database.
const SCHEMA: &str = r#"
-- Model connection settings
CREATE TABLE IF NOT EXISTS model_configs (
    id TEXT PRIMARY KEY,
    provider TEXT NOT NULL,
    model_id TEXT NOT NULL,
    display_name TEXT NOT NULL,
    api_key TEXT,
    base_url TEXT,
    enabled INTEGER NOT NULL DEFAULT 1,
    sort_order INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_model_configs_sort ON model_configs(sort_order);

-- Model group presets; instances is a JSON array of {id, model_config_id}
-- (legacy rows hold a JSON array of bare model_config_id strings)
CREATE TABLE IF NOT EXISTS model_groups (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    instances TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Key-value application metadata (JSON values)
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Schema version for future migrations
INSERT OR IGNORE INTO metadata (key, value) VALUES ('schema_version', '2');
"#;

/// Application database connection.
#[derive(Debug, Clone)]
pub struct AppDb {
    pool: SqlitePool,
    path: PathBuf,
}

impl AppDb {
    /// Open or create the application database.
    ///
    /// Creates the database file and parent directories if they don't exist.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating data directory: {}", parent.display()))?;
        }

        let database_url = format!("sqlite://{}?mode=rwc", path.display());

        let options = SqliteConnectOptions::from_str(&database_url)
            .context("parsing database URL")?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(3)
            .connect_with(options)
            .await
            .with_context(|| format!("connecting to app database: {}", path.display()))?;

        let db = Self {
            pool,
            path: path.to_path_buf(),
        };
        db.initialize_schema().await?;

        Ok(db)
    }

    /// Initialize the database schema.
    async fn initialize_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .context("initializing app database schema")?;
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get the database file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the database connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Check if the database is healthy.
    pub async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }
}

/// Get the default path for the application database.
///
/// Returns `{platform data dir}/quorum/quorum.db`, or `None` when the
/// platform has no data directory (headless CI).
pub fn default_db_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("quorum").join("quorum.db"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_and_open() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("test.db");

        let db = AppDb::open(&db_path).await.unwrap();
        assert!(db.is_healthy().await);
        assert!(db_path.exists());

        db.close().await;
    }

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("test.db");

        let db = AppDb::open(&db_path).await.unwrap();
        db.close().await;

        // Reopening runs the DDL again against the existing file.
        let db = AppDb::open(&db_path).await.unwrap();
        assert!(db.is_healthy().await);
        db.close().await;
    }

    #[tokio::test]
    async fn test_schema_version_seeded() {
        let temp = TempDir::new().unwrap();
        let db = AppDb::open(&temp.path().join("test.db")).await.unwrap();

        let version: String =
            sqlx::query_scalar("SELECT value FROM metadata WHERE key = 'schema_version'")
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(version, "2");

        db.close().await;
    }
}

//! SQLite connection pool wrapper for the storage crate.

use std::str::FromStr;

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool};
use tracing::info;

/// Manages a single SQLite pool; creates the DB file if missing.
///
/// `sqlite::memory:` (or `:memory:`) opens a private in-memory database held by one connection
/// that never expires, so the data lives as long as the manager.
#[derive(Clone, Debug)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
}

impl SqlitePoolManager {
    /// Creates a pool for the given database URL (file path, `sqlite:` URL or in-memory).
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        info!(database_url = %database_url, "Initializing SQLite pool");

        let pool = if is_memory(database_url) {
            let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            let options = SqliteConnectOptions::new()
                .create_if_missing(true)
                .filename(file_path(database_url));
            SqlitePoolOptions::new().connect_with(options).await?
        };

        Ok(Self { pool })
    }

    /// Opens an existing database without write access. A missing file is an error rather than
    /// a fresh empty store; in-memory URLs behave as in [`Self::new`].
    pub async fn open_read_only(database_url: &str) -> Result<Self, sqlx::Error> {
        if is_memory(database_url) {
            return Self::new(database_url).await;
        }
        info!(database_url = %database_url, "Opening SQLite pool read-only");

        let options = SqliteConnectOptions::new()
            .create_if_missing(false)
            .read_only(true)
            .filename(file_path(database_url));
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        Ok(Self { pool })
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Checks out one connection; it goes back to the pool when dropped.
    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>, sqlx::Error> {
        self.pool.acquire().await
    }
}

fn is_memory(database_url: &str) -> bool {
    matches!(
        database_url.trim(),
        "sqlite::memory:" | ":memory:" | "sqlite://:memory:"
    )
}

fn file_path(database_url: &str) -> &str {
    let url = database_url.trim();
    ["sqlite://", "sqlite:", "file:"]
        .iter()
        .find_map(|prefix| url.strip_prefix(prefix))
        .unwrap_or(url)
}

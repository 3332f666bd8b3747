use std::env;

use anyhow::{Context, Result};
use storage::SchemaGeneration;

/// Settings shared by the history library and the `cesaa` binary.
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// DATABASE_URL: recorder SQLite database (path, `sqlite:` URL or `sqlite::memory:`)
    pub database_url: String,
    /// CHATRECORDER_SCHEMA: `uninfo` or `session`
    pub schema: SchemaGeneration,
    /// LOG_FILE
    pub log_file: String,
}

impl HistoryConfig {
    /// Load from environment variables. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn load() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "./chatrecorder.db".to_string());
        let schema = match env::var("CHATRECORDER_SCHEMA") {
            Ok(value) => value
                .parse::<SchemaGeneration>()
                .with_context(|| format!("Invalid CHATRECORDER_SCHEMA: {}", value))?,
            Err(_) => SchemaGeneration::Uninfo,
        };
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/cesaa.log".to_string());

        Ok(Self {
            database_url,
            schema,
            log_file,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            anyhow::bail!("DATABASE_URL is set but empty");
        }
        if self.log_file.trim().is_empty() {
            anyhow::bail!("LOG_FILE is set but empty");
        }
        Ok(())
    }
}

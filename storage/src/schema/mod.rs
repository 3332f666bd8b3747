//! Recorder schema generations.
//!
//! The recorder moved from a flat session table ([`SessionSchema`]) to normalized bot, scene and
//! user tables ([`UninfoSchema`]). Both keep message records in the same `message_record` table;
//! what differs is how a record reaches its conversation metadata and which filters apply.

mod session;
mod uninfo;

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::StorageError;
use crate::predicate::{Column, PredicateSet};

pub use session::{columns as session_columns, SessionFilter, SessionIdType, SessionSchema};
pub use uninfo::{columns as uninfo_columns, UninfoFilter, UninfoSchema, UninfoSessionFlags};

/// Table holding message records, shared by every generation.
pub const MESSAGE_RECORD_TABLE: &str = "message_record";

/// Columns of [`MESSAGE_RECORD_TABLE`].
pub mod record_columns {
    use crate::predicate::Column;

    pub const ID: Column = Column::new("message_record", "id");
    pub const SESSION_PERSIST_ID: Column = Column::new("message_record", "session_persist_id");
    pub const TIME: Column = Column::new("message_record", "time");
    pub const TYPE: Column = Column::new("message_record", "type");
    pub const MESSAGE_ID: Column = Column::new("message_record", "message_id");
    pub const MESSAGE: Column = Column::new("message_record", "message");
    pub const PLAIN_TEXT: Column = Column::new("message_record", "plain_text");
}

pub(crate) const MESSAGE_RECORD_DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS message_record (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        session_persist_id INTEGER NOT NULL,
        time TEXT NOT NULL,
        type TEXT NOT NULL,
        message_id TEXT NOT NULL,
        message TEXT NOT NULL,
        plain_text TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_message_record_session ON message_record(session_persist_id)",
    "CREATE INDEX IF NOT EXISTS idx_message_record_time ON message_record(time)",
    "CREATE INDEX IF NOT EXISTS idx_message_record_type ON message_record(type)",
];

/// Which recorder table layout a store uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaGeneration {
    /// Flat `(platform, level, id1, id2, id3)` sessions.
    Session,
    /// Normalized bot / scene / user / session tables.
    Uninfo,
}

impl SchemaGeneration {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaGeneration::Session => "session",
            SchemaGeneration::Uninfo => "uninfo",
        }
    }

    /// Metadata tables of this generation, in creation order.
    pub(crate) fn ddl(&self) -> &'static [&'static str] {
        match self {
            SchemaGeneration::Session => SessionSchema::DDL,
            SchemaGeneration::Uninfo => UninfoSchema::DDL,
        }
    }

    /// Table whose presence marks a store of this generation.
    pub fn session_table(&self) -> &'static str {
        match self {
            SchemaGeneration::Session => "session_model",
            SchemaGeneration::Uninfo => "uninfo_session",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            SchemaGeneration::Session => SchemaGeneration::Uninfo,
            SchemaGeneration::Uninfo => SchemaGeneration::Session,
        }
    }

    /// Whether the store behind `pool` has this generation's tables. Reads `sqlite_master` only.
    pub async fn is_present(&self, pool: &SqlitePool) -> Result<bool, StorageError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(self.session_table())
                .fetch_one(pool)
                .await?;
        Ok(count > 0)
    }
}

impl fmt::Display for SchemaGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaGeneration {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "session" => Ok(SchemaGeneration::Session),
            "uninfo" => Ok(SchemaGeneration::Uninfo),
            other => Err(StorageError::UnknownGeneration(other.to_string())),
        }
    }
}

/// A caller-supplied set of optional criteria that narrows a record query.
pub trait FilterSpec {
    /// Predicates for every criterion that is set, in a fixed order.
    fn filter_statement(&self) -> PredicateSet;
}

/// Static description of one schema generation.
pub trait RecordSchema: Send + Sync + 'static {
    type Filter: FilterSpec
        + Default
        + Clone
        + fmt::Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync;

    const GENERATION: SchemaGeneration;

    /// `CREATE` statements for the metadata tables.
    const DDL: &'static [&'static str];

    /// `FROM` clause joining `message_record` to every metadata table a predicate may reference.
    const RECORD_SOURCE: &'static str;

    /// Column carrying the adapter tag needed to deserialize a record's payload.
    const ADAPTER_COLUMN: Column;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_from_str() {
        assert_eq!("session".parse::<SchemaGeneration>().unwrap(), SchemaGeneration::Session);
        assert_eq!(" Uninfo ".parse::<SchemaGeneration>().unwrap(), SchemaGeneration::Uninfo);
        assert!(matches!(
            "datastore".parse::<SchemaGeneration>(),
            Err(StorageError::UnknownGeneration(ref g)) if g == "datastore"
        ));
    }

    #[tokio::test]
    async fn test_is_present_reads_tables_on_disk() {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to open pool");
        assert!(!SchemaGeneration::Session.is_present(&pool).await.unwrap());

        for statement in SchemaGeneration::Session.ddl() {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .expect("Failed to create tables");
        }

        assert!(SchemaGeneration::Session.is_present(&pool).await.unwrap());
        assert!(!SchemaGeneration::Uninfo.is_present(&pool).await.unwrap());
    }

    #[test]
    fn test_record_source_starts_from_message_record() {
        assert!(SessionSchema::RECORD_SOURCE.starts_with("message_record"));
        assert!(UninfoSchema::RECORD_SOURCE.starts_with("message_record"));
        assert_eq!(UninfoSchema::RECORD_SOURCE.matches(" JOIN ").count(), 4);
        assert_eq!(SessionSchema::RECORD_SOURCE.matches(" JOIN ").count(), 1);
    }
}

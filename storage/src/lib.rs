//! Storage crate: the chat recorder's message store.
//!
//! ## Modules
//!
//! - [`error`] – Storage and codec error types
//! - [`models`] – MessageRecord, NewMessageRecord, MessageType, session keys
//! - [`predicate`] – Column predicates rendered into `WHERE` clauses
//! - [`schema`] – Schema generations (flat session / normalized uninfo), their tables and filters
//! - [`codec`] – Message payload (de)serialization keyed by adapter
//! - [`message_repo`] – MessageRepository (SQLite): tables, sessions, records
//! - [`sqlite_pool`] – SqlitePoolManager

pub mod codec;
pub mod error;
pub mod message_repo;
pub mod models;
pub mod predicate;
pub mod schema;
pub mod sqlite_pool;


pub use codec::{JsonCodec, Message, MessageCodec, MessageSegment, SUPPORTED_ADAPTERS};
pub use error::{CodecError, StorageError};
pub use message_repo::MessageRepository;
pub use models::{MessageRecord, MessageType, NewMessageRecord, SessionKey, UninfoSession};
pub use predicate::{Column, Condition, Predicate, PredicateSet, Value};
pub use schema::{
    record_columns, session_columns, uninfo_columns, FilterSpec, RecordSchema, SchemaGeneration,
    SessionFilter, SessionIdType, SessionSchema, UninfoFilter, UninfoSchema, UninfoSessionFlags,
};
pub use sqlite_pool::SqlitePoolManager;

//! # cesaa
//!
//! Chat history by send target: reads the chat recorder's message store using a
//! [`PlatformTarget`](cesaa_core::PlatformTarget) to pick the conversation.
//!
//! ## Modules
//!
//! - [`classifier`] – Target classifiers, one per schema generation
//! - [`history`] – MessageHistory: records, messages and plain text by target and filter
//! - [`config`] – HistoryConfig loaded from env
//! - [`error`] – Error and Result

pub mod classifier;
pub mod config;
pub mod error;
pub mod history;

pub use classifier::{FilterOf, SessionClassifier, TargetClassifier, UninfoClassifier};
pub use config::HistoryConfig;
pub use error::{Error, Result};
pub use history::MessageHistory;

pub use cesaa_core::{DetailType, PlatformTarget};
pub use storage::{
    Message, MessageRecord, MessageType, SessionFilter, SessionIdType, UninfoFilter,
    UninfoSessionFlags,
};

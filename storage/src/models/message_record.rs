//! Message record model for persistence.
//!
//! Maps to the `message_record` table, which is shared by both schema generations.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::{Message, MessageCodec};
use crate::error::CodecError;
use crate::predicate::Value;

/// Event that produced a record: a received message or one the bot sent itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Message,
    MessageSent,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Message => "message",
            MessageType::MessageSent => "message_sent",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<MessageType> for Value {
    fn from(message_type: MessageType) -> Self {
        Value::Text(message_type.as_str().to_string())
    }
}

/// A stored message. `message` is the serialized payload, `plain_text` its text projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageRecord {
    pub id: i64,
    pub session_persist_id: i64,
    pub time: DateTime<Utc>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub message_type: String,
    pub message_id: String,
    pub message: String,
    pub plain_text: String,
}

/// A record to insert; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessageRecord {
    pub session_persist_id: i64,
    pub time: DateTime<Utc>,
    pub message_type: MessageType,
    pub message_id: String,
    pub message: String,
    pub plain_text: String,
}

impl NewMessageRecord {
    /// Serializes `message` with `codec` and derives the plain-text projection. Time is now.
    pub fn from_message(
        session_persist_id: i64,
        message_type: MessageType,
        message_id: impl Into<String>,
        message: &Message,
        codec: &dyn MessageCodec,
    ) -> Result<Self, CodecError> {
        Ok(Self {
            session_persist_id,
            time: Utc::now(),
            message_type,
            message_id: message_id.into(),
            message: codec.serialize(message)?,
            plain_text: message.extract_plain_text(),
        })
    }

    pub fn at(mut self, time: DateTime<Utc>) -> Self {
        self.time = time;
        self
    }
}

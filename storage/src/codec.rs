//! Message payload codec.
//!
//! A stored payload is the JSON array of a message's segments. It only makes sense together with
//! the adapter that produced it, so deserialization always takes the adapter tag stored next to it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::CodecError;

/// Adapter tags the default codec accepts.
pub const SUPPORTED_ADAPTERS: &[&str] = &[
    "OneBot V11",
    "OneBot V12",
    "Console",
    "Kaiheila",
    "Telegram",
    "Feishu",
    "RedProtocol",
    "DoDo",
    "Discord",
    "QQ",
    "Satori",
    "Minecraft",
    "GitHub",
    "DingTalk",
];

/// One segment of a rich message, e.g. `{"type": "text", "data": {"text": "hi"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageSegment {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Map<String, JsonValue>,
}

impl MessageSegment {
    pub fn new(kind: impl Into<String>, data: Map<String, JsonValue>) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        let mut data = Map::new();
        data.insert("text".to_string(), JsonValue::String(text.into()));
        Self::new("text", data)
    }

    /// Text content if this is a text segment.
    pub fn as_text(&self) -> Option<&str> {
        if self.kind != "text" {
            return None;
        }
        self.data.get("text").and_then(JsonValue::as_str)
    }
}

/// A rich message bound to the adapter that understands its segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    adapter: String,
    segments: Vec<MessageSegment>,
}

impl Message {
    pub fn new(adapter: impl Into<String>, segments: Vec<MessageSegment>) -> Self {
        Self {
            adapter: adapter.into(),
            segments,
        }
    }

    /// A message made of a single text segment.
    pub fn text(adapter: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(adapter, vec![MessageSegment::text(text)])
    }

    pub fn adapter(&self) -> &str {
        &self.adapter
    }

    pub fn segments(&self) -> &[MessageSegment] {
        &self.segments
    }

    /// Concatenation of all text segments.
    pub fn extract_plain_text(&self) -> String {
        self.segments
            .iter()
            .filter_map(MessageSegment::as_text)
            .collect()
    }
}

/// Converts between [`Message`] and the stored payload.
pub trait MessageCodec: Send + Sync {
    fn serialize(&self, message: &Message) -> Result<String, CodecError>;

    /// Rebuilds a message from `raw` as written by the adapter named `adapter`.
    fn deserialize(&self, adapter: &str, raw: &str) -> Result<Message, CodecError>;
}

/// JSON segment codec restricted to a set of known adapters.
#[derive(Debug, Clone)]
pub struct JsonCodec {
    adapters: HashSet<String>,
}

impl JsonCodec {
    pub fn new<I, S>(adapters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            adapters: adapters.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_adapter(mut self, adapter: impl Into<String>) -> Self {
        self.adapters.insert(adapter.into());
        self
    }

    fn ensure_known(&self, adapter: &str) -> Result<(), CodecError> {
        if self.adapters.contains(adapter) {
            Ok(())
        } else {
            Err(CodecError::UnknownAdapter(adapter.to_string()))
        }
    }
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::new(SUPPORTED_ADAPTERS.iter().copied())
    }
}

impl MessageCodec for JsonCodec {
    fn serialize(&self, message: &Message) -> Result<String, CodecError> {
        self.ensure_known(message.adapter())?;
        Ok(serde_json::to_string(message.segments())?)
    }

    fn deserialize(&self, adapter: &str, raw: &str) -> Result<Message, CodecError> {
        self.ensure_known(adapter)?;
        let segments: Vec<MessageSegment> = serde_json::from_str(raw)?;
        Ok(Message::new(adapter, segments))
    }
}

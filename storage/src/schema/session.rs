//! Flat session generation: one `session_model` row per (bot, platform, level, id1, id2, id3).

use cesaa_core::SessionLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{record_columns, FilterSpec, RecordSchema, SchemaGeneration};
use crate::models::{MessageType, SessionKey};
use crate::predicate::{Column, Predicate, PredicateSet};

pub mod columns {
    use crate::predicate::Column;

    pub const ID: Column = Column::new("session_model", "id");
    pub const BOT_ID: Column = Column::new("session_model", "bot_id");
    pub const BOT_TYPE: Column = Column::new("session_model", "bot_type");
    pub const PLATFORM: Column = Column::new("session_model", "platform");
    pub const LEVEL: Column = Column::new("session_model", "level");
    pub const ID1: Column = Column::new("session_model", "id1");
    pub const ID2: Column = Column::new("session_model", "id2");
    pub const ID3: Column = Column::new("session_model", "id3");
}

pub struct SessionSchema;

impl RecordSchema for SessionSchema {
    type Filter = SessionFilter;

    const GENERATION: SchemaGeneration = SchemaGeneration::Session;

    const DDL: &'static [&'static str] = &[
        r#"
        CREATE TABLE IF NOT EXISTS session_model (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            bot_id TEXT NOT NULL,
            bot_type TEXT NOT NULL,
            platform TEXT NOT NULL,
            level INTEGER NOT NULL,
            id1 TEXT NOT NULL DEFAULT '',
            id2 TEXT NOT NULL DEFAULT '',
            id3 TEXT NOT NULL DEFAULT '',
            UNIQUE (bot_id, bot_type, platform, level, id1, id2, id3)
        )
        "#,
        "CREATE INDEX IF NOT EXISTS idx_session_model_platform ON session_model(platform)",
        "CREATE INDEX IF NOT EXISTS idx_session_model_id1 ON session_model(id1)",
        "CREATE INDEX IF NOT EXISTS idx_session_model_id2 ON session_model(id2)",
        "CREATE INDEX IF NOT EXISTS idx_session_model_id3 ON session_model(id3)",
    ];

    const RECORD_SOURCE: &'static str =
        "message_record JOIN session_model ON session_model.id = message_record.session_persist_id";

    const ADAPTER_COLUMN: Column = columns::BOT_TYPE;
}

/// Which id slots of a session identify "the same conversation".
///
/// Bit 1 selects `id1` (user), bit 2 `id2` (group/channel), bit 4 `id3` (guild).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionIdType {
    Global,
    User,
    Group,
    GroupUser,
}

impl SessionIdType {
    fn bits(&self) -> u8 {
        match self {
            SessionIdType::Global => 0,
            SessionIdType::User => 1,
            SessionIdType::Group => 6,
            SessionIdType::GroupUser => 7,
        }
    }
}

/// Optional criteria for the flat generation. Every `None` (or empty list) leaves that
/// dimension unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionFilter {
    /// Bot ids to include; `None` keeps every bot.
    pub bot_ids: Option<Vec<String>>,
    /// Adapter names (`bot_type`) to include; `None` keeps every adapter.
    pub bot_types: Option<Vec<String>>,
    /// Platforms to include; `None` keeps every platform.
    pub platforms: Option<Vec<String>>,
    /// Session levels to include; `None` keeps every level.
    pub levels: Option<Vec<SessionLevel>>,
    /// `id1` values (users) to include; `None` keeps every user.
    pub id1s: Option<Vec<String>>,
    /// `id2` values (groups/channels) to include; `None` keeps every group.
    pub id2s: Option<Vec<String>>,
    /// `id3` values (guilds) to include; `None` keeps every guild.
    pub id3s: Option<Vec<String>>,
    pub exclude_bot_ids: Option<Vec<String>>,
    pub exclude_bot_types: Option<Vec<String>>,
    pub exclude_platforms: Option<Vec<String>>,
    pub exclude_levels: Option<Vec<SessionLevel>>,
    pub exclude_id1s: Option<Vec<String>>,
    pub exclude_id2s: Option<Vec<String>>,
    pub exclude_id3s: Option<Vec<String>>,
    /// Earliest record time, inclusive; `None` means no lower bound.
    pub time_start: Option<DateTime<Utc>>,
    /// Latest record time, inclusive; `None` means no upper bound.
    pub time_stop: Option<DateTime<Utc>>,
    /// Event types to include; `None` keeps received and sent messages.
    pub types: Option<Vec<MessageType>>,
}

impl SessionFilter {
    /// Restricts to the conversation of `session`: same bot, adapter and platform, plus the id
    /// slots selected by `id_type` that the session actually has.
    pub fn from_session(session: &SessionKey, id_type: SessionIdType) -> Self {
        let bits = id_type.bits();
        let slot = |bit: u8, id: &Option<String>| {
            id.as_ref()
                .filter(|id| bits & bit != 0 && !id.is_empty())
                .map(|id| vec![id.clone()])
        };
        Self {
            bot_ids: Some(vec![session.bot_id.clone()]),
            bot_types: Some(vec![session.bot_type.clone()]),
            platforms: Some(vec![session.platform.clone()]),
            id1s: slot(1, &session.id1),
            id2s: slot(2, &session.id2),
            id3s: slot(4, &session.id3),
            ..Self::default()
        }
    }
}

impl FilterSpec for SessionFilter {
    fn filter_statement(&self) -> PredicateSet {
        let mut predicates = PredicateSet::new();
        predicates.include(columns::BOT_ID, self.bot_ids.as_deref());
        predicates.include(columns::BOT_TYPE, self.bot_types.as_deref());
        predicates.include(columns::PLATFORM, self.platforms.as_deref());
        predicates.include(columns::LEVEL, self.levels.as_deref());
        predicates.include(columns::ID1, self.id1s.as_deref());
        predicates.include(columns::ID2, self.id2s.as_deref());
        predicates.include(columns::ID3, self.id3s.as_deref());
        predicates.exclude(columns::BOT_ID, self.exclude_bot_ids.as_deref());
        predicates.exclude(columns::BOT_TYPE, self.exclude_bot_types.as_deref());
        predicates.exclude(columns::PLATFORM, self.exclude_platforms.as_deref());
        predicates.exclude(columns::LEVEL, self.exclude_levels.as_deref());
        predicates.exclude(columns::ID1, self.exclude_id1s.as_deref());
        predicates.exclude(columns::ID2, self.exclude_id2s.as_deref());
        predicates.exclude(columns::ID3, self.exclude_id3s.as_deref());
        if let Some(start) = self.time_start {
            predicates.push(Predicate::at_least(record_columns::TIME, start));
        }
        if let Some(stop) = self.time_stop {
            predicates.push(Predicate::at_most(record_columns::TIME, stop));
        }
        predicates.include(record_columns::TYPE, self.types.as_deref());
        predicates
    }
}

//! Normalized generation: sessions point at a bot, a scene and a user row.
//!
//! Targets are addressed by the bot's `scope` and the scene's `(scene_id, scene_type)`.

use cesaa_core::SceneType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{record_columns, FilterSpec, RecordSchema, SchemaGeneration};
use crate::models::{MessageType, UninfoSession};
use crate::predicate::{Column, Predicate, PredicateSet};

pub mod columns {
    use crate::predicate::Column;

    pub const BOT_ID: Column = Column::new("uninfo_bot", "id");
    pub const BOT_SELF_ID: Column = Column::new("uninfo_bot", "self_id");
    pub const BOT_ADAPTER: Column = Column::new("uninfo_bot", "adapter");
    pub const BOT_SCOPE: Column = Column::new("uninfo_bot", "scope");

    pub const SCENE_ID: Column = Column::new("uninfo_scene", "scene_id");
    pub const SCENE_TYPE: Column = Column::new("uninfo_scene", "scene_type");
    pub const SCENE_PARENT_ID: Column = Column::new("uninfo_scene", "parent_scene_id");

    pub const USER_ID: Column = Column::new("uninfo_user", "user_id");
}

pub struct UninfoSchema;

impl RecordSchema for UninfoSchema {
    type Filter = UninfoFilter;

    const GENERATION: SchemaGeneration = SchemaGeneration::Uninfo;

    const DDL: &'static [&'static str] = &[
        r#"
        CREATE TABLE IF NOT EXISTS uninfo_bot (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            self_id TEXT NOT NULL,
            adapter TEXT NOT NULL,
            scope TEXT NOT NULL,
            UNIQUE (self_id, adapter, scope)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS uninfo_scene (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            bot_persist_id INTEGER NOT NULL REFERENCES uninfo_bot(id),
            parent_scene_id TEXT NOT NULL DEFAULT '',
            scene_id TEXT NOT NULL,
            scene_type INTEGER NOT NULL,
            UNIQUE (bot_persist_id, parent_scene_id, scene_id, scene_type)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS uninfo_user (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL UNIQUE
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS uninfo_session (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            bot_persist_id INTEGER NOT NULL REFERENCES uninfo_bot(id),
            scene_persist_id INTEGER NOT NULL REFERENCES uninfo_scene(id),
            user_persist_id INTEGER NOT NULL REFERENCES uninfo_user(id),
            UNIQUE (bot_persist_id, scene_persist_id, user_persist_id)
        )
        "#,
        "CREATE INDEX IF NOT EXISTS idx_uninfo_scene_scene_id ON uninfo_scene(scene_id)",
        "CREATE INDEX IF NOT EXISTS idx_uninfo_bot_scope ON uninfo_bot(scope)",
    ];

    const RECORD_SOURCE: &'static str = concat!(
        "message_record",
        " JOIN uninfo_session ON uninfo_session.id = message_record.session_persist_id",
        " JOIN uninfo_bot ON uninfo_bot.id = uninfo_session.bot_persist_id",
        " JOIN uninfo_scene ON uninfo_scene.id = uninfo_session.scene_persist_id",
        " JOIN uninfo_user ON uninfo_user.id = uninfo_session.user_persist_id",
    );

    const ADAPTER_COLUMN: Column = columns::BOT_ADAPTER;
}

/// Which parts of a session [`UninfoFilter::from_session`] pins down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UninfoSessionFlags {
    pub self_id: bool,
    pub adapter: bool,
    pub scope: bool,
    pub scene: bool,
    pub user: bool,
}

impl Default for UninfoSessionFlags {
    fn default() -> Self {
        Self {
            self_id: true,
            adapter: true,
            scope: true,
            scene: true,
            user: true,
        }
    }
}

/// Optional criteria for the normalized generation. Every `None` (or empty list) leaves that
/// dimension unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UninfoFilter {
    /// Bot self ids to include; `None` keeps every bot.
    pub self_ids: Option<Vec<String>>,
    /// Adapter names to include; `None` keeps every adapter.
    pub adapters: Option<Vec<String>>,
    /// Scope values (see `SupportScope::as_str`) to include; `None` keeps every platform.
    pub scopes: Option<Vec<String>>,
    /// Scene types to include; `None` keeps every type.
    pub scene_types: Option<Vec<SceneType>>,
    /// Scene ids to include; `None` keeps every scene.
    pub scene_ids: Option<Vec<String>>,
    /// Sender ids to include; `None` keeps every user.
    pub user_ids: Option<Vec<String>>,
    pub exclude_self_ids: Option<Vec<String>>,
    pub exclude_adapters: Option<Vec<String>>,
    pub exclude_scopes: Option<Vec<String>>,
    pub exclude_scene_types: Option<Vec<SceneType>>,
    pub exclude_scene_ids: Option<Vec<String>>,
    pub exclude_user_ids: Option<Vec<String>>,
    /// Earliest record time, inclusive; `None` means no lower bound.
    pub time_start: Option<DateTime<Utc>>,
    /// Latest record time, inclusive; `None` means no upper bound.
    pub time_stop: Option<DateTime<Utc>>,
    /// Event types to include; `None` keeps received and sent messages.
    pub types: Option<Vec<MessageType>>,
}

impl UninfoFilter {
    /// Restricts to the parts of `session` selected by `flags`.
    pub fn from_session(session: &UninfoSession, flags: UninfoSessionFlags) -> Self {
        let pick = |on: bool, value: &str| on.then(|| vec![value.to_string()]);
        Self {
            self_ids: pick(flags.self_id, &session.self_id),
            adapters: pick(flags.adapter, &session.adapter),
            scopes: pick(flags.scope, session.scope.as_str()),
            scene_ids: pick(flags.scene, &session.scene_id),
            scene_types: flags.scene.then(|| vec![session.scene_type]),
            user_ids: pick(flags.user, &session.user_id),
            ..Self::default()
        }
    }
}

impl FilterSpec for UninfoFilter {
    fn filter_statement(&self) -> PredicateSet {
        let mut predicates = PredicateSet::new();
        predicates.include(columns::BOT_SELF_ID, self.self_ids.as_deref());
        predicates.include(columns::BOT_ADAPTER, self.adapters.as_deref());
        predicates.include(columns::BOT_SCOPE, self.scopes.as_deref());
        predicates.include(columns::SCENE_TYPE, self.scene_types.as_deref());
        predicates.include(columns::SCENE_ID, self.scene_ids.as_deref());
        predicates.include(columns::USER_ID, self.user_ids.as_deref());
        predicates.exclude(columns::BOT_SELF_ID, self.exclude_self_ids.as_deref());
        predicates.exclude(columns::BOT_ADAPTER, self.exclude_adapters.as_deref());
        predicates.exclude(columns::BOT_SCOPE, self.exclude_scopes.as_deref());
        predicates.exclude(columns::SCENE_TYPE, self.exclude_scene_types.as_deref());
        predicates.exclude(columns::SCENE_ID, self.exclude_scene_ids.as_deref());
        predicates.exclude(columns::USER_ID, self.exclude_user_ids.as_deref());
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

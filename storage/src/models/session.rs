//! Conversation metadata a record is linked to, one shape per schema generation.

use cesaa_core::{SceneType, SessionLevel, SupportScope};
use serde::{Deserialize, Serialize};

/// Flat session row: bot identity plus up to three scoped ids.
///
/// Absent ids are stored as empty strings so the row stays unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub bot_id: String,
    pub bot_type: String,
    pub platform: String,
    pub level: SessionLevel,
    pub id1: Option<String>,
    pub id2: Option<String>,
    pub id3: Option<String>,
}

/// Normalized session: one bot, one scene and one user row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UninfoSession {
    pub self_id: String,
    pub adapter: String,
    pub scope: SupportScope,
    pub scene_id: String,
    pub scene_type: SceneType,
    /// Guild (or forum chat) the scene sits under, if any.
    pub parent_scene_id: Option<String>,
    pub user_id: String,
}

use cesaa_core::{DetailType, PlatformTarget, SessionLevel};
use storage::{session_columns, Predicate, PredicateSet, SchemaGeneration, SessionSchema};

use super::{decimal, TargetClassifier};
use crate::error::{Error, Result};

/// Addresses targets by `(platform, level, id1, id2, id3)` in the flat generation.
///
/// `id1` holds the user, `id2` the group or channel and `id3` the guild. QQ openid and Satori
/// targets have no flat session form and are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionClassifier;

#[derive(Debug)]
struct Slots {
    platform: String,
    level: SessionLevel,
    id1: Option<String>,
    id2: Option<String>,
    id3: Option<String>,
}

impl Slots {
    fn new(platform: impl Into<String>, level: SessionLevel) -> Self {
        Self {
            platform: platform.into(),
            level,
            id1: None,
            id2: None,
            id3: None,
        }
    }

    fn id1(mut self, id: impl Into<Option<String>>) -> Self {
        self.id1 = id.into();
        self
    }

    fn id2(mut self, id: impl Into<Option<String>>) -> Self {
        self.id2 = id.into();
        self
    }

    fn id3(mut self, id: impl Into<Option<String>>) -> Self {
        self.id3 = id.into();
        self
    }

    fn into_predicates(self) -> PredicateSet {
        let mut predicates = PredicateSet::new();
        predicates.push(Predicate::eq(session_columns::PLATFORM, self.platform));
        predicates.push(Predicate::eq(session_columns::LEVEL, self.level));
        for (column, id) in [
            (session_columns::ID1, self.id1),
            (session_columns::ID2, self.id2),
            (session_columns::ID3, self.id3),
        ] {
            if let Some(id) = id.filter(|id| !id.is_empty()) {
                predicates.push(Predicate::eq(column, id));
            }
        }
        predicates
    }
}

fn unsupported(target: &PlatformTarget) -> Error {
    Error::UnsupportedTarget {
        generation: SchemaGeneration::Session,
        platform_type: target.platform_type(),
    }
}

fn slots_of(target: &PlatformTarget) -> Result<Slots> {
    use SessionLevel::{Level1, Level2, Level3};

    let slots = match target {
        PlatformTarget::QqPrivate { user_id } => Slots::new("qq", Level1).id1(decimal(*user_id)),
        PlatformTarget::QqGroup { group_id } => Slots::new("qq", Level2).id2(decimal(*group_id)),
        PlatformTarget::QqGuildDirect {
            recipient_id,
            source_guild_id,
        } => Slots::new("qqguild", Level1)
            .id1(decimal(*recipient_id))
            .id3(decimal(*source_guild_id)),
        PlatformTarget::QqGuildChannel { channel_id } => {
            Slots::new("qqguild", Level3).id2(decimal(*channel_id))
        }
        PlatformTarget::KaiheilaPrivate { user_id } => {
            Slots::new("kaiheila", Level1).id1(user_id.clone())
        }
        PlatformTarget::KaiheilaChannel { channel_id } => {
            Slots::new("kaiheila", Level3).id2(channel_id.clone())
        }
        PlatformTarget::FeishuPrivate { open_id } => {
            Slots::new("feishu", Level1).id1(open_id.clone())
        }
        PlatformTarget::FeishuGroup { chat_id } => Slots::new("feishu", Level2).id2(chat_id.clone()),
        PlatformTarget::TelegramCommon { chat_id } => {
            Slots::new("telegram", Level1).id1(decimal(*chat_id))
        }
        PlatformTarget::TelegramForum {
            chat_id,
            message_thread_id,
        } => Slots::new("telegram", Level3)
            .id2(decimal(*message_thread_id))
            .id3(decimal(*chat_id)),
        PlatformTarget::DoDoPrivate {
            island_source_id,
            dodo_source_id,
        } => Slots::new("dodo", Level1)
            .id1(dodo_source_id.clone())
            .id3(island_source_id.clone()),
        PlatformTarget::DoDoChannel { channel_id, .. } => {
            Slots::new("dodo", Level3).id2(channel_id.clone())
        }
        PlatformTarget::DiscordChannel { channel_id } => {
            Slots::new("discord", Level3).id2(channel_id.clone())
        }
        PlatformTarget::Ob12Unknown {
            platform,
            detail_type,
            user_id,
            group_id,
            guild_id,
            channel_id,
        } => match detail_type {
            DetailType::Private => Slots::new(platform.as_str(), Level1).id1(user_id.clone()),
            DetailType::Group => Slots::new(platform.as_str(), Level2).id2(group_id.clone()),
            DetailType::Channel => Slots::new(platform.as_str(), Level3)
                .id2(channel_id.clone())
                .id3(guild_id.clone()),
        },
        PlatformTarget::QqPrivateOpenId { .. }
        | PlatformTarget::QqGroupOpenId { .. }
        | PlatformTarget::SatoriUnknown { .. } => return Err(unsupported(target)),
    };
    Ok(slots)
}

impl TargetClassifier for SessionClassifier {
    type Schema = SessionSchema;

    fn classify(&self, target: &PlatformTarget) -> Result<PredicateSet> {
        slots_of(target).map(Slots::into_predicates)
    }
}

use cesaa_core::{DetailType, PlatformTarget, SceneType, SupportScope};
use storage::{uninfo_columns, Predicate, PredicateSet, UninfoSchema};

use super::{decimal, TargetClassifier};
use crate::error::Result;

/// Addresses targets by bot scope and scene in the normalized generation.
///
/// Every variant is supported here.
#[derive(Debug, Clone, Copy, Default)]
pub struct UninfoClassifier;

/// Where a target lives in the normalized tables.
#[derive(Debug, PartialEq, Eq)]
struct Scene {
    scope: SupportScope,
    scene_id: Option<String>,
    scene_type: SceneType,
    parent_scene_id: Option<String>,
}

impl Scene {
    fn new(scope: SupportScope, scene_id: impl Into<Option<String>>, scene_type: SceneType) -> Self {
        Self {
            scope,
            scene_id: scene_id.into(),
            scene_type,
            parent_scene_id: None,
        }
    }

    fn under(mut self, parent_scene_id: Option<String>) -> Self {
        self.parent_scene_id = parent_scene_id;
        self
    }

    fn into_predicates(self) -> PredicateSet {
        let mut predicates = PredicateSet::new();
        predicates.push(Predicate::eq(uninfo_columns::BOT_SCOPE, self.scope));
        if let Some(scene_id) = self.scene_id.filter(|id| !id.is_empty()) {
            predicates.push(Predicate::eq(uninfo_columns::SCENE_ID, scene_id));
        }
        predicates.push(Predicate::eq(uninfo_columns::SCENE_TYPE, self.scene_type));
        if let Some(parent) = self.parent_scene_id.filter(|id| !id.is_empty()) {
            predicates.push(Predicate::eq(uninfo_columns::SCENE_PARENT_ID, parent));
        }
        predicates
    }
}

fn scene_of(target: &PlatformTarget) -> Scene {
    use SceneType::{ChannelText, Group, Private};

    match target {
        PlatformTarget::QqPrivate { user_id } => {
            Scene::new(SupportScope::QqClient, decimal(*user_id), Private)
        }
        PlatformTarget::QqGroup { group_id } => {
            Scene::new(SupportScope::QqClient, decimal(*group_id), Group)
        }
        PlatformTarget::QqGuildDirect { recipient_id, .. } => {
            Scene::new(SupportScope::QqGuild, decimal(*recipient_id), Private)
        }
        PlatformTarget::QqGuildChannel { channel_id } => {
            Scene::new(SupportScope::QqGuild, decimal(*channel_id), ChannelText)
        }
        PlatformTarget::QqPrivateOpenId { user_openid, .. } => {
            Scene::new(SupportScope::QqApi, user_openid.clone(), Private)
        }
        PlatformTarget::QqGroupOpenId { group_openid, .. } => {
            Scene::new(SupportScope::QqApi, group_openid.clone(), Group)
        }
        PlatformTarget::KaiheilaPrivate { user_id } => {
            Scene::new(SupportScope::Kook, user_id.clone(), Private)
        }
        PlatformTarget::KaiheilaChannel { channel_id } => {
            Scene::new(SupportScope::Kook, channel_id.clone(), ChannelText)
        }
        PlatformTarget::FeishuPrivate { open_id } => {
            Scene::new(SupportScope::Feishu, open_id.clone(), Private)
        }
        PlatformTarget::FeishuGroup { chat_id } => {
            Scene::new(SupportScope::Feishu, chat_id.clone(), Group)
        }
        PlatformTarget::TelegramCommon { chat_id } => {
            Scene::new(SupportScope::Telegram, decimal(*chat_id), Private)
        }
        PlatformTarget::TelegramForum {
            chat_id,
            message_thread_id,
        } => Scene::new(SupportScope::Telegram, decimal(*message_thread_id), ChannelText)
            .under(Some(decimal(*chat_id))),
        PlatformTarget::DoDoPrivate { dodo_source_id, .. } => {
            Scene::new(SupportScope::DoDo, dodo_source_id.clone(), Private)
        }
        PlatformTarget::DoDoChannel { channel_id, .. } => {
            Scene::new(SupportScope::DoDo, channel_id.clone(), ChannelText)
        }
        PlatformTarget::DiscordChannel { channel_id } => {
            Scene::new(SupportScope::Discord, channel_id.clone(), ChannelText)
        }
        PlatformTarget::Ob12Unknown {
            platform,
            detail_type,
            user_id,
            group_id,
            guild_id,
            channel_id,
        } => {
            let scope = SupportScope::ensure_ob12(platform);
            match detail_type {
                DetailType::Private => Scene::new(scope, user_id.clone(), Private),
                DetailType::Group => Scene::new(scope, group_id.clone(), Group),
                DetailType::Channel => {
                    Scene::new(scope, channel_id.clone(), ChannelText).under(guild_id.clone())
                }
            }
        }
        PlatformTarget::SatoriUnknown {
            platform,
            user_id,
            channel_id,
            guild_id,
        } => {
            let scope = SupportScope::ensure_satori(platform);
            match (channel_id, guild_id) {
                (None, _) => Scene::new(scope, user_id.clone(), Private),
                (Some(channel_id), None) => Scene::new(scope, channel_id.clone(), Group),
                (Some(channel_id), Some(guild_id)) => {
                    Scene::new(scope, channel_id.clone(), ChannelText).under(Some(guild_id.clone()))
                }
            }
        }
    }
}

impl TargetClassifier for UninfoClassifier {
    type Schema = UninfoSchema;

    fn classify(&self, target: &PlatformTarget) -> Result<PredicateSet> {
        Ok(scene_of(target).into_predicates())
    }
}

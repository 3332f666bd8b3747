//! Send targets: where a message goes, one variant per platform addressing scheme.
//!
//! The JSON form is internally tagged by `platform_type`, e.g.
//! `{"platform_type": "QQ Group", "group_id": 10000}`.

use serde::{Deserialize, Serialize};

/// Conversation shape carried by a generic OneBot v12 target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailType {
    Private,
    Group,
    Channel,
}

/// Closed set of send targets. Numeric ids keep the wire type of their platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "platform_type")]
pub enum PlatformTarget {
    #[serde(rename = "QQ Private")]
    QqPrivate { user_id: i64 },

    #[serde(rename = "QQ Group")]
    QqGroup { group_id: i64 },

    #[serde(rename = "QQ Guild Direct")]
    QqGuildDirect {
        recipient_id: i64,
        source_guild_id: i64,
    },

    #[serde(rename = "QQ Guild Channel")]
    QqGuildChannel { channel_id: i64 },

    #[serde(rename = "QQ Private OpenId")]
    QqPrivateOpenId { bot_id: String, user_openid: String },

    #[serde(rename = "QQ Group OpenId")]
    QqGroupOpenId { bot_id: String, group_openid: String },

    #[serde(rename = "Kaiheila Private")]
    KaiheilaPrivate { user_id: String },

    #[serde(rename = "Kaiheila Channel")]
    KaiheilaChannel { channel_id: String },

    #[serde(rename = "Feishu Private")]
    FeishuPrivate { open_id: String },

    #[serde(rename = "Feishu Group")]
    FeishuGroup { chat_id: String },

    #[serde(rename = "Telegram Common")]
    TelegramCommon { chat_id: i64 },

    #[serde(rename = "Telegram Forum")]
    TelegramForum { chat_id: i64, message_thread_id: i64 },

    #[serde(rename = "DoDo Private")]
    DoDoPrivate {
        island_source_id: String,
        dodo_source_id: String,
    },

    #[serde(rename = "DoDo Channel")]
    DoDoChannel {
        channel_id: String,
        #[serde(default)]
        dodo_source_id: Option<String>,
    },

    #[serde(rename = "Discord Channel")]
    DiscordChannel { channel_id: String },

    /// Any OneBot v12 implementation; `detail_type` decides which id addresses the scene.
    #[serde(rename = "Unknow Onebot 12 Platform")]
    Ob12Unknown {
        platform: String,
        detail_type: DetailType,
        #[serde(default)]
        user_id: Option<String>,
        #[serde(default)]
        group_id: Option<String>,
        #[serde(default)]
        guild_id: Option<String>,
        #[serde(default)]
        channel_id: Option<String>,
    },

    /// Any Satori platform; the presence of channel and guild ids decides the scene shape.
    #[serde(rename = "Satori Unknown")]
    SatoriUnknown {
        platform: String,
        #[serde(default)]
        user_id: Option<String>,
        #[serde(default)]
        channel_id: Option<String>,
        #[serde(default)]
        guild_id: Option<String>,
    },
}

impl PlatformTarget {
    /// The `platform_type` tag of this variant.
    pub fn platform_type(&self) -> &'static str {
        match self {
            PlatformTarget::QqPrivate { .. } => "QQ Private",
            PlatformTarget::QqGroup { .. } => "QQ Group",
            PlatformTarget::QqGuildDirect { .. } => "QQ Guild Direct",
            PlatformTarget::QqGuildChannel { .. } => "QQ Guild Channel",
            PlatformTarget::QqPrivateOpenId { .. } => "QQ Private OpenId",
            PlatformTarget::QqGroupOpenId { .. } => "QQ Group OpenId",
            PlatformTarget::KaiheilaPrivate { .. } => "Kaiheila Private",
            PlatformTarget::KaiheilaChannel { .. } => "Kaiheila Channel",
            PlatformTarget::FeishuPrivate { .. } => "Feishu Private",
            PlatformTarget::FeishuGroup { .. } => "Feishu Group",
            PlatformTarget::TelegramCommon { .. } => "Telegram Common",
            PlatformTarget::TelegramForum { .. } => "Telegram Forum",
            PlatformTarget::DoDoPrivate { .. } => "DoDo Private",
            PlatformTarget::DoDoChannel { .. } => "DoDo Channel",
            PlatformTarget::DiscordChannel { .. } => "Discord Channel",
            PlatformTarget::Ob12Unknown { .. } => "Unknow Onebot 12 Platform",
            PlatformTarget::SatoriUnknown { .. } => "Satori Unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_tagged_target() {
        let target: PlatformTarget =
            serde_json::from_str(r#"{"platform_type": "QQ Group", "group_id": 10000}"#).unwrap();
        assert_eq!(target, PlatformTarget::QqGroup { group_id: 10000 });
    }

    #[test]
    fn test_deserialize_ob12_with_missing_optionals() {
        let target: PlatformTarget = serde_json::from_str(
            r#"{"platform_type": "Unknow Onebot 12 Platform", "platform": "qq", "detail_type": "private", "user_id": "10"}"#,
        )
        .unwrap();
        assert_eq!(
            target,
            PlatformTarget::Ob12Unknown {
                platform: "qq".to_string(),
                detail_type: DetailType::Private,
                user_id: Some("10".to_string()),
                group_id: None,
                guild_id: None,
                channel_id: None,
            }
        );
    }

    #[test]
    fn test_unknown_platform_type_is_rejected() {
        let result: Result<PlatformTarget, _> =
            serde_json::from_str(r#"{"platform_type": "Matrix Room", "room_id": "!a"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_platform_type_matches_serde_tag() {
        let target = PlatformTarget::TelegramForum {
            chat_id: -100,
            message_thread_id: 7,
        };
        let json = serde_json::to_value(&target).unwrap();
        assert_eq!(json["platform_type"], target.platform_type());
    }
}

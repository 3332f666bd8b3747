//! Platform scopes, scene types and session levels as the recorder stores them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TargetError;

/// Platform/service a scene belongs to. Stored as its string value in the bot table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupportScope {
    #[serde(rename = "QQClient")]
    QqClient,
    #[serde(rename = "QQGuild")]
    QqGuild,
    #[serde(rename = "QQAPI")]
    QqApi,
    Telegram,
    Discord,
    Feishu,
    DingTalk,
    WeChat,
    #[serde(rename = "WeChatOAP")]
    WeChatOap,
    WeCom,
    #[serde(rename = "KOOK")]
    Kook,
    DoDo,
    Minecraft,
    GitHub,
    Console,
    #[serde(rename = "Onebot12")]
    Onebot12Other,
    #[serde(rename = "Satori")]
    SatoriOther,
    Unknown,
}

impl SupportScope {
    pub const ALL: [SupportScope; 18] = [
        SupportScope::QqClient,
        SupportScope::QqGuild,
        SupportScope::QqApi,
        SupportScope::Telegram,
        SupportScope::Discord,
        SupportScope::Feishu,
        SupportScope::DingTalk,
        SupportScope::WeChat,
        SupportScope::WeChatOap,
        SupportScope::WeCom,
        SupportScope::Kook,
        SupportScope::DoDo,
        SupportScope::Minecraft,
        SupportScope::GitHub,
        SupportScope::Console,
        SupportScope::Onebot12Other,
        SupportScope::SatoriOther,
        SupportScope::Unknown,
    ];

    /// Value written to the `scope` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportScope::QqClient => "QQClient",
            SupportScope::QqGuild => "QQGuild",
            SupportScope::QqApi => "QQAPI",
            SupportScope::Telegram => "Telegram",
            SupportScope::Discord => "Discord",
            SupportScope::Feishu => "Feishu",
            SupportScope::DingTalk => "DingTalk",
            SupportScope::WeChat => "WeChat",
            SupportScope::WeChatOap => "WeChatOAP",
            SupportScope::WeCom => "WeCom",
            SupportScope::Kook => "KOOK",
            SupportScope::DoDo => "DoDo",
            SupportScope::Minecraft => "Minecraft",
            SupportScope::GitHub => "GitHub",
            SupportScope::Console => "Console",
            SupportScope::Onebot12Other => "Onebot12",
            SupportScope::SatoriOther => "Satori",
            SupportScope::Unknown => "Unknown",
        }
    }

    /// Resolves the `platform` field of a OneBot v12 implementation to a scope.
    pub fn ensure_ob12(platform: &str) -> Self {
        match platform {
            "qq" => SupportScope::QqClient,
            "qqguild" => SupportScope::QqGuild,
            "discord" => SupportScope::Discord,
            "dingtalk" => SupportScope::DingTalk,
            "feishu" | "lark" => SupportScope::Feishu,
            "kook" | "kaiheila" => SupportScope::Kook,
            "telegram" => SupportScope::Telegram,
            "wechat" => SupportScope::WeChat,
            "dodo" => SupportScope::DoDo,
            "minecraft" => SupportScope::Minecraft,
            "github" => SupportScope::GitHub,
            "console" => SupportScope::Console,
            _ => SupportScope::Onebot12Other,
        }
    }

    /// Resolves the `platform` of a Satori login to a scope.
    pub fn ensure_satori(platform: &str) -> Self {
        match platform {
            "red" | "chronocat" | "onebot" | "lagrange" | "llonebot" => SupportScope::QqClient,
            "qq" => SupportScope::QqApi,
            "qqguild" => SupportScope::QqGuild,
            "discord" => SupportScope::Discord,
            "dingtalk" => SupportScope::DingTalk,
            "feishu" | "lark" => SupportScope::Feishu,
            "kook" => SupportScope::Kook,
            "telegram" => SupportScope::Telegram,
            "wechat-official" => SupportScope::WeChatOap,
            "wecom" => SupportScope::WeCom,
            _ => SupportScope::SatoriOther,
        }
    }
}

impl fmt::Display for SupportScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SupportScope {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SupportScope::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| TargetError::UnknownScope(s.to_string()))
    }
}

impl From<SupportScope> for String {
    fn from(scope: SupportScope) -> Self {
        scope.as_str().to_string()
    }
}

/// Kind of conversation a scene is. Stored as its integer value in the scene table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneType {
    Private,
    Group,
    Guild,
    ChannelCategory,
    ChannelText,
    ChannelVoice,
}

impl SceneType {
    pub fn value(&self) -> i64 {
        match self {
            SceneType::Private => 0,
            SceneType::Group => 1,
            SceneType::Guild => 2,
            SceneType::ChannelCategory => 3,
            SceneType::ChannelText => 4,
            SceneType::ChannelVoice => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SceneType::Private => "private",
            SceneType::Group => "group",
            SceneType::Guild => "guild",
            SceneType::ChannelCategory => "channel_category",
            SceneType::ChannelText => "channel_text",
            SceneType::ChannelVoice => "channel_voice",
        }
    }
}

impl fmt::Display for SceneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SceneType {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(SceneType::Private),
            "group" => Ok(SceneType::Group),
            "guild" => Ok(SceneType::Guild),
            "channel_category" => Ok(SceneType::ChannelCategory),
            "channel_text" => Ok(SceneType::ChannelText),
            "channel_voice" => Ok(SceneType::ChannelVoice),
            other => Err(TargetError::UnknownSceneType(other.to_string())),
        }
    }
}

/// Session level of the flat recorder schema.
///
/// `Level1` is a private chat (`id1` set), `Level2` a group (`id2` set, `id1` is the sender)
/// and `Level3` a guild channel (`id3` guild, `id2` channel, `id1` sender).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionLevel {
    Level0,
    Level1,
    Level2,
    Level3,
}

impl SessionLevel {
    pub fn value(&self) -> i64 {
        match self {
            SessionLevel::Level0 => 0,
            SessionLevel::Level1 => 1,
            SessionLevel::Level2 => 2,
            SessionLevel::Level3 => 3,
        }
    }
}

impl TryFrom<i64> for SessionLevel {
    type Error = TargetError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SessionLevel::Level0),
            1 => Ok(SessionLevel::Level1),
            2 => Ok(SessionLevel::Level2),
            3 => Ok(SessionLevel::Level3),
            other => Err(TargetError::UnknownSessionLevel(other.to_string())),
        }
    }
}

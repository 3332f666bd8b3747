//! Integration tests for [`cesaa::MessageHistory`] over the flat session schema.
//!
//! Fixture: four records in QQ group "10000" and QQ guild channel "100000" (guild "10000"), one
//! sent by the bot and one by user "10" in each.

use std::sync::Arc;

use cesaa::{
    Error, MessageHistory, PlatformTarget, SessionClassifier, SessionFilter, SessionIdType,
    UninfoClassifier,
};
use cesaa_core::SessionLevel;
use chrono::{DateTime, Duration, TimeZone, Utc};
use storage::{
    CodecError, JsonCodec, Message, MessageRepository, MessageType, NewMessageRecord,
    SchemaGeneration, SessionKey, StorageError,
};

fn record_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 1, 2, 4, 0, 0).unwrap()
}

fn session(
    bot_type: &str,
    platform: &str,
    level: SessionLevel,
    id1: &str,
    id2: &str,
    id3: Option<&str>,
) -> SessionKey {
    SessionKey {
        bot_id: "test".to_string(),
        bot_type: bot_type.to_string(),
        platform: platform.to_string(),
        level,
        id1: Some(id1.to_string()),
        id2: Some(id2.to_string()),
        id3: id3.map(str::to_string),
    }
}

fn fixture_sessions() -> Vec<SessionKey> {
    vec![
        session("OneBot V11", "qq", SessionLevel::Level2, "bot", "10000", None),
        session("OneBot V11", "qq", SessionLevel::Level2, "10", "10000", None),
        session(
            "OneBot V12",
            "qqguild",
            SessionLevel::Level3,
            "bot",
            "100000",
            Some("10000"),
        ),
        session(
            "OneBot V12",
            "qqguild",
            SessionLevel::Level3,
            "10",
            "100000",
            Some("10000"),
        ),
    ]
}

async fn seeded_repo() -> MessageRepository {
    let repo = MessageRepository::new("sqlite::memory:", SchemaGeneration::Session)
        .await
        .expect("Failed to create repository");
    let codec = JsonCodec::default();

    let rows = [
        (MessageType::MessageSent, "qq-10000-bot"),
        (MessageType::Message, "qq-10000-10"),
        (MessageType::MessageSent, "qqguild-100000-10000-bot"),
        (MessageType::Message, "qqguild-100000-10000-10"),
    ];
    for (i, (key, (message_type, text))) in fixture_sessions().iter().zip(rows).enumerate() {
        let session_id = repo.add_session(key).await.expect("Failed to add session");
        let message = Message::text(key.bot_type.clone(), text);
        let record = NewMessageRecord::from_message(
            session_id,
            message_type,
            (i + 1).to_string(),
            &message,
            &codec,
        )
        .expect("Failed to encode message")
        .at(record_time());
        repo.save(&record).await.expect("Failed to save record");
    }
    repo
}

async fn history() -> MessageHistory<SessionClassifier> {
    let repo = seeded_repo().await;
    MessageHistory::from_repository(&repo).expect("Failed to create history")
}

/// **Test: Group target selects both the bot's and the user's messages, in order.**
///
/// **Setup:** Seeded session store.
/// **Action:** `get_messages_plain_text_by_target(QQ Group 10000)` with no filter.
/// **Expected:** `["qq-10000-bot", "qq-10000-10"]`.
#[tokio::test]
async fn test_group_target_returns_group_messages() {
    let history = history().await;
    let target = PlatformTarget::QqGroup { group_id: 10000 };

    let texts = history
        .get_messages_plain_text_by_target(&target, &SessionFilter::default())
        .await
        .expect("Failed to query");

    assert_eq!(texts, vec!["qq-10000-bot", "qq-10000-10"]);
}

/// **Test: Restricting event types drops the bot's own messages.**
///
/// **Setup:** Seeded session store.
/// **Action:** Group target with `types = ["message"]`.
/// **Expected:** `["qq-10000-10"]`.
#[tokio::test]
async fn test_group_target_without_sent_messages() {
    let history = history().await;
    let target = PlatformTarget::QqGroup { group_id: 10000 };
    let filter = SessionFilter {
        types: Some(vec![MessageType::Message]),
        ..SessionFilter::default()
    };

    let texts = history
        .get_messages_plain_text_by_target(&target, &filter)
        .await
        .expect("Failed to query");

    assert_eq!(texts, vec!["qq-10000-10"]);
}

/// **Test: Target and explicit id lists narrow independently.**
///
/// **Setup:** Seeded session store.
/// **Action:** Group target with `id1s = ["10"]`, then with `types = ["message"], id1s = ["11"]`.
/// **Expected:** `["qq-10000-10"]`, then `[]`.
#[tokio::test]
async fn test_target_and_id_filters_compose() {
    let history = history().await;
    let target = PlatformTarget::QqGroup { group_id: 10000 };

    let filter = SessionFilter {
        id1s: Some(vec!["10".to_string()]),
        ..SessionFilter::default()
    };
    let texts = history
        .get_messages_plain_text_by_target(&target, &filter)
        .await
        .expect("Failed to query");
    assert_eq!(texts, vec!["qq-10000-10"]);

    let filter = SessionFilter {
        types: Some(vec![MessageType::Message]),
        id1s: Some(vec!["11".to_string()]),
        ..SessionFilter::default()
    };
    let texts = history
        .get_messages_plain_text_by_target(&target, &filter)
        .await
        .expect("Failed to query");
    assert!(texts.is_empty());
}

/// **Test: No target and no filter returns every record in store order.**
///
/// **Setup:** Seeded session store.
/// **Action:** `get_message_records(None, default)`.
/// **Expected:** Four records with message ids 1..=4.
#[tokio::test]
async fn test_no_target_returns_everything() {
    let history = history().await;

    let records = history
        .get_message_records(None, &SessionFilter::default())
        .await
        .expect("Failed to query");

    let ids: Vec<&str> = records.iter().map(|r| r.message_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4"]);
    assert_eq!(records[0].message_type, "message_sent");
    assert_eq!(records[0].time, record_time());
}

/// **Test: Guild channel target, then excluding the bot's messages.**
///
/// **Setup:** Seeded session store.
/// **Action:** QQ Guild Channel 100000 without filter, then with `types = ["message"]`.
/// **Expected:** Both guild texts, then only the user's.
#[tokio::test]
async fn test_guild_channel_target() {
    let history = history().await;
    let target = PlatformTarget::QqGuildChannel { channel_id: 100000 };

    let texts = history
        .get_messages_plain_text(Some(&target), &SessionFilter::default())
        .await
        .expect("Failed to query");
    assert_eq!(
        texts,
        vec!["qqguild-100000-10000-bot", "qqguild-100000-10000-10"]
    );

    let filter = SessionFilter {
        types: Some(vec![MessageType::Message]),
        ..SessionFilter::default()
    };
    let texts = history
        .get_messages_plain_text(Some(&target), &filter)
        .await
        .expect("Failed to query");
    assert_eq!(texts, vec!["qqguild-100000-10000-10"]);
}

/// **Test: Each message is rebuilt with the adapter of its own session.**
///
/// **Setup:** Seeded session store (V11 group, V12 guild).
/// **Action:** `get_messages(None, default)`.
/// **Expected:** Adapters `V11, V11, V12, V12`; text preserved.
#[tokio::test]
async fn test_messages_keep_their_adapter() {
    let history = history().await;

    let messages = history
        .get_messages(None, &SessionFilter::default())
        .await
        .expect("Failed to query");

    let adapters: Vec<&str> = messages.iter().map(Message::adapter).collect();
    assert_eq!(
        adapters,
        vec!["OneBot V11", "OneBot V11", "OneBot V12", "OneBot V12"]
    );
    assert_eq!(
        messages[3],
        Message::text("OneBot V12", "qqguild-100000-10000-10")
    );
}

/// **Test: Message round-trip through a target.**
///
/// **Setup:** Seeded session store.
/// **Action:** `get_messages_by_target(QQ Group 10000)` with `types = ["message"]`.
/// **Expected:** One message whose plain text matches the stored projection.
#[tokio::test]
async fn test_messages_by_target_round_trip() {
    let history = history().await;
    let target = PlatformTarget::QqGroup { group_id: 10000 };
    let filter = SessionFilter {
        types: Some(vec![MessageType::Message]),
        ..SessionFilter::default()
    };

    let messages = history
        .get_messages_by_target(&target, &filter)
        .await
        .expect("Failed to query");

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].extract_plain_text(), "qq-10000-10");
}

/// **Test: Time bounds are inclusive.**
///
/// **Setup:** Seeded session store, all records at the same instant.
/// **Action:** `time_start = time_stop = record time`, then `time_start` one second later.
/// **Expected:** All four records, then none.
#[tokio::test]
async fn test_time_bounds() {
    let history = history().await;

    let filter = SessionFilter {
        time_start: Some(record_time()),
        time_stop: Some(record_time()),
        ..SessionFilter::default()
    };
    let records = history
        .get_message_records(None, &filter)
        .await
        .expect("Failed to query");
    assert_eq!(records.len(), 4);

    let filter = SessionFilter {
        time_start: Some(record_time() + Duration::seconds(1)),
        ..SessionFilter::default()
    };
    let records = history
        .get_message_records(None, &filter)
        .await
        .expect("Failed to query");
    assert!(records.is_empty());
}

/// **Test: A session-scoped filter selects the whole group.**
///
/// **Setup:** Seeded session store.
/// **Action:** `SessionFilter::from_session(user 10 in group 10000, Group)`.
/// **Expected:** Both group records; `GroupUser` keeps only the user's.
#[tokio::test]
async fn test_session_scoped_filter() {
    let history = history().await;
    let key = &fixture_sessions()[1];

    let texts = history
        .get_messages_plain_text(None, &SessionFilter::from_session(key, SessionIdType::Group))
        .await
        .expect("Failed to query");
    assert_eq!(texts, vec!["qq-10000-bot", "qq-10000-10"]);

    let texts = history
        .get_messages_plain_text(
            None,
            &SessionFilter::from_session(key, SessionIdType::GroupUser),
        )
        .await
        .expect("Failed to query");
    assert_eq!(texts, vec!["qq-10000-10"]);
}

/// **Test: Targets without a flat session form are rejected before querying.**
///
/// **Setup:** Seeded session store.
/// **Action:** `get_message_records_by_target(QQ Group OpenId)`.
/// **Expected:** `Error::UnsupportedTarget` naming the session generation.
#[tokio::test]
async fn test_unsupported_target() {
    let history = history().await;
    let target = PlatformTarget::QqGroupOpenId {
        bot_id: "bot".to_string(),
        group_openid: "abc".to_string(),
    };

    let err = history
        .get_message_records_by_target(&target, &SessionFilter::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::UnsupportedTarget {
            generation: SchemaGeneration::Session,
            platform_type: "QQ Group OpenId",
        }
    ));
}

/// **Test: An adapter the codec does not know fails the whole call.**
///
/// **Setup:** Seeded session store; codec that only knows "OneBot V11".
/// **Action:** `get_messages(None, default)`.
/// **Expected:** `Error::Codec(UnknownAdapter("OneBot V12"))`; the V11-only group still works.
#[tokio::test]
async fn test_unknown_adapter_fails_messages() {
    let history = history()
        .await
        .with_codec(Arc::new(JsonCodec::new(["OneBot V11"])));

    let err = history
        .get_messages(None, &SessionFilter::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Codec(CodecError::UnknownAdapter(ref adapter)) if adapter == "OneBot V12"
    ));

    let messages = history
        .get_messages_by_target(
            &PlatformTarget::QqGroup { group_id: 10000 },
            &SessionFilter::default(),
        )
        .await
        .expect("Failed to query");
    assert_eq!(messages.len(), 2);
}

/// **Test: History refuses a store of the other generation.**
///
/// **Setup:** Session-generation repository.
/// **Action:** `MessageHistory::<UninfoClassifier>::from_repository`.
/// **Expected:** Generation mismatch error.
#[tokio::test]
async fn test_history_generation_must_match_store() {
    let repo = seeded_repo().await;

    let err = MessageHistory::<UninfoClassifier>::from_repository(&repo).unwrap_err();

    assert!(matches!(
        err,
        Error::Storage(StorageError::GenerationMismatch {
            expected: SchemaGeneration::Uninfo,
            actual: SchemaGeneration::Session,
        })
    ));
}

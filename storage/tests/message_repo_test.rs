//! Integration tests for [`storage::MessageRepository`].
//!
//! Covers saving records, reading them back as [`storage::MessageRecord`] and reopening a file database.

use chrono::{TimeZone, Utc};
use cesaa_core::SessionLevel;
use storage::{
    JsonCodec, Message, MessageCodec, MessageRecord, MessageRepository, MessageType,
    NewMessageRecord, SchemaGeneration, SessionKey,
};
use tempfile::TempDir;

fn private_session(user_id: &str) -> SessionKey {
    SessionKey {
        bot_id: "test".to_string(),
        bot_type: "OneBot V11".to_string(),
        platform: "qq".to_string(),
        level: SessionLevel::Level1,
        id1: Some(user_id.to_string()),
        id2: None,
        id3: None,
    }
}

async fn all_records(repo: &MessageRepository) -> Vec<MessageRecord> {
    sqlx::query_as::<_, MessageRecord>("SELECT * FROM message_record ORDER BY id")
        .fetch_all(repo.pool_manager().pool())
        .await
        .expect("Failed to load records")
}

/// **Test: A saved record reads back with its payload, type and time.**
///
/// **Setup:** In-memory DB (session generation); one private session.
/// **Action:** Build a record from a text message with the default codec and `save` it.
/// **Expected:** One row with the serialized payload, `plain_text` = message text, `type` = `message`.
#[tokio::test]
async fn test_save_and_read_back_record() {
    let repo = MessageRepository::new("sqlite::memory:", SchemaGeneration::Session)
        .await
        .expect("Failed to create repository");
    let codec = JsonCodec::default();

    let session_id = repo
        .add_session(&private_session("10"))
        .await
        .expect("Failed to add session");
    let time = Utc.with_ymd_and_hms(2022, 1, 1, 12, 0, 0).unwrap();
    let message = Message::text("OneBot V11", "Hello World");
    let record =
        NewMessageRecord::from_message(session_id, MessageType::Message, "1", &message, &codec)
            .expect("Failed to encode message")
            .at(time);

    let id = repo.save(&record).await.expect("Failed to save record");

    let records = all_records(&repo).await;
    assert_eq!(records.len(), 1);
    let stored = &records[0];
    assert_eq!(stored.id, id);
    assert_eq!(stored.session_persist_id, session_id);
    assert_eq!(stored.time, time);
    assert_eq!(stored.message_type, "message");
    assert_eq!(stored.plain_text, "Hello World");
    assert_eq!(
        codec
            .deserialize("OneBot V11", &stored.message)
            .expect("Failed to decode payload"),
        message
    );
}

/// **Test: Record ids follow insertion order.**
///
/// **Setup:** In-memory DB; two sessions.
/// **Action:** Save three records alternating sessions.
/// **Expected:** Returned ids are strictly increasing.
#[tokio::test]
async fn test_record_ids_increase() {
    let repo = MessageRepository::new("sqlite::memory:", SchemaGeneration::Session)
        .await
        .expect("Failed to create repository");
    let codec = JsonCodec::default();
    let a = repo
        .add_session(&private_session("10"))
        .await
        .expect("Failed to add session");
    let b = repo
        .add_session(&private_session("11"))
        .await
        .expect("Failed to add session");

    let mut ids = Vec::new();
    for (i, session_id) in [a, b, a].into_iter().enumerate() {
        let message = Message::text("OneBot V11", format!("message {}", i));
        let record = NewMessageRecord::from_message(
            session_id,
            MessageType::MessageSent,
            i.to_string(),
            &message,
            &codec,
        )
        .expect("Failed to encode message");
        ids.push(repo.save(&record).await.expect("Failed to save record"));
    }

    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(all_records(&repo).await.len(), 3);
}

/// **Test: A file database keeps its records across reopen.**
///
/// **Setup:** Temp dir DB file; save one record, drop the repository.
/// **Action:** Reopen the same path with `MessageRepository::new`.
/// **Expected:** Tables are not recreated and the record is still there.
#[tokio::test]
async fn test_file_database_survives_reopen() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("chatrecorder.db");
    let url = path.to_string_lossy().into_owned();
    let codec = JsonCodec::default();

    {
        let repo = MessageRepository::new(&url, SchemaGeneration::Session)
            .await
            .expect("Failed to create repository");
        let session_id = repo
            .add_session(&private_session("10"))
            .await
            .expect("Failed to add session");
        let record = NewMessageRecord::from_message(
            session_id,
            MessageType::Message,
            "1",
            &Message::text("OneBot V11", "persisted"),
            &codec,
        )
        .expect("Failed to encode message");
        repo.save(&record).await.expect("Failed to save record");
    }

    let repo = MessageRepository::new(&url, SchemaGeneration::Session)
        .await
        .expect("Failed to reopen repository");
    let records = all_records(&repo).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].plain_text, "persisted");
}

/// **Test: Unknown adapters cannot be recorded.**
///
/// **Setup:** Default codec.
/// **Action:** `NewMessageRecord::from_message` with adapter "Fax".
/// **Expected:** Codec error, nothing to save.
#[test]
fn test_record_from_unknown_adapter_fails() {
    let codec = JsonCodec::default();
    let result = NewMessageRecord::from_message(
        1,
        MessageType::Message,
        "1",
        &Message::text("Fax", "hi"),
        &codec,
    );
    assert!(result.is_err());
}

//! Message repository: the recorder side of the store.
//!
//! Creates the tables of one schema generation, registers sessions and appends message records.
//! Reading records back is the history crate's job; this type only hands out its pool.

use tracing::{info, instrument};

use crate::error::StorageError;
use crate::models::{NewMessageRecord, SessionKey, UninfoSession};
use crate::schema::{SchemaGeneration, MESSAGE_RECORD_DDL};
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone, Debug)]
pub struct MessageRepository {
    pool_manager: SqlitePoolManager,
    generation: SchemaGeneration,
}

impl MessageRepository {
    pub async fn new(
        database_url: &str,
        generation: SchemaGeneration,
    ) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let repo = Self {
            pool_manager,
            generation,
        };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!(generation = %self.generation, "Creating database tables if not exist");

        let pool = self.pool_manager.pool();
        for statement in MESSAGE_RECORD_DDL.iter().chain(self.generation.ddl()) {
            sqlx::query(statement).execute(pool).await?;
        }

        info!("Database tables created successfully");
        Ok(())
    }

    pub fn pool_manager(&self) -> &SqlitePoolManager {
        &self.pool_manager
    }

    pub fn generation(&self) -> SchemaGeneration {
        self.generation
    }

    fn expect_generation(&self, expected: SchemaGeneration) -> Result<(), StorageError> {
        if self.generation == expected {
            Ok(())
        } else {
            Err(StorageError::GenerationMismatch {
                expected,
                actual: self.generation,
            })
        }
    }

    /// Returns the persist id of a flat session, inserting it on first sight.
    #[instrument(skip(self, session), fields(platform = %session.platform))]
    pub async fn add_session(&self, session: &SessionKey) -> Result<i64, StorageError> {
        self.expect_generation(SchemaGeneration::Session)?;
        let pool = self.pool_manager.pool();

        let id1 = session.id1.as_deref().unwrap_or_default();
        let id2 = session.id2.as_deref().unwrap_or_default();
        let id3 = session.id3.as_deref().unwrap_or_default();

        sqlx::query(
            r#"
            INSERT INTO session_model (bot_id, bot_type, platform, level, id1, id2, id3)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(&session.bot_id)
        .bind(&session.bot_type)
        .bind(&session.platform)
        .bind(session.level.value())
        .bind(id1)
        .bind(id2)
        .bind(id3)
        .execute(pool)
        .await?;

        let (id,): (i64,) = sqlx::query_as(
            r#"
            SELECT id FROM session_model
            WHERE bot_id = ? AND bot_type = ? AND platform = ? AND level = ?
              AND id1 = ? AND id2 = ? AND id3 = ?
            "#,
        )
        .bind(&session.bot_id)
        .bind(&session.bot_type)
        .bind(&session.platform)
        .bind(session.level.value())
        .bind(id1)
        .bind(id2)
        .bind(id3)
        .fetch_one(pool)
        .await?;

        Ok(id)
    }

    /// Returns the persist id of a normalized session, inserting its bot, scene and user rows
    /// as needed.
    #[instrument(skip(self, session), fields(scope = %session.scope, scene_id = %session.scene_id))]
    pub async fn add_uninfo_session(&self, session: &UninfoSession) -> Result<i64, StorageError> {
        self.expect_generation(SchemaGeneration::Uninfo)?;
        let mut tx = self.pool_manager.pool().begin().await?;

        sqlx::query(
            "INSERT INTO uninfo_bot (self_id, adapter, scope) VALUES (?, ?, ?) ON CONFLICT DO NOTHING",
        )
        .bind(&session.self_id)
        .bind(&session.adapter)
        .bind(session.scope.as_str())
        .execute(&mut *tx)
        .await?;
        let (bot_id,): (i64,) =
            sqlx::query_as("SELECT id FROM uninfo_bot WHERE self_id = ? AND adapter = ? AND scope = ?")
                .bind(&session.self_id)
                .bind(&session.adapter)
                .bind(session.scope.as_str())
                .fetch_one(&mut *tx)
                .await?;

        let parent_scene_id = session.parent_scene_id.as_deref().unwrap_or_default();
        sqlx::query(
            r#"
            INSERT INTO uninfo_scene (bot_persist_id, parent_scene_id, scene_id, scene_type)
            VALUES (?, ?, ?, ?)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(bot_id)
        .bind(parent_scene_id)
        .bind(&session.scene_id)
        .bind(session.scene_type.value())
        .execute(&mut *tx)
        .await?;
        let (scene_id,): (i64,) = sqlx::query_as(
            r#"
            SELECT id FROM uninfo_scene
            WHERE bot_persist_id = ? AND parent_scene_id = ? AND scene_id = ? AND scene_type = ?
            "#,
        )
        .bind(bot_id)
        .bind(parent_scene_id)
        .bind(&session.scene_id)
        .bind(session.scene_type.value())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO uninfo_user (user_id) VALUES (?) ON CONFLICT DO NOTHING")
            .bind(&session.user_id)
            .execute(&mut *tx)
            .await?;
        let (user_id,): (i64,) = sqlx::query_as("SELECT id FROM uninfo_user WHERE user_id = ?")
            .bind(&session.user_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO uninfo_session (bot_persist_id, scene_persist_id, user_persist_id)
            VALUES (?, ?, ?)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(bot_id)
        .bind(scene_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
        let (id,): (i64,) = sqlx::query_as(
            r#"
            SELECT id FROM uninfo_session
            WHERE bot_persist_id = ? AND scene_persist_id = ? AND user_persist_id = ?
            "#,
        )
        .bind(bot_id)
        .bind(scene_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(id)
    }

    /// Appends a record and returns its id.
    pub async fn save(&self, record: &NewMessageRecord) -> Result<i64, StorageError> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query(
            r#"
            INSERT INTO message_record (session_persist_id, time, type, message_id, message, plain_text)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.session_persist_id)
        .bind(record.time)
        .bind(record.message_type.as_str())
        .bind(&record.message_id)
        .bind(&record.message)
        .bind(&record.plain_text)
        .execute(pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(
            id,
            session_persist_id = record.session_persist_id,
            message_type = %record.message_type,
            plain_text = %record.plain_text,
            "Saved message record"
        );
        Ok(id)
    }
}

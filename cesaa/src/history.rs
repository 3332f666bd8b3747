//! Message history queries addressed by send target.
//!
//! A query is the caller's filter predicates ANDed with the target's predicates, run once over
//! the generation's record source. Results come back in insertion order.

use std::fmt;
use std::sync::Arc;

use cesaa_core::PlatformTarget;
use sqlx::{QueryBuilder, Sqlite};
use storage::{
    FilterSpec, JsonCodec, Message, MessageCodec, MessageRecord, MessageRepository, PredicateSet,
    RecordSchema, SqlitePoolManager, StorageError,
};
use tracing::{debug, instrument};

use crate::classifier::{FilterOf, TargetClassifier};
use crate::error::Result;

/// What a query selects from each matching record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Projection {
    Records,
    Messages,
    PlainText,
}

/// Read side of the recorder for one schema generation, chosen by the classifier type.
#[derive(Clone)]
pub struct MessageHistory<C: TargetClassifier> {
    pool_manager: SqlitePoolManager,
    classifier: C,
    codec: Arc<dyn MessageCodec>,
}

impl<C: TargetClassifier> fmt::Debug for MessageHistory<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageHistory")
            .field("generation", &C::Schema::GENERATION)
            .finish_non_exhaustive()
    }
}

impl<C: TargetClassifier> MessageHistory<C> {
    /// Uses [`JsonCodec`] with the default adapter set for [`Self::get_messages`].
    pub fn new(pool_manager: SqlitePoolManager, classifier: C) -> Self {
        Self {
            pool_manager,
            classifier,
            codec: Arc::new(JsonCodec::default()),
        }
    }

    /// Reads from an existing store without creating any table. The generation found on disk
    /// must be this classifier's; a store holding only the other generation's tables is a
    /// mismatch. A store with neither is not checked here and fails on the first query.
    #[instrument(skip(pool_manager, classifier))]
    pub async fn open(pool_manager: SqlitePoolManager, classifier: C) -> Result<Self> {
        let expected = C::Schema::GENERATION;
        let pool = pool_manager.pool();
        if !expected.is_present(pool).await? && expected.other().is_present(pool).await? {
            return Err(StorageError::GenerationMismatch {
                expected,
                actual: expected.other(),
            }
            .into());
        }
        debug!(generation = %expected, "Opened message history");
        Ok(Self::new(pool_manager, classifier))
    }

    /// Reads from the store behind `repo`, which must have been created for this classifier's
    /// generation in the same process.
    pub fn from_repository(repo: &MessageRepository) -> Result<Self>
    where
        C: Default,
    {
        let expected = C::Schema::GENERATION;
        if repo.generation() != expected {
            return Err(StorageError::GenerationMismatch {
                expected,
                actual: repo.generation(),
            }
            .into());
        }
        Ok(Self::new(repo.pool_manager().clone(), C::default()))
    }

    pub fn with_codec(mut self, codec: Arc<dyn MessageCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Filter predicates first, then the target's.
    fn where_clause(
        &self,
        target: Option<&PlatformTarget>,
        filter: &FilterOf<C>,
    ) -> Result<PredicateSet> {
        let mut predicates = filter.filter_statement();
        if let Some(target) = target {
            predicates.extend(self.classifier.classify(target)?);
        }
        Ok(predicates)
    }

    fn select(projection: Projection, predicates: &PredicateSet) -> QueryBuilder<'static, Sqlite> {
        let columns = match projection {
            Projection::Records => "message_record.*".to_string(),
            Projection::Messages => format!(
                "{} AS adapter, message_record.message",
                C::Schema::ADAPTER_COLUMN
            ),
            Projection::PlainText => "message_record.plain_text".to_string(),
        };
        let mut query = QueryBuilder::new(format!(
            "SELECT {} FROM {}",
            columns,
            C::Schema::RECORD_SOURCE
        ));
        predicates.push_where(&mut query);
        query.push(" ORDER BY message_record.id");
        query
    }

    /// Records matching `filter` and, if given, addressed to `target`.
    #[instrument(skip(self, filter))]
    pub async fn get_message_records(
        &self,
        target: Option<&PlatformTarget>,
        filter: &FilterOf<C>,
    ) -> Result<Vec<MessageRecord>> {
        let predicates = self.where_clause(target, filter)?;
        let mut query = Self::select(Projection::Records, &predicates);
        debug!(sql = %query.sql(), predicates = predicates.len(), "Querying message records");

        let mut conn = self.pool_manager.acquire().await?;
        let records = query
            .build_query_as::<MessageRecord>()
            .fetch_all(&mut *conn)
            .await?;

        debug!(count = records.len(), "Retrieved message records");
        Ok(records)
    }

    /// Like [`Self::get_message_records`] but rebuilds each payload with the adapter it was
    /// recorded from. Any undecodable row fails the whole call.
    #[instrument(skip(self, filter))]
    pub async fn get_messages(
        &self,
        target: Option<&PlatformTarget>,
        filter: &FilterOf<C>,
    ) -> Result<Vec<Message>> {
        let predicates = self.where_clause(target, filter)?;
        let mut query = Self::select(Projection::Messages, &predicates);
        debug!(sql = %query.sql(), predicates = predicates.len(), "Querying messages");

        let mut conn = self.pool_manager.acquire().await?;
        let rows = query
            .build_query_as::<(String, String)>()
            .fetch_all(&mut *conn)
            .await?;
        drop(conn);

        let messages = rows
            .iter()
            .map(|(adapter, raw)| self.codec.deserialize(adapter, raw))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(count = messages.len(), "Retrieved messages");
        Ok(messages)
    }

    /// Plain-text projection of the matching records.
    #[instrument(skip(self, filter))]
    pub async fn get_messages_plain_text(
        &self,
        target: Option<&PlatformTarget>,
        filter: &FilterOf<C>,
    ) -> Result<Vec<String>> {
        let predicates = self.where_clause(target, filter)?;
        let mut query = Self::select(Projection::PlainText, &predicates);
        debug!(sql = %query.sql(), predicates = predicates.len(), "Querying plain text");

        let mut conn = self.pool_manager.acquire().await?;
        let texts = query
            .build_query_scalar::<String>()
            .fetch_all(&mut *conn)
            .await?;

        debug!(count = texts.len(), "Retrieved plain text");
        Ok(texts)
    }

    pub async fn get_message_records_by_target(
        &self,
        target: &PlatformTarget,
        filter: &FilterOf<C>,
    ) -> Result<Vec<MessageRecord>> {
        self.get_message_records(Some(target), filter).await
    }

    pub async fn get_messages_by_target(
        &self,
        target: &PlatformTarget,
        filter: &FilterOf<C>,
    ) -> Result<Vec<Message>> {
        self.get_messages(Some(target), filter).await
    }

    pub async fn get_messages_plain_text_by_target(
        &self,
        target: &PlatformTarget,
        filter: &FilterOf<C>,
    ) -> Result<Vec<String>> {
        self.get_messages_plain_text(Some(target), filter).await
    }
}

//! # Replay Coordinator
//!
//! Moves a dead letter back onto the input channel at most once.
//!
//! The entry is taken out of the store in a single write before anything is
//! published, so two concurrent `reprocess` calls for the same id can never
//! both publish: the loser observes `NotFound`. If the publish itself fails
//! the entry is put back and the error is returned to the caller, unless the
//! store was cleared while the publish was in flight.

use std::sync::Arc;

use uuid::Uuid;

use crate::constants::operations;
use crate::error::DlqResult;
use crate::log_dead_letter;
use crate::messaging::MessagePublisher;
use crate::metrics::ClassificationCounters;
use crate::models::DeadLetterEntry;
use crate::store::DeadLetterStore;

#[derive(Debug, Clone, PartialEq)]
pub enum ReplayOutcome {
    /// Published to the input channel and removed from the store
    Replayed(DeadLetterEntry),
    /// Unknown id, or already replayed or cleared
    NotFound,
}

impl ReplayOutcome {
    pub fn is_replayed(&self) -> bool {
        matches!(self, ReplayOutcome::Replayed(_))
    }
}

pub struct ReplayCoordinator {
    store: Arc<DeadLetterStore>,
    publisher: Arc<dyn MessagePublisher>,
    input_channel: String,
    counters: Arc<ClassificationCounters>,
}

impl std::fmt::Debug for ReplayCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplayCoordinator")
            .field("input_channel", &self.input_channel)
            .field("provider", &self.publisher.provider_name())
            .finish()
    }
}

impl ReplayCoordinator {
    pub fn new(
        store: Arc<DeadLetterStore>,
        publisher: Arc<dyn MessagePublisher>,
        input_channel: impl Into<String>,
        counters: Arc<ClassificationCounters>,
    ) -> Self {
        Self {
            store,
            publisher,
            input_channel: input_channel.into(),
            counters,
        }
    }

    pub fn input_channel(&self) -> &str {
        &self.input_channel
    }

    /// Republish the entry's original payload and drop it from the store
    ///
    /// # Errors
    ///
    /// Returns `DlqError::Messaging` when the transport refuses the publish.
    /// The entry goes back into the store in that case and may be replayed
    /// again, unless a `clear` ran while the publish was in flight.
    pub async fn reprocess(&self, id: Uuid) -> DlqResult<ReplayOutcome> {
        let Some(taken) = self.store.take_for_replay(id) else {
            log_dead_letter!(info, operations::REPLAY_NOT_FOUND, id: id);
            return Ok(ReplayOutcome::NotFound);
        };

        if let Err(e) = self
            .publisher
            .publish(&self.input_channel, &taken.entry.original_message)
            .await
        {
            self.counters.record_publish_failure(&self.input_channel);
            log_dead_letter!(
                error,
                operations::REPLAY_PUBLISH_FAILED,
                id: id,
                channel: &self.input_channel,
                error: e.to_string()
            );
            if !self.store.restore(taken) {
                log_dead_letter!(warn, operations::REPLAY_RESTORE_SKIPPED, id: id);
            }
            return Err(e.into());
        }

        let entry = taken.entry;
        self.counters.record_replayed();
        log_dead_letter!(
            info,
            operations::REPLAYED,
            id: id,
            channel: &self.input_channel,
            category: entry.category.as_str()
        );

        Ok(ReplayOutcome::Replayed(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DlqError;
    use crate::messaging::{InMemoryBroker, MessagingError, MessagingResult};
    use crate::models::FailureCategory;
    use async_trait::async_trait;

    /// Clears the store mid-publish, then refuses the message
    struct ClearingPublisher {
        store: Arc<DeadLetterStore>,
    }

    #[async_trait]
    impl MessagePublisher for ClearingPublisher {
        async fn publish(&self, _channel: &str, _payload: &str) -> MessagingResult<()> {
            self.store.clear();
            Err(MessagingError::unavailable("clearing", "offline"))
        }

        fn provider_name(&self) -> &'static str {
            "clearing"
        }
    }

    fn setup() -> (ReplayCoordinator, Arc<DeadLetterStore>, Arc<InMemoryBroker>) {
        let store = Arc::new(DeadLetterStore::new());
        let broker = Arc::new(InMemoryBroker::with_channels(8, &["input-topic"]));
        let coordinator = ReplayCoordinator::new(
            store.clone(),
            broker.clone(),
            "input-topic",
            Arc::new(ClassificationCounters::new()),
        );
        (coordinator, store, broker)
    }

    #[tokio::test]
    async fn test_replay_publishes_once_and_removes() {
        let (coordinator, store, broker) = setup();
        let mut input = broker.subscribe("input-topic").unwrap();
        let entry = DeadLetterEntry::new("r", "{\"orderId\":\"o1\"}", FailureCategory::ValidationError);
        let id = entry.id;
        store.add(entry);

        let outcome = coordinator.reprocess(id).await.unwrap();

        assert!(outcome.is_replayed());
        assert_eq!(input.recv().await.unwrap(), "{\"orderId\":\"o1\"}");
        assert_eq!(broker.published_count("input-topic"), 1);
        assert!(store.find_by_id(id).is_none());

        assert_eq!(coordinator.reprocess(id).await.unwrap(), ReplayOutcome::NotFound);
        assert_eq!(broker.published_count("input-topic"), 1);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let (coordinator, _store, broker) = setup();
        let outcome = coordinator.reprocess(Uuid::new_v4()).await.unwrap();

        assert_eq!(outcome, ReplayOutcome::NotFound);
        assert_eq!(broker.published_count("input-topic"), 0);
    }

    #[tokio::test]
    async fn test_publish_failure_keeps_entry() {
        let (coordinator, store, broker) = setup();
        let entry = DeadLetterEntry::new("r", "m", FailureCategory::MalformedError);
        let id = entry.id;
        store.add(entry);
        broker.set_available(false);

        let result = coordinator.reprocess(id).await;

        assert!(matches!(result, Err(DlqError::Messaging(_))));
        assert!(store.find_by_id(id).is_some());

        broker.set_available(true);
        assert!(coordinator.reprocess(id).await.unwrap().is_replayed());
    }

    #[tokio::test]
    async fn test_failed_replay_does_not_undo_a_clear() {
        let store = Arc::new(DeadLetterStore::new());
        let coordinator = ReplayCoordinator::new(
            store.clone(),
            Arc::new(ClearingPublisher {
                store: store.clone(),
            }),
            "input-topic",
            Arc::new(ClassificationCounters::new()),
        );
        let entry = DeadLetterEntry::new("r", "m", FailureCategory::ValidationError);
        let id = entry.id;
        store.add(entry);

        let result = coordinator.reprocess(id).await;

        assert!(matches!(result, Err(DlqError::Messaging(_))));
        assert!(store.is_empty());
        assert_eq!(coordinator.reprocess(id).await.unwrap(), ReplayOutcome::NotFound);
    }
}

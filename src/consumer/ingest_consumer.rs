//! # Ingest Consumer
//!
//! Handles every delivery on the input channel: decode, validate, then
//! either record the order or wrap it in an envelope and publish it to the
//! dead-letter channel. Classification failures never escape this handler.

use std::sync::Arc;

use async_trait::async_trait;

use crate::constants::{operations, reasons};
use crate::log_ingest;
use crate::messaging::{envelope, MessageHandler, MessagePublisher};
use crate::metrics::ClassificationCounters;
use crate::models::{FailureCategory, ValidMessage};
use crate::store::ValidMessageStore;
use crate::validation::{OrderValidator, Rejection};

/// What happened to a single inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    Accepted,
    DeadLettered { category: FailureCategory },
    /// The envelope could not be published; the message is lost
    DeadLetterPublishFailed { category: FailureCategory },
}

pub struct IngestConsumer {
    validator: OrderValidator,
    valid_store: Arc<ValidMessageStore>,
    publisher: Arc<dyn MessagePublisher>,
    dead_letter_channel: String,
    counters: Arc<ClassificationCounters>,
}

impl std::fmt::Debug for IngestConsumer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestConsumer")
            .field("dead_letter_channel", &self.dead_letter_channel)
            .field("provider", &self.publisher.provider_name())
            .finish()
    }
}

impl IngestConsumer {
    pub fn new(
        valid_store: Arc<ValidMessageStore>,
        publisher: Arc<dyn MessagePublisher>,
        dead_letter_channel: impl Into<String>,
        counters: Arc<ClassificationCounters>,
    ) -> Self {
        Self {
            validator: OrderValidator::new(),
            valid_store,
            publisher,
            dead_letter_channel: dead_letter_channel.into(),
            counters,
        }
    }

    pub async fn process(&self, raw: &str) -> IngestOutcome {
        self.counters.record_processed();
        log_ingest!(debug, operations::MESSAGE_RECEIVED, size: raw.len());

        match self.validator.classify(raw) {
            Ok(order) => match ValidMessage::from_order(&order, raw) {
                Some(message) => {
                    log_ingest!(
                        info,
                        operations::MESSAGE_ACCEPTED,
                        order_id: &message.order_id,
                        user_id: &message.user_id,
                        amount: message.amount
                    );
                    self.valid_store.add(message);
                    self.counters.record_valid();
                    IngestOutcome::Accepted
                }
                // classify only accepts orders with every required field
                None => {
                    let reason = format!("{}incomplete order", reasons::VALIDATION_ERROR_PREFIX);
                    self.reject(raw, Rejection::validation(reason)).await
                }
            },
            Err(rejection) => self.reject(raw, rejection).await,
        }
    }

    async fn reject(&self, raw: &str, rejection: Rejection) -> IngestOutcome {
        let Rejection { reason, category } = rejection;
        self.counters.record_rejected(category);

        log_ingest!(
            warn,
            operations::MESSAGE_REJECTED,
            category: category.as_str(),
            reason: &reason
        );

        let payload = envelope::encode(&reason, raw, category);
        match self
            .publisher
            .publish(&self.dead_letter_channel, &payload)
            .await
        {
            Ok(()) => {
                log_ingest!(
                    debug,
                    operations::DEAD_LETTER_PUBLISHED,
                    channel: &self.dead_letter_channel,
                    category: category.as_str()
                );
                IngestOutcome::DeadLettered { category }
            }
            Err(e) => {
                self.counters.record_publish_failure(&self.dead_letter_channel);
                log_ingest!(
                    error,
                    operations::DEAD_LETTER_PUBLISH_FAILED,
                    channel: &self.dead_letter_channel,
                    provider: self.publisher.provider_name(),
                    error: e.to_string(),
                    original_message: raw
                );
                IngestOutcome::DeadLetterPublishFailed { category }
            }
        }
    }
}

#[async_trait]
impl MessageHandler for IngestConsumer {
    async fn handle(&self, payload: String) {
        self.process(&payload).await;
    }
}

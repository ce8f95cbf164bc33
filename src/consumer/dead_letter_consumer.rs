//! # Dead-Letter Consumer
//!
//! Records every delivery on the dead-letter channel. Decoding never fails,
//! so even an unreadable envelope becomes an entry.

use std::sync::Arc;

use async_trait::async_trait;

use crate::constants::operations;
use crate::log_dead_letter;
use crate::messaging::{envelope, MessageHandler};
use crate::models::DeadLetterEntry;
use crate::store::DeadLetterStore;

#[derive(Debug)]
pub struct DeadLetterConsumer {
    store: Arc<DeadLetterStore>,
}

impl DeadLetterConsumer {
    pub fn new(store: Arc<DeadLetterStore>) -> Self {
        Self { store }
    }

    /// Decode and store a raw dead-letter payload, returning the new entry
    pub fn record(&self, raw: &str) -> DeadLetterEntry {
        let entry = DeadLetterEntry::from_envelope(envelope::decode(raw));

        log_dead_letter!(
            error,
            operations::DEAD_LETTER_RECEIVED,
            id: entry.id,
            category: entry.category.display_name(),
            reason: &entry.reason,
            original_message: &entry.original_message
        );

        self.store.add(entry.clone());
        entry
    }
}

#[async_trait]
impl MessageHandler for DeadLetterConsumer {
    async fn handle(&self, payload: String) {
        self.record(&payload);
    }
}

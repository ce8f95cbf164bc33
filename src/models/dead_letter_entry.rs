use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::FailureCategory;
use crate::messaging::envelope::DecodedEnvelope;

/// A dead-lettered message as held by the dead-letter store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadLetterEntry {
    /// Generated on receipt; stable for the entry's lifetime
    pub id: Uuid,
    pub reason: String,
    /// Raw payload exactly as it arrived on the input channel
    pub original_message: String,
    pub category: FailureCategory,
    pub received_at: DateTime<Utc>,
}

impl DeadLetterEntry {
    pub fn new(
        reason: impl Into<String>,
        original_message: impl Into<String>,
        category: FailureCategory,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            reason: reason.into(),
            original_message: original_message.into(),
            category,
            received_at: Utc::now(),
        }
    }

    pub fn from_envelope(envelope: DecodedEnvelope) -> Self {
        Self::new(envelope.reason, envelope.original_message, envelope.category)
    }
}

//! # Pipeline Constants
//!
//! Channel defaults, store bounds and the fixed reason strings that make up
//! the dead-letter wire contract. Other services match on these reasons, so
//! they must not drift.

use std::time::Duration;

/// Default channel names
pub mod channels {
    pub const DEFAULT_INPUT_CHANNEL: &str = "input-topic";
    pub const DEFAULT_DEAD_LETTER_CHANNEL: &str = "dlq-topic";
    pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;
}

/// Store bounds
pub mod stores {
    /// Maximum number of accepted messages kept for display
    pub const VALID_MESSAGE_CAPACITY: usize = 200;
}

/// Reason strings produced by the validator and the envelope decoder
pub mod reasons {
    pub const MISSING_ORDER_ID: &str = "Missing required field: orderId";
    pub const MISSING_USER_ID: &str = "Missing required field: userId";
    pub const MISSING_AMOUNT: &str = "Missing required field: amount";
    pub const INVALID_AMOUNT: &str = "Invalid amount: must be greater than 0";
    pub const UNEXPECTED_FIELDS_PREFIX: &str = "Malformed JSON: unexpected fields";
    pub const MALFORMED_JSON_PREFIX: &str = "Malformed JSON: ";
    pub const VALIDATION_ERROR_PREFIX: &str = "Validation error: ";

    /// Envelope parsed but carried no reason/originalMessage
    pub const UNKNOWN: &str = "Unknown";
    /// Envelope could not be parsed at all
    pub const PARSE_ERROR: &str = "Parse Error";
}

/// Structured log operation names
pub mod operations {
    pub const MESSAGE_RECEIVED: &str = "MESSAGE_RECEIVED";
    pub const MESSAGE_ACCEPTED: &str = "MESSAGE_ACCEPTED";
    pub const MESSAGE_REJECTED: &str = "MESSAGE_REJECTED";
    pub const DEAD_LETTER_PUBLISHED: &str = "DEAD_LETTER_PUBLISHED";
    pub const DEAD_LETTER_PUBLISH_FAILED: &str = "DEAD_LETTER_PUBLISH_FAILED";
    pub const DEAD_LETTER_RECEIVED: &str = "DEAD_LETTER_RECEIVED";
    pub const DEAD_LETTER_EVICTED: &str = "DEAD_LETTER_EVICTED";
    pub const REPLAYED: &str = "REPLAYED";
    pub const REPLAY_NOT_FOUND: &str = "REPLAY_NOT_FOUND";
    pub const REPLAY_PUBLISH_FAILED: &str = "REPLAY_PUBLISH_FAILED";
    pub const REPLAY_RESTORE_SKIPPED: &str = "REPLAY_RESTORE_SKIPPED";
    pub const CLEARED: &str = "CLEARED";
    pub const BULK_SUBMIT_COMPLETED: &str = "BULK_SUBMIT_COMPLETED";
    pub const RETRY_TRIGGERED: &str = "RETRY_TRIGGERED";
}

/// Retry hook scheduling
pub mod retry {
    use super::Duration;

    pub const DEFAULT_INTERVAL_SECONDS: u64 = 300;

    pub fn default_interval() -> Duration {
        Duration::from_secs(DEFAULT_INTERVAL_SECONDS)
    }
}

/// Message returned by the health endpoint
pub const HEALTH_MESSAGE: &str = "DLQ Service is running";

/// Only line-delimited JSON uploads are accepted for file ingestion
pub const BULK_FILE_EXTENSION: &str = "jsonl";

//! # Classification Metrics
//!
//! In-process counters for the operator dashboard, mirrored to OpenTelemetry
//! counters on the global meter. Exporter installation belongs to the
//! embedding service; without one the OpenTelemetry side is a no-op.
//!
//! ## Usage
//!
//! ```rust
//! use order_dlq::metrics::ClassificationCounters;
//! use order_dlq::models::FailureCategory;
//!
//! let counters = ClassificationCounters::new();
//! counters.record_processed();
//! counters.record_rejected(FailureCategory::MalformedError);
//!
//! let snapshot = counters.snapshot();
//! assert_eq!(snapshot.processed, 1);
//! assert_eq!(snapshot.malformed, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use opentelemetry::metrics::{Counter, Meter};
use opentelemetry::KeyValue;
use serde::{Deserialize, Serialize};

use crate::models::FailureCategory;

static PIPELINE_METER: OnceLock<Meter> = OnceLock::new();

fn meter() -> &'static Meter {
    PIPELINE_METER.get_or_init(|| opentelemetry::global::meter_provider().meter("order-dlq"))
}

/// Total number of messages delivered on the input channel
pub fn messages_processed_total() -> Counter<u64> {
    meter()
        .u64_counter("dlq.messages.processed.total")
        .with_description("Total number of messages delivered on the input channel")
        .build()
}

/// Total number of messages accepted by the validator
pub fn messages_valid_total() -> Counter<u64> {
    meter()
        .u64_counter("dlq.messages.valid.total")
        .with_description("Total number of messages accepted by the validator")
        .build()
}

/// Total number of messages rejected
///
/// Labels:
/// - category: VALIDATION_ERROR, MALFORMED_ERROR
pub fn messages_rejected_total() -> Counter<u64> {
    meter()
        .u64_counter("dlq.messages.rejected.total")
        .with_description("Total number of messages routed to the dead-letter channel")
        .build()
}

/// Total number of failed publishes
///
/// Labels:
/// - channel: input or dead-letter channel name
pub fn publish_failures_total() -> Counter<u64> {
    meter()
        .u64_counter("dlq.publish.failures.total")
        .with_description("Total number of publishes the transport refused")
        .build()
}

/// Total number of dead letters replayed onto the input channel
pub fn messages_replayed_total() -> Counter<u64> {
    meter()
        .u64_counter("dlq.messages.replayed.total")
        .with_description("Total number of dead letters replayed onto the input channel")
        .build()
}

// Static instances, built once on first use

pub static MESSAGES_PROCESSED_TOTAL: OnceLock<Counter<u64>> = OnceLock::new();

pub static MESSAGES_VALID_TOTAL: OnceLock<Counter<u64>> = OnceLock::new();

pub static MESSAGES_REJECTED_TOTAL: OnceLock<Counter<u64>> = OnceLock::new();

pub static PUBLISH_FAILURES_TOTAL: OnceLock<Counter<u64>> = OnceLock::new();

pub static MESSAGES_REPLAYED_TOTAL: OnceLock<Counter<u64>> = OnceLock::new();

/// Initialize all pipeline instruments
///
/// Optional; each instrument is otherwise created on first use. Call after
/// the embedding service installs its meter provider.
pub fn init() {
    MESSAGES_PROCESSED_TOTAL.get_or_init(messages_processed_total);
    MESSAGES_VALID_TOTAL.get_or_init(messages_valid_total);
    MESSAGES_REJECTED_TOTAL.get_or_init(messages_rejected_total);
    PUBLISH_FAILURES_TOTAL.get_or_init(publish_failures_total);
    MESSAGES_REPLAYED_TOTAL.get_or_init(messages_replayed_total);
}

/// Point-in-time counter values for display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub processed: u64,
    pub valid: u64,
    pub invalid: u64,
    pub malformed: u64,
    pub publish_failures: u64,
    pub replayed: u64,
}

#[derive(Debug, Default)]
pub struct ClassificationCounters {
    processed: AtomicU64,
    valid: AtomicU64,
    invalid: AtomicU64,
    malformed: AtomicU64,
    publish_failures: AtomicU64,
    replayed: AtomicU64,
}

impl ClassificationCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
        MESSAGES_PROCESSED_TOTAL
            .get_or_init(messages_processed_total)
            .add(1, &[]);
    }

    pub fn record_valid(&self) {
        self.valid.fetch_add(1, Ordering::Relaxed);
        MESSAGES_VALID_TOTAL
            .get_or_init(messages_valid_total)
            .add(1, &[]);
    }

    /// Count a rejection under its category
    ///
    /// `UnknownError` is never produced by the validator and is not counted.
    pub fn record_rejected(&self, category: FailureCategory) {
        let counter = match category {
            FailureCategory::ValidationError => &self.invalid,
            FailureCategory::MalformedError => &self.malformed,
            FailureCategory::UnknownError => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        MESSAGES_REJECTED_TOTAL
            .get_or_init(messages_rejected_total)
            .add(1, &[KeyValue::new("category", category.as_str())]);
    }

    pub fn record_publish_failure(&self, channel: &str) {
        self.publish_failures.fetch_add(1, Ordering::Relaxed);
        PUBLISH_FAILURES_TOTAL
            .get_or_init(publish_failures_total)
            .add(1, &[KeyValue::new("channel", channel.to_string())]);
    }

    pub fn record_replayed(&self) {
        self.replayed.fetch_add(1, Ordering::Relaxed);
        MESSAGES_REPLAYED_TOTAL
            .get_or_init(messages_replayed_total)
            .add(1, &[]);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            processed: self.processed.load(Ordering::Relaxed),
            valid: self.valid.load(Ordering::Relaxed),
            invalid: self.invalid.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            publish_failures: self.publish_failures.load(Ordering::Relaxed),
            replayed: self.replayed.load(Ordering::Relaxed),
        }
    }
}

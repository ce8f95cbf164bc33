//! # Operator Service
//!
//! The operator-facing surface: submit, replay, inspect and clear. Framing
//! (HTTP, CLI, dashboard) belongs to the embedding service; everything here
//! is transport-independent.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::replay_coordinator::{ReplayCoordinator, ReplayOutcome};
use crate::constants::{operations, BULK_FILE_EXTENSION, HEALTH_MESSAGE};
use crate::error::{DlqError, DlqResult};
use crate::log_dead_letter;
use crate::messaging::MessagePublisher;
use crate::metrics::{ClassificationCounters, MetricsSnapshot};
use crate::models::{DeadLetterEntry, ValidMessage};
use crate::store::{DeadLetterStore, ValidMessageStore};

/// Result of a bulk submission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSubmitSummary {
    /// Every line seen, blank ones included
    pub total: usize,
    pub successful: usize,
    /// Blank lines plus lines the transport refused
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: String,
    pub provider: String,
    pub input_channel: String,
    pub dead_letter_count: usize,
    pub valid_message_count: usize,
}

pub struct OperatorService {
    publisher: Arc<dyn MessagePublisher>,
    input_channel: String,
    dead_letters: Arc<DeadLetterStore>,
    valid_messages: Arc<ValidMessageStore>,
    coordinator: Arc<ReplayCoordinator>,
    counters: Arc<ClassificationCounters>,
}

impl std::fmt::Debug for OperatorService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorService")
            .field("input_channel", &self.input_channel)
            .field("provider", &self.publisher.provider_name())
            .finish()
    }
}

impl OperatorService {
    pub fn new(
        publisher: Arc<dyn MessagePublisher>,
        dead_letters: Arc<DeadLetterStore>,
        valid_messages: Arc<ValidMessageStore>,
        coordinator: Arc<ReplayCoordinator>,
        counters: Arc<ClassificationCounters>,
    ) -> Self {
        Self {
            input_channel: coordinator.input_channel().to_string(),
            publisher,
            dead_letters,
            valid_messages,
            coordinator,
            counters,
        }
    }

    /// Publish a raw message onto the input channel
    ///
    /// Validation happens downstream, so any text is accepted here.
    pub async fn submit(&self, raw_message: &str) -> DlqResult<()> {
        self.publisher
            .publish(&self.input_channel, raw_message)
            .await
            .map_err(|e| {
                self.counters.record_publish_failure(&self.input_channel);
                warn!(
                    channel = %self.input_channel,
                    error = %e,
                    "Failed to submit message"
                );
                DlqError::from(e)
            })
    }

    /// Replay by textual id; an id that is not a UUID cannot exist and is
    /// reported as `NotFound`
    pub async fn reprocess(&self, id: &str) -> DlqResult<ReplayOutcome> {
        match Uuid::parse_str(id.trim()) {
            Ok(id) => self.coordinator.reprocess(id).await,
            Err(_) => {
                log_dead_letter!(info, operations::REPLAY_NOT_FOUND, id: id);
                Ok(ReplayOutcome::NotFound)
            }
        }
    }

    pub async fn reprocess_id(&self, id: Uuid) -> DlqResult<ReplayOutcome> {
        self.coordinator.reprocess(id).await
    }

    pub fn clear_dead_letters(&self) -> usize {
        let removed = self.dead_letters.clear();
        log_dead_letter!(info, operations::CLEARED, store: "dead_letters", removed: removed);
        removed
    }

    pub fn clear_valid_messages(&self) -> usize {
        let removed = self.valid_messages.clear();
        log_dead_letter!(info, operations::CLEARED, store: "valid_messages", removed: removed);
        removed
    }

    pub fn list_dead_letters(&self) -> Vec<DeadLetterEntry> {
        self.dead_letters.all()
    }

    pub fn list_valid_messages(&self) -> Vec<ValidMessage> {
        self.valid_messages.all()
    }

    /// Submit each non-blank line independently
    ///
    /// Lines are trimmed before submission. A refused line is logged and
    /// counted as skipped; it never stops the remaining lines.
    pub async fn bulk_submit<I, S>(&self, lines: I) -> BulkSubmitSummary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut summary = BulkSubmitSummary::default();

        for (index, line) in lines.into_iter().enumerate() {
            summary.total += 1;
            let line = line.as_ref().trim();

            if line.is_empty() {
                summary.skipped += 1;
                continue;
            }

            match self.submit(line).await {
                Ok(()) => summary.successful += 1,
                Err(e) => {
                    debug!(line = index + 1, error = %e, "Skipping line after failed submit");
                    summary.skipped += 1;
                }
            }
        }

        log_dead_letter!(
            info,
            operations::BULK_SUBMIT_COMPLETED,
            total: summary.total,
            successful: summary.successful,
            skipped: summary.skipped
        );

        summary
    }

    /// Bulk-submit a `.jsonl` file, one message per line
    ///
    /// # Errors
    ///
    /// `DlqError::InvalidInput` for any other extension, `DlqError::Io` when
    /// the file cannot be read.
    pub async fn bulk_submit_file(&self, path: impl AsRef<Path>) -> DlqResult<BulkSubmitSummary> {
        let path = path.as_ref();
        let is_jsonl = path
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| extension == BULK_FILE_EXTENSION);

        if !is_jsonl {
            return Err(DlqError::InvalidInput(format!(
                "Only .{BULK_FILE_EXTENSION} files are allowed: {}",
                path.display()
            )));
        }

        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DlqError::Io(format!("{}: {e}", path.display())))?;

        Ok(self.bulk_submit(contents.lines()).await)
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.counters.snapshot()
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            status: HEALTH_MESSAGE.to_string(),
            provider: self.publisher.provider_name().to_string(),
            input_channel: self.input_channel.clone(),
            dead_letter_count: self.dead_letters.len(),
            valid_message_count: self.valid_messages.len(),
        }
    }
}

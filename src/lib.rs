#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Order DLQ
//!
//! Order ingestion pipeline with dead-letter classification, inspection and
//! replay.
//!
//! ## Overview
//!
//! Every message on the input channel is decoded and validated. Accepted
//! orders land in a bounded valid-message store. Everything else is wrapped
//! in a dead-letter envelope (reason, category, original payload) and
//! published to the dead-letter channel, where a second consumer records it
//! in the dead-letter store. Operators can list, clear and replay dead
//! letters; a replay republishes the original payload to the input channel
//! at most once per entry.
//!
//! ## Module Organization
//!
//! - [`validation`] - Ordered rule chain producing `(reason, category)` pairs
//! - [`messaging`] - Transport traits, in-memory broker, envelope codec
//! - [`store`] - Dead-letter and valid-message stores
//! - [`consumer`] - Input and dead-letter channel handlers
//! - [`services`] - Replay coordinator, retry hook, operator surface
//! - [`bootstrap`] - Wiring for a running pipeline
//! - [`config`] - Layered configuration
//! - [`metrics`] - Classification counters
//! - [`logging`] - Console logging setup and structured logging macros
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use order_dlq::bootstrap::DlqPipeline;
//! use order_dlq::config::PipelineConfig;
//! use order_dlq::messaging::InMemoryBroker;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! order_dlq::logging::init_tracing();
//!
//! let pipeline = DlqPipeline::start(PipelineConfig::default(), Arc::new(InMemoryBroker::default())).await?;
//! let operator = pipeline.operator();
//!
//! operator.submit(r#"{"orderId":"o1","amount":10}"#).await?;
//!
//! for entry in operator.list_dead_letters() {
//!     operator.reprocess_id(entry.id).await?;
//! }
//!
//! pipeline.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod consumer;
pub mod error;
pub mod logging;
pub mod messaging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod store;
pub mod test_utils;
pub mod validation;

pub use bootstrap::DlqPipeline;
pub use config::{ConfigManager, ConfigurationError, PipelineConfig};
pub use error::{DlqError, DlqResult};
pub use messaging::{InMemoryBroker, MessagePublisher, MessagingError};
pub use metrics::{ClassificationCounters, MetricsSnapshot};
pub use models::{DeadLetterEntry, FailureCategory, Order, ValidMessage};
pub use services::{BulkSubmitSummary, OperatorService, ReplayCoordinator, ReplayOutcome};
pub use store::{DeadLetterStore, ValidMessageStore};
pub use validation::{OrderValidator, ValidationOutcome};

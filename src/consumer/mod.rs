//! # Consumers
//!
//! Message handlers for the two subscribed channels.

pub mod dead_letter_consumer;
pub mod ingest_consumer;

pub use dead_letter_consumer::DeadLetterConsumer;
pub use ingest_consumer::{IngestConsumer, IngestOutcome};

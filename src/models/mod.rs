//! # Models
//!
//! Payload and record types flowing through the pipeline.

pub mod dead_letter_entry;
pub mod failure_category;
pub mod order;
pub mod valid_message;

pub use dead_letter_entry::DeadLetterEntry;
pub use failure_category::FailureCategory;
pub use order::Order;
pub use valid_message::ValidMessage;

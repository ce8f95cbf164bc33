//! # Stores
//!
//! In-memory holders for dead letters and accepted messages. Both are safe
//! to share across delivery tasks and operator actions behind an `Arc`, and
//! both hand out owned snapshots rather than live views.

pub mod dead_letter_store;
pub mod valid_message_store;

pub use dead_letter_store::{DeadLetterStore, TakenEntry};
pub use valid_message_store::ValidMessageStore;

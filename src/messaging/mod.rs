//! # Messaging
//!
//! Transport seams and the dead-letter wire contract.
//!
//! The pipeline only needs two capabilities from a broker: publish a payload
//! onto a named channel and deliver subscribed payloads to a handler. Both
//! are traits here; [`InMemoryBroker`] is the bundled implementation.

pub mod envelope;
pub mod errors;
pub mod in_memory;
pub mod listener;
pub mod traits;

pub use envelope::DecodedEnvelope;
pub use errors::{MessagingError, MessagingResult};
pub use in_memory::InMemoryBroker;
pub use listener::ChannelListener;
pub use traits::{MessageHandler, MessagePublisher};

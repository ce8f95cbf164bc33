//! # Messaging Traits
//!
//! Provider-agnostic seams between the pipeline and its transport.

use async_trait::async_trait;

use super::MessagingResult;

/// Publish capability provided by the transport collaborator
///
/// Implementations are expected to be fire-and-forget: a successful return
/// means the transport accepted the payload, not that anyone consumed it.
#[async_trait]
pub trait MessagePublisher: Send + Sync + 'static {
    /// Publish a raw payload onto a named channel
    async fn publish(&self, channel: &str, payload: &str) -> MessagingResult<()>;

    /// Provider name for logging/metrics
    fn provider_name(&self) -> &'static str;
}

/// Delivery callback invoked once per message on a subscribed channel
///
/// Handlers may be invoked concurrently from several delivery contexts and
/// must not assume serialized delivery.
#[async_trait]
pub trait MessageHandler: Send + Sync + 'static {
    async fn handle(&self, payload: String);
}

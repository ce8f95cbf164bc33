//! # In-Memory Broker
//!
//! Thread-safe in-process publish/subscribe transport for testing, local
//! runs, and embedders without a broker.
//!
//! ## Features
//!
//! - **Named Channels**: one bounded `tokio::sync::mpsc` queue per subscriber
//! - **Fan-out**: every subscriber sees every message published after it subscribed
//! - **Backpressure**: `publish` waits while a subscriber's queue is full, so
//!   undelivered messages are never overwritten
//! - **Outage Simulation**: `set_available(false)` makes every publish fail

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

use super::traits::MessagePublisher;
use super::{MessagingError, MessagingResult};
use crate::constants::channels::DEFAULT_BUFFER_CAPACITY;

const PROVIDER_NAME: &str = "in_memory";

#[derive(Debug, Default)]
struct InMemoryChannel {
    subscribers: Mutex<Vec<mpsc::Sender<String>>>,
    total_published: AtomicU64,
}

impl InMemoryChannel {
    /// Live subscriber queues; queues whose receiver is gone are dropped
    fn live_subscribers(&self) -> Vec<mpsc::Sender<String>> {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|sender| !sender.is_closed());
        subscribers.clone()
    }
}

/// In-memory publish/subscribe broker
///
/// # Example
///
/// ```rust
/// use order_dlq::messaging::{InMemoryBroker, MessagePublisher};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let broker = InMemoryBroker::with_channels(16, &["orders"]);
/// let mut receiver = broker.subscribe("orders")?;
///
/// broker.publish("orders", r#"{"orderId":"o1"}"#).await?;
/// assert_eq!(receiver.recv().await.as_deref(), Some(r#"{"orderId":"o1"}"#));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct InMemoryBroker {
    channels: DashMap<String, InMemoryChannel>,
    buffer_capacity: usize,
    available: AtomicBool,
}

impl Default for InMemoryBroker {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_CAPACITY)
    }
}

impl InMemoryBroker {
    /// Create a broker whose subscribers each queue up to `buffer_capacity`
    /// undelivered messages before publishers wait
    pub fn new(buffer_capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            buffer_capacity: buffer_capacity.max(1),
            available: AtomicBool::new(true),
        }
    }

    /// Create with pre-initialized channels
    pub fn with_channels(buffer_capacity: usize, channel_names: &[&str]) -> Self {
        let broker = Self::new(buffer_capacity);
        for name in channel_names {
            broker.ensure_channel(name);
        }
        broker
    }

    /// Create a channel if it doesn't exist (idempotent)
    pub fn ensure_channel(&self, channel: &str) {
        self.channels.entry(channel.to_string()).or_default();
    }

    /// Subscribe to a channel; only messages published afterwards are seen
    pub fn subscribe(&self, channel: &str) -> MessagingResult<mpsc::Receiver<String>> {
        let entry = self
            .channels
            .get(channel)
            .ok_or_else(|| MessagingError::channel_not_found(channel))?;

        let (sender, receiver) = mpsc::channel(self.buffer_capacity);
        entry.subscribers.lock().push(sender);
        Ok(receiver)
    }

    /// Toggle transport availability
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    /// Number of messages accepted on a channel since creation
    pub fn published_count(&self, channel: &str) -> u64 {
        self.channels
            .get(channel)
            .map(|entry| entry.total_published.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.channels
            .get(channel)
            .map(|entry| entry.live_subscribers().len())
            .unwrap_or(0)
    }

    /// Undelivered messages queued for the subscribers of a channel
    pub fn pending_count(&self, channel: &str) -> usize {
        self.channels
            .get(channel)
            .map(|entry| {
                entry
                    .live_subscribers()
                    .iter()
                    .map(|sender| sender.max_capacity() - sender.capacity())
                    .sum()
            })
            .unwrap_or(0)
    }
}

#[async_trait]
impl MessagePublisher for InMemoryBroker {
    async fn publish(&self, channel: &str, payload: &str) -> MessagingResult<()> {
        if !self.is_available() {
            return Err(MessagingError::unavailable(
                PROVIDER_NAME,
                "broker is not accepting messages",
            ));
        }

        // Release the map guard before awaiting on subscriber queues
        let subscribers = {
            let entry = self
                .channels
                .get(channel)
                .ok_or_else(|| MessagingError::channel_not_found(channel))?;
            entry.total_published.fetch_add(1, Ordering::Relaxed);
            entry.live_subscribers()
        };

        // No subscribers is acceptable for a fire-and-forget transport
        if subscribers.is_empty() {
            debug!(channel = %channel, "Published to channel with no subscribers");
        }

        for sender in subscribers {
            if sender.send(payload.to_string()).await.is_err() {
                debug!(channel = %channel, "Subscriber went away before delivery");
            }
        }

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

//! # Channel Listener
//!
//! Drives a [`MessageHandler`] from a channel subscription. Every delivery
//! runs on its own task, bounded by a semaphore, so handlers observe the
//! same unordered, concurrent delivery a sharded broker would produce.
//!
//! The loop stops receiving while every permit is taken, which leaves
//! messages queued in the subscription and makes publishers wait.

use std::sync::Arc;

use tokio::sync::{mpsc, watch, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::traits::MessageHandler;

/// Background subscription loop for a single channel
#[derive(Debug)]
pub struct ChannelListener {
    channel: String,
    handle: JoinHandle<()>,
}

impl ChannelListener {
    /// Start delivering messages from `receiver` to `handler`
    ///
    /// The loop exits when `shutdown` flips to `true`, when its sender is
    /// dropped, or when the subscription closes. In-flight deliveries are
    /// awaited before the task completes.
    pub fn spawn(
        channel: impl Into<String>,
        mut receiver: mpsc::Receiver<String>,
        handler: Arc<dyn MessageHandler>,
        max_concurrent_deliveries: usize,
        mut shutdown: watch::Receiver<bool>,
    ) -> Self {
        let channel = channel.into();
        let permits = max_concurrent_deliveries.max(1);
        let semaphore = Arc::new(Semaphore::new(permits));
        let loop_channel = channel.clone();

        let handle = tokio::spawn(async move {
            info!(channel = %loop_channel, max_concurrent = permits, "Channel listener started");

            loop {
                tokio::select! {
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                    received = receiver.recv() => match received {
                        Some(payload) => {
                            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                                break;
                            };
                            let handler = handler.clone();
                            tokio::spawn(async move {
                                handler.handle(payload).await;
                                drop(permit);
                            });
                        }
                        None => {
                            debug!(channel = %loop_channel, "Channel closed");
                            break;
                        }
                    }
                }
            }

            // Drain in-flight deliveries
            let _ = semaphore.acquire_many(permits as u32).await;
            info!(channel = %loop_channel, "Channel listener stopped");
        });

        Self { channel, handle }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Wait for the listener loop and its in-flight deliveries to finish
    pub async fn join(self) {
        if let Err(e) = self.handle.await {
            warn!(channel = %self.channel, error = %e, "Channel listener task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingHandler {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MessageHandler for RecordingHandler {
        async fn handle(&self, payload: String) {
            self.seen.lock().push(payload);
        }
    }

    #[tokio::test]
    async fn test_delivers_then_stops_on_shutdown() {
        let (sender, receiver) = mpsc::channel(16);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handler = Arc::new(RecordingHandler::default());

        let listener = ChannelListener::spawn("orders", receiver, handler.clone(), 2, shutdown_rx);
        assert_eq!(listener.channel(), "orders");

        sender.send("one".to_string()).await.unwrap();
        sender.send("two".to_string()).await.unwrap();

        for _ in 0..100 {
            if handler.seen.lock().len() == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        shutdown_tx.send(true).unwrap();
        listener.join().await;

        let mut seen = handler.seen.lock().clone();
        seen.sort();
        assert_eq!(seen, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_stops_when_channel_closes() {
        let (sender, receiver) = mpsc::channel::<String>(4);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let handler = Arc::new(RecordingHandler::default());

        let listener = ChannelListener::spawn("orders", receiver, handler, 1, shutdown_rx);
        drop(sender);

        tokio::time::timeout(Duration::from_secs(5), listener.join())
            .await
            .expect("listener should stop once the channel closes");
    }
}

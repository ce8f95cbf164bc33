//! # Pipeline Bootstrap
//!
//! Wires the broker, stores, consumers, listeners, replay coordinator, retry
//! scheduler and operator service from a [`PipelineConfig`].
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use order_dlq::bootstrap::DlqPipeline;
//! use order_dlq::config::PipelineConfig;
//! use order_dlq::messaging::InMemoryBroker;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::default();
//! let broker = Arc::new(InMemoryBroker::new(config.channels.buffer_capacity));
//! let pipeline = DlqPipeline::start(config, broker).await?;
//!
//! pipeline.operator().submit(r#"{"orderId":"o1","userId":"u1","amount":5}"#).await?;
//!
//! pipeline.shutdown().await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::consumer::{DeadLetterConsumer, IngestConsumer};
use crate::error::DlqResult;
use crate::messaging::{ChannelListener, InMemoryBroker, MessagePublisher};
use crate::metrics::ClassificationCounters;
use crate::services::{OperatorService, ReplayCoordinator, RetryContext, RetryScheduler};
use crate::store::{DeadLetterStore, ValidMessageStore};

/// A running pipeline over an in-memory broker
#[derive(Debug)]
pub struct DlqPipeline {
    config: PipelineConfig,
    broker: Arc<InMemoryBroker>,
    dead_letters: Arc<DeadLetterStore>,
    valid_messages: Arc<ValidMessageStore>,
    counters: Arc<ClassificationCounters>,
    retry_scheduler: Arc<RetryScheduler>,
    operator: Arc<OperatorService>,
    shutdown_tx: watch::Sender<bool>,
    listeners: Vec<ChannelListener>,
    retry_handle: Option<JoinHandle<()>>,
}

impl DlqPipeline {
    /// Validate the configuration, subscribe both channels and start
    /// background tasks
    ///
    /// Subscriptions exist by the time this returns, so nothing published
    /// afterwards is missed.
    pub async fn start(config: PipelineConfig, broker: Arc<InMemoryBroker>) -> DlqResult<Self> {
        config.validate()?;
        crate::metrics::init();

        let input_channel = config.channels.input.clone();
        let dead_letter_channel = config.channels.dead_letter.clone();
        broker.ensure_channel(&input_channel);
        broker.ensure_channel(&dead_letter_channel);

        let publisher: Arc<dyn MessagePublisher> = broker.clone();
        let dead_letters = Arc::new(DeadLetterStore::with_capacity(
            config.stores.dead_letter_capacity,
        ));
        let valid_messages = Arc::new(ValidMessageStore::new(
            config.stores.valid_message_capacity,
        ));
        let counters = Arc::new(ClassificationCounters::new());

        let coordinator = Arc::new(ReplayCoordinator::new(
            dead_letters.clone(),
            publisher.clone(),
            input_channel.clone(),
            counters.clone(),
        ));
        let operator = Arc::new(OperatorService::new(
            publisher.clone(),
            dead_letters.clone(),
            valid_messages.clone(),
            coordinator.clone(),
            counters.clone(),
        ));
        let retry_scheduler = Arc::new(RetryScheduler::with_default_policy(
            RetryContext {
                store: dead_letters.clone(),
                coordinator,
            },
            config.retry.interval(),
        ));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let max_concurrent = config.consumers.max_concurrent_deliveries;

        let ingest = Arc::new(IngestConsumer::new(
            valid_messages.clone(),
            publisher,
            dead_letter_channel.clone(),
            counters.clone(),
        ));
        let dead_letter_consumer = Arc::new(DeadLetterConsumer::new(dead_letters.clone()));

        let listeners = vec![
            ChannelListener::spawn(
                input_channel.clone(),
                broker.subscribe(&input_channel)?,
                ingest,
                max_concurrent,
                shutdown_rx.clone(),
            ),
            ChannelListener::spawn(
                dead_letter_channel.clone(),
                broker.subscribe(&dead_letter_channel)?,
                dead_letter_consumer,
                max_concurrent,
                shutdown_rx.clone(),
            ),
        ];

        let retry_handle = config
            .retry
            .enabled
            .then(|| retry_scheduler.clone().spawn(shutdown_rx));

        info!(
            input_channel = %input_channel,
            dead_letter_channel = %dead_letter_channel,
            provider = broker.provider_name(),
            max_concurrent_deliveries = max_concurrent,
            retry_enabled = config.retry.enabled,
            "DLQ pipeline started"
        );

        Ok(Self {
            config,
            broker,
            dead_letters,
            valid_messages,
            counters,
            retry_scheduler,
            operator,
            shutdown_tx,
            listeners,
            retry_handle,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn broker(&self) -> &Arc<InMemoryBroker> {
        &self.broker
    }

    pub fn operator(&self) -> &Arc<OperatorService> {
        &self.operator
    }

    pub fn dead_letters(&self) -> &Arc<DeadLetterStore> {
        &self.dead_letters
    }

    pub fn valid_messages(&self) -> &Arc<ValidMessageStore> {
        &self.valid_messages
    }

    pub fn counters(&self) -> &Arc<ClassificationCounters> {
        &self.counters
    }

    pub fn retry_scheduler(&self) -> &Arc<RetryScheduler> {
        &self.retry_scheduler
    }

    /// Stop listeners and the retry scheduler, waiting for in-flight
    /// deliveries to finish
    pub async fn shutdown(self) {
        if self.shutdown_tx.send(true).is_err() {
            warn!("All pipeline tasks already stopped before shutdown");
        }

        for listener in self.listeners {
            listener.join().await;
        }

        if let Some(handle) = self.retry_handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "Retry scheduler task failed");
            }
        }

        info!(
            dead_letters = self.dead_letters.len(),
            valid_messages = self.valid_messages.len(),
            "DLQ pipeline stopped"
        );
    }
}

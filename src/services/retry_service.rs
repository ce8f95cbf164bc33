//! # Retry Scheduler
//!
//! Periodic extension point for automatic dead-letter retry. The bundled
//! [`NoRetryPolicy`] only logs; a real policy can be plugged in through
//! [`RetryPolicy`] without touching the ingest path.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::replay_coordinator::ReplayCoordinator;
use crate::constants::operations;
use crate::store::DeadLetterStore;

/// Collaborators available to a retry policy
#[derive(Debug, Clone)]
pub struct RetryContext {
    pub store: Arc<DeadLetterStore>,
    pub coordinator: Arc<ReplayCoordinator>,
}

/// Strategy invoked on every scheduler tick
///
/// Implementations must tolerate being called repeatedly and concurrently
/// with ingest and operator actions.
#[async_trait]
pub trait RetryPolicy: Send + Sync + 'static {
    async fn run(&self, context: &RetryContext);

    fn name(&self) -> &'static str;
}

/// Default policy: records the tick and retries nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRetryPolicy;

#[async_trait]
impl RetryPolicy for NoRetryPolicy {
    async fn run(&self, context: &RetryContext) {
        info!(
            operation = operations::RETRY_TRIGGERED,
            pending_dead_letters = context.store.len(),
            "Retry mechanism triggered"
        );
    }

    fn name(&self) -> &'static str {
        "no_retry"
    }
}

pub struct RetryScheduler {
    policy: Arc<dyn RetryPolicy>,
    context: RetryContext,
    interval: Duration,
    triggers: AtomicU64,
}

impl std::fmt::Debug for RetryScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryScheduler")
            .field("policy", &self.policy.name())
            .field("interval", &self.interval)
            .field("triggers", &self.trigger_count())
            .finish()
    }
}

impl RetryScheduler {
    pub fn new(policy: Arc<dyn RetryPolicy>, context: RetryContext, interval: Duration) -> Self {
        Self {
            policy,
            context,
            interval,
            triggers: AtomicU64::new(0),
        }
    }

    pub fn with_default_policy(context: RetryContext, interval: Duration) -> Self {
        Self::new(Arc::new(NoRetryPolicy), context, interval)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Run the policy once, outside the schedule
    pub async fn trigger(&self) {
        self.triggers.fetch_add(1, Ordering::Relaxed);
        self.policy.run(&self.context).await;
    }

    pub fn trigger_count(&self) -> u64 {
        self.triggers.load(Ordering::Relaxed)
    }

    /// Tick every `interval` until `shutdown` flips to `true`
    pub fn spawn(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!(
                policy = self.policy.name(),
                interval_seconds = self.interval.as_secs(),
                "Retry scheduler started"
            );

            loop {
                tokio::select! {
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => self.trigger().await,
                }
            }

            debug!(triggers = self.trigger_count(), "Retry scheduler stopped");
        })
    }
}

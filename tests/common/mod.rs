#![allow(dead_code)]

pub mod strategies;

use std::sync::Arc;
use std::time::Duration;

use order_dlq::bootstrap::DlqPipeline;
use order_dlq::config::PipelineConfig;
use order_dlq::messaging::InMemoryBroker;

/// Start a pipeline over a fresh broker with the scheduled retry disabled
pub async fn start_pipeline() -> DlqPipeline {
    let mut config = PipelineConfig::default();
    config.retry.enabled = false;
    start_pipeline_with(config).await
}

pub async fn start_pipeline_with(config: PipelineConfig) -> DlqPipeline {
    order_dlq::test_utils::setup_test_environment();
    let broker = Arc::new(InMemoryBroker::new(config.channels.buffer_capacity));
    DlqPipeline::start(config, broker)
        .await
        .expect("pipeline should start with a valid config")
}

/// Poll `condition` until it holds, panicking after five seconds
pub async fn wait_for<F>(description: &str, mut condition: F)
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !condition() {
        if tokio::time::Instant::now() >= deadline {
            panic!("timed out waiting for {description}");
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

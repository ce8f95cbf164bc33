//! # DLQ Pipeline Runner
//!
//! Runs the pipeline over the in-memory broker: submits messages from the
//! command line and/or a `.jsonl` file, optionally replays every dead letter,
//! then prints the operator snapshots as JSON.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use order_dlq::bootstrap::DlqPipeline;
use order_dlq::config::ConfigManager;
use order_dlq::logging::init_tracing;
use order_dlq::messaging::InMemoryBroker;
use serde_json::json;
use tracing::info;

#[derive(Parser)]
#[command(name = "dlq-pipeline")]
#[command(about = "Run the order DLQ pipeline over an in-memory broker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration directory (default: $DLQ_CONFIG_DIR or ./config)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Environment overlay to apply (default: $DLQ_ENV or $APP_ENV)
    #[arg(short, long)]
    environment: Option<String>,

    /// Line-delimited JSON file to submit
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Raw message to submit; may be repeated
    #[arg(short, long = "message")]
    messages: Vec<String>,

    /// Replay every dead letter once after ingestion settles
    #[arg(long)]
    replay_all: bool,

    /// Time to let deliveries settle between phases
    #[arg(long, default_value_t = 250)]
    settle_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let manager = match &cli.environment {
        Some(environment) => {
            ConfigManager::load_from_directory_with_env(cli.config_dir.clone(), environment)
        }
        None => ConfigManager::load_from_directory(cli.config_dir.clone()),
    }
    .context("failed to load pipeline configuration")?;

    let config = manager.config().clone();
    let broker = Arc::new(InMemoryBroker::new(config.channels.buffer_capacity));
    let pipeline = DlqPipeline::start(config, broker)
        .await
        .context("failed to start pipeline")?;
    let operator = pipeline.operator().clone();
    let settle = Duration::from_millis(cli.settle_ms);

    for message in &cli.messages {
        operator
            .submit(message)
            .await
            .context("failed to submit message")?;
    }

    if let Some(path) = &cli.file {
        let summary = operator
            .bulk_submit_file(path)
            .await
            .with_context(|| format!("failed to submit {}", path.display()))?;
        info!(
            total = summary.total,
            successful = summary.successful,
            skipped = summary.skipped,
            "Bulk submission finished"
        );
    }

    tokio::time::sleep(settle).await;

    if cli.replay_all {
        let mut replayed = 0usize;
        for entry in operator.list_dead_letters() {
            if operator.reprocess_id(entry.id).await?.is_replayed() {
                replayed += 1;
            }
        }
        info!(replayed = replayed, "Replayed dead letters");
        tokio::time::sleep(settle).await;
    }

    let report = json!({
        "health": operator.health(),
        "metrics": operator.metrics(),
        "deadLetters": operator.list_dead_letters(),
        "validMessages": operator.list_valid_messages(),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("failed to render report")?
    );

    pipeline.shutdown().await;
    Ok(())
}

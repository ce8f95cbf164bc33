//! # DLQ Configuration Validator
//!
//! Command-line tool for validating pipeline configuration across
//! environments before starting the pipeline.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use order_dlq::config::{ConfigManager, PipelineConfig};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "config-validator")]
#[command(about = "Validate DLQ pipeline configuration files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Environment to validate (development, test, production, ...)
    #[arg(short, long, default_value = "development")]
    environment: String,

    /// Configuration directory path (default: config)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Verbose output level (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load, merge and validate the configuration
    Validate,

    /// List environments with an overlay file in the config directory
    Environments,

    /// Print the effective configuration as JSON
    Show,

    /// Print the built-in defaults as JSON
    Defaults,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let _subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .try_init();

    let result = match &cli.command {
        Some(Commands::Validate) | None => validate(&cli),
        Some(Commands::Environments) => list_environments(&cli),
        Some(Commands::Show) => show(&cli),
        Some(Commands::Defaults) => print_json(&PipelineConfig::default()),
    };

    match result {
        Ok(()) => {
            info!("Configuration validation completed successfully");
            process::exit(0);
        }
        Err(e) => {
            error!("Configuration validation failed: {}", e);
            process::exit(1);
        }
    }
}

fn config_dir(cli: &Cli) -> PathBuf {
    cli.config_dir.clone().unwrap_or_else(|| PathBuf::from("config"))
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let dir = config_dir(cli);
    println!("Validating DLQ configuration");
    println!("Environment: {}", cli.environment);
    println!("Config Directory: {}", dir.display());
    println!();

    let manager = match ConfigManager::load_from_directory_with_env(Some(dir), &cli.environment) {
        Ok(manager) => manager,
        Err(e) => {
            println!("FAILED: {e}");
            return Err(Box::new(e));
        }
    };

    let config = manager.config();
    println!("OK: configuration loaded and validated");
    println!("  channels.input            = {}", config.channels.input);
    println!("  channels.dead_letter      = {}", config.channels.dead_letter);
    println!("  channels.buffer_capacity  = {}", config.channels.buffer_capacity);
    println!("  stores.valid_message_capacity = {}", config.stores.valid_message_capacity);
    println!(
        "  stores.dead_letter_capacity   = {}",
        config
            .stores
            .dead_letter_capacity
            .map_or_else(|| "unbounded".to_string(), |capacity| capacity.to_string())
    );
    println!(
        "  consumers.max_concurrent_deliveries = {}",
        config.consumers.max_concurrent_deliveries
    );
    println!(
        "  retry.enabled = {}, retry.interval_seconds = {}",
        config.retry.enabled, config.retry.interval_seconds
    );

    Ok(())
}

fn list_environments(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let dir = config_dir(cli);
    let environments = overlay_environments(&dir)?;

    if environments.is_empty() {
        println!("No environment overlays found in {}", dir.display());
    } else {
        println!("Environments in {}:", dir.display());
        for environment in environments {
            println!("  {environment}");
        }
    }

    Ok(())
}

/// Environments named by `dlq.{environment}.toml` files
fn overlay_environments(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut environments: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter_map(|name| {
            name.strip_prefix("dlq.")
                .and_then(|rest| rest.strip_suffix(".toml"))
                .filter(|environment| !environment.is_empty())
                .map(str::to_string)
        })
        .collect();
    environments.sort();
    Ok(environments)
}

fn show(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let manager = ConfigManager::load_from_directory_with_env(Some(config_dir(cli)), &cli.environment)?;
    println!("{}", serde_json::to_string_pretty(&manager.debug_config())?);
    Ok(())
}

fn print_json(config: &PipelineConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

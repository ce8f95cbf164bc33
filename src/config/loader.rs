//! Configuration Loader
//!
//! Environment-aware loading: base TOML file, environment overlay, then
//! `DLQ__` environment variables, merged with the `config` crate.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use config::{Config, Environment, File, FileFormat, Map};
use tracing::{debug, info};

use super::error::{ConfigResult, ConfigurationError};
use super::PipelineConfig;
use crate::logging::get_environment;

const BASE_FILE_STEM: &str = "dlq";
const ENV_PREFIX: &str = "DLQ";
const ENV_SEPARATOR: &str = "__";

/// Loaded, validated configuration plus where it came from
#[derive(Debug)]
pub struct ConfigManager {
    config: PipelineConfig,
    environment: String,
    config_directory: PathBuf,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = get_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        Self::load_with_overrides(config_dir, environment, None)
    }

    /// Load with an explicit set of `DLQ__*` variables in place of the
    /// process environment
    ///
    /// Passing `None` reads the process environment.
    pub fn load_with_overrides(
        config_dir: Option<PathBuf>,
        environment: &str,
        env_overrides: Option<Map<String, String>>,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let config_directory = config_dir.unwrap_or_else(Self::default_config_directory);

        debug!(
            environment = %environment,
            config_directory = %config_directory.display(),
            "Loading configuration"
        );

        let config = Self::load_and_merge_config(&config_directory, environment, env_overrides)?;
        config.validate()?;

        info!(
            environment = %environment,
            input_channel = %config.channels.input,
            dead_letter_channel = %config.channels.dead_letter,
            valid_message_capacity = config.stores.valid_message_capacity,
            dead_letter_capacity = ?config.stores.dead_letter_capacity,
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
        }))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    /// JSON rendering of the effective configuration
    pub fn debug_config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }

    /// `DLQ_CONFIG_DIR` if set, else `./config`
    fn default_config_directory() -> PathBuf {
        std::env::var("DLQ_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"))
    }

    fn load_and_merge_config(
        config_directory: &Path,
        environment: &str,
        env_overrides: Option<Map<String, String>>,
    ) -> ConfigResult<PipelineConfig> {
        let base_path = config_directory.join(format!("{BASE_FILE_STEM}.toml"));
        let environment_path = config_directory.join(format!("{BASE_FILE_STEM}.{environment}.toml"));

        debug!(
            base = %base_path.display(),
            overlay = %environment_path.display(),
            "Resolving configuration sources"
        );

        let merged = Config::builder()
            .add_source(File::from(base_path).format(FileFormat::Toml).required(false))
            .add_source(
                File::from(environment_path)
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .source(env_overrides),
            )
            .build()
            .map_err(|e| {
                ConfigurationError::load_error(config_directory.display().to_string(), e)
            })?;

        merged.try_deserialize::<PipelineConfig>().map_err(|e| {
            ConfigurationError::parse_error(config_directory.display().to_string(), e)
        })
    }
}

//! # Pipeline Configuration
//!
//! Layered configuration for channel names, store bounds, delivery
//! concurrency and the retry hook.
//!
//! ## Sources
//!
//! Later sources override earlier ones:
//!
//! 1. built-in defaults
//! 2. `config/dlq.toml`
//! 3. `config/dlq.{environment}.toml`
//! 4. `DLQ__`-prefixed environment variables, `__` between sections
//!    (`DLQ__CHANNELS__INPUT=orders`)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use order_dlq::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let input = &manager.config().channels.input;
//! let capacity = manager.config().stores.valid_message_capacity;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{channels, retry, stores};

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub channels: ChannelsConfig,
    pub stores: StoresConfig,
    pub consumers: ConsumersConfig,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelsConfig {
    /// Channel the ingest consumer subscribes to and replays publish onto
    pub input: String,
    /// Channel rejected messages are published to in an envelope
    pub dead_letter: String,
    /// Undelivered messages queued per subscriber before publishers wait
    pub buffer_capacity: usize,
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            input: channels::DEFAULT_INPUT_CHANNEL.to_string(),
            dead_letter: channels::DEFAULT_DEAD_LETTER_CHANNEL.to_string(),
            buffer_capacity: channels::DEFAULT_BUFFER_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoresConfig {
    pub valid_message_capacity: usize,
    /// Unbounded when absent
    pub dead_letter_capacity: Option<usize>,
}

impl Default for StoresConfig {
    fn default() -> Self {
        Self {
            valid_message_capacity: stores::VALID_MESSAGE_CAPACITY,
            dead_letter_capacity: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumersConfig {
    /// Deliveries handled at once per subscribed channel
    pub max_concurrent_deliveries: usize,
}

impl Default for ConsumersConfig {
    fn default() -> Self {
        Self {
            max_concurrent_deliveries: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub enabled: bool,
    pub interval_seconds: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: retry::DEFAULT_INTERVAL_SECONDS,
        }
    }
}

impl RetryConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

impl PipelineConfig {
    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.channels.input.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "channels.input",
                &self.channels.input,
                "channel name must not be empty",
            ));
        }

        if self.channels.dead_letter.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "channels.dead_letter",
                &self.channels.dead_letter,
                "channel name must not be empty",
            ));
        }

        if self.channels.input == self.channels.dead_letter {
            return Err(ConfigurationError::validation_error(format!(
                "input and dead-letter channels must differ (both are '{}')",
                self.channels.input
            )));
        }

        if self.channels.buffer_capacity == 0 {
            return Err(ConfigurationError::invalid_value(
                "channels.buffer_capacity",
                0,
                "must be greater than 0",
            ));
        }

        if self.stores.valid_message_capacity == 0 {
            return Err(ConfigurationError::invalid_value(
                "stores.valid_message_capacity",
                0,
                "must be greater than 0",
            ));
        }

        if self.stores.dead_letter_capacity == Some(0) {
            return Err(ConfigurationError::invalid_value(
                "stores.dead_letter_capacity",
                0,
                "must be greater than 0 when set",
            ));
        }

        if self.consumers.max_concurrent_deliveries == 0 {
            return Err(ConfigurationError::invalid_value(
                "consumers.max_concurrent_deliveries",
                0,
                "must be greater than 0",
            ));
        }

        if self.retry.interval_seconds == 0 {
            return Err(ConfigurationError::invalid_value(
                "retry.interval_seconds",
                0,
                "must be greater than 0",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.channels.input, "input-topic");
        assert_eq!(config.channels.dead_letter, "dlq-topic");
        assert_eq!(config.stores.valid_message_capacity, 200);
        assert_eq!(config.stores.dead_letter_capacity, None);
        assert_eq!(config.retry.interval(), Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_identical_channels_rejected() {
        let mut config = PipelineConfig::default();
        config.channels.dead_letter = config.channels.input.clone();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigurationError::ValidationError { .. }));
    }

    #[test]
    fn test_zero_values_rejected() {
        let mut config = PipelineConfig::default();
        config.consumers.max_concurrent_deliveries = 0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.stores.dead_letter_capacity = Some(0);
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.retry.interval_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config: PipelineConfig = from_json(r#"{"channels": {"input": "orders"}}"#);
        assert_eq!(config.channels.input, "orders");
        assert_eq!(config.channels.dead_letter, "dlq-topic");
        assert!(config.retry.enabled);
    }

    fn from_json(json: &str) -> PipelineConfig {
        serde_json::from_str(json).unwrap()
    }
}

//! Configuration Error Types
//!
//! Errors raised while loading, merging and validating pipeline configuration.

use thiserror::Error;

/// Configuration-related errors with detailed context
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A layered source could not be read or merged
    #[error("Failed to load configuration from '{source_description}': {error}")]
    LoadError {
        source_description: String,
        error: String,
    },

    /// Merged sources did not deserialize into the expected shape
    #[error("Parse error for configuration in '{config_directory}': {reason}")]
    ParseError {
        config_directory: String,
        reason: String,
    },

    /// Invalid configuration value
    #[error("Invalid value '{value}' for field '{field}': {context}")]
    InvalidValue {
        field: String,
        value: String,
        context: String,
    },

    /// Cross-field validation failure
    #[error("Configuration validation failed: {error}")]
    ValidationError { error: String },
}

impl ConfigurationError {
    pub fn load_error<S: Into<String>, E: std::fmt::Display>(source_description: S, error: E) -> Self {
        Self::LoadError {
            source_description: source_description.into(),
            error: error.to_string(),
        }
    }

    pub fn parse_error<D: Into<String>, E: std::fmt::Display>(config_directory: D, reason: E) -> Self {
        Self::ParseError {
            config_directory: config_directory.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value<F: Into<String>, V: ToString, C: Into<String>>(
        field: F,
        value: V,
        context: C,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.to_string(),
            context: context.into(),
        }
    }

    pub fn validation_error<E: Into<String>>(error: E) -> Self {
        Self::ValidationError {
            error: error.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigurationError>;

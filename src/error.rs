//! Error types for the dead-letter pipeline.
//!
//! Classification failures are not errors: they are converted into dead-letter
//! envelopes by the consumers. The types here cover the operator surface,
//! configuration and transport.

use crate::config::ConfigurationError;
use crate::messaging::MessagingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DlqError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Messaging error: {0}")]
    Messaging(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<MessagingError> for DlqError {
    fn from(error: MessagingError) -> Self {
        DlqError::Messaging(error.to_string())
    }
}

impl From<ConfigurationError> for DlqError {
    fn from(error: ConfigurationError) -> Self {
        DlqError::Configuration(error.to_string())
    }
}

impl From<std::io::Error> for DlqError {
    fn from(error: std::io::Error) -> Self {
        DlqError::Io(error.to_string())
    }
}

impl From<serde_json::Error> for DlqError {
    fn from(error: serde_json::Error) -> Self {
        DlqError::Serialization(format!("JSON serialization error: {error}"))
    }
}

pub type DlqResult<T> = Result<T, DlqError>;

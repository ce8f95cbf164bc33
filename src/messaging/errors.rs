//! # Messaging Error Types
//!
//! Structured transport errors using thiserror instead of
//! `Box<dyn Error>` patterns.

use thiserror::Error;

/// Transport-level error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MessagingError {
    #[error("Channel not found: {channel}")]
    ChannelNotFound { channel: String },

    #[error("Transport unavailable: {provider}: {message}")]
    Unavailable { provider: String, message: String },

    #[error("Publish failed: {channel}: {message}")]
    PublishFailed { channel: String, message: String },

    #[error("Subscription failed: {channel}: {message}")]
    SubscriptionFailed { channel: String, message: String },

    #[error("Message serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal messaging error: {message}")]
    Internal { message: String },
}

impl MessagingError {
    /// Create a channel not found error
    pub fn channel_not_found(channel: impl Into<String>) -> Self {
        Self::ChannelNotFound {
            channel: channel.into(),
        }
    }

    /// Create a transport unavailable error
    pub fn unavailable(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unavailable {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a publish failure error
    pub fn publish_failed(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PublishFailed {
            channel: channel.into(),
            message: message.into(),
        }
    }

    /// Create a subscription failure error
    pub fn subscription_failed(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SubscriptionFailed {
            channel: channel.into(),
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Short label for metrics and structured logs
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::ChannelNotFound { .. } => "channel_not_found",
            Self::Unavailable { .. } => "unavailable",
            Self::PublishFailed { .. } => "publish_failed",
            Self::SubscriptionFailed { .. } => "subscription_failed",
            Self::Serialization { .. } => "serialization_error",
            Self::Internal { .. } => "internal",
        }
    }
}

impl From<serde_json::Error> for MessagingError {
    fn from(err: serde_json::Error) -> Self {
        MessagingError::serialization(err.to_string())
    }
}

/// Result type alias for messaging operations
pub type MessagingResult<T> = Result<T, MessagingError>;

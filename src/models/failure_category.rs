//! # Failure Category
//!
//! Closed classification of why a message was dead-lettered.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Why a message ended up on the dead-letter channel
///
/// - `ValidationError`: a declared business rule failed on a structurally valid payload
/// - `MalformedError`: the payload could not be parsed into the expected shape,
///   carried fields outside the schema, or a dead-letter envelope failed to decode
/// - `UnknownError`: decode-time fallback when no category could be determined;
///   never assigned by the validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCategory {
    ValidationError,
    MalformedError,
    UnknownError,
}

impl FailureCategory {
    pub const ALL: [FailureCategory; 3] = [
        FailureCategory::ValidationError,
        FailureCategory::MalformedError,
        FailureCategory::UnknownError,
    ];

    /// Canonical wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCategory::ValidationError => "VALIDATION_ERROR",
            FailureCategory::MalformedError => "MALFORMED_ERROR",
            FailureCategory::UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// Human-readable name used in logs and dashboards
    pub fn display_name(&self) -> &'static str {
        match self {
            FailureCategory::ValidationError => "ValidationError",
            FailureCategory::MalformedError => "MalformedError",
            FailureCategory::UnknownError => "UnknownError",
        }
    }

    /// Tolerant lookup used when decoding envelopes.
    ///
    /// Matches case-insensitively after turning spaces into underscores, and
    /// also accepts the display names. Anything else is `UnknownError`.
    pub fn from_token(token: &str) -> Self {
        token.parse().unwrap_or(FailureCategory::UnknownError)
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for FailureCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(' ', "_");

        FailureCategory::ALL
            .into_iter()
            .find(|category| {
                normalized == category.as_str()
                    || normalized == category.display_name().to_uppercase()
            })
            .ok_or_else(|| format!("Unknown failure category: {s}"))
    }
}

//! # Dead-Letter Envelope Codec
//!
//! Wire format shared with every service that publishes to or reads from the
//! dead-letter channel:
//!
//! ```text
//! { "reason": string, "originalMessage": string, "category": "VALIDATION_ERROR" | "MALFORMED_ERROR" | "UNKNOWN_ERROR" }
//! ```
//!
//! `originalMessage` is always carried as an opaque JSON string so the
//! envelope parses even when the payload itself is not JSON.
//!
//! Both directions are infallible. Encoding falls back to a hand-escaped
//! template, and decoding degrades through three tiers so that a malformed
//! envelope is still recorded rather than dropped.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::constants::reasons;
use crate::models::FailureCategory;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireEnvelope<'a> {
    reason: &'a str,
    original_message: &'a str,
    category: FailureCategory,
}

/// Result of decoding a dead-letter envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEnvelope {
    pub reason: String,
    pub original_message: String,
    pub category: FailureCategory,
}

/// Encode a dead-letter envelope
pub fn encode(reason: &str, original_message: &str, category: FailureCategory) -> String {
    let envelope = WireEnvelope {
        reason,
        original_message,
        category,
    };

    match serde_json::to_string(&envelope) {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, "Envelope serialization failed, using escaped template");
            fallback_envelope(reason, original_message, category)
        }
    }
}

/// Decode a dead-letter envelope; never fails
pub fn decode(raw: &str) -> DecodedEnvelope {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "Dead-letter payload is not JSON");
            return DecodedEnvelope {
                reason: reasons::PARSE_ERROR.to_string(),
                original_message: raw.to_string(),
                category: FailureCategory::MalformedError,
            };
        }
    };

    match (value.get("reason"), value.get("originalMessage")) {
        (Some(reason), Some(original_message)) => {
            let category = value
                .get("category")
                .map(|token| FailureCategory::from_token(&value_as_text(token)))
                .unwrap_or(FailureCategory::UnknownError);

            DecodedEnvelope {
                reason: value_as_text(reason),
                original_message: value_as_text(original_message),
                category,
            }
        }
        // Legacy or plain message
        _ => DecodedEnvelope {
            reason: reasons::UNKNOWN.to_string(),
            original_message: raw.to_string(),
            category: FailureCategory::UnknownError,
        },
    }
}

/// String values verbatim, anything else in compact JSON form
fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn fallback_envelope(reason: &str, original_message: &str, category: FailureCategory) -> String {
    format!(
        r#"{{"reason":"{}","originalMessage":"{}","category":"{}"}}"#,
        escape_json_string(reason),
        escape_json_string(original_message),
        category.as_str()
    )
}

fn escape_json_string(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if (c as u32) < 0x20 => escaped.push_str(&format!("\\u{:04x}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped
}

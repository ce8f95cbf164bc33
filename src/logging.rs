//! # Tracing Module
//!
//! Environment-aware console logging using the tracing ecosystem. Logs go to
//! stdout; set `LOG_FORMAT=json` for one JSON object per line.
//!
//! ## Configuration
//!
//! ```bash
//! # Environment (drives the default level)
//! export DLQ_ENV=production
//!
//! # Explicit level or filter directive, checked in this order
//! export LOG_LEVEL=info
//! export RUST_LOG=order_dlq=debug
//!
//! # Structured output for log shippers
//! export LOG_FORMAT=json
//! ```
//!
//! ## Structured Logging Macros
//!
//! `log_ingest!` and `log_dead_letter!` attach an `operation` field, a
//! `component` field and an RFC 3339 timestamp to every event. Extra fields
//! are recorded with their `Display` form, so values must implement it:
//!
//! ```rust
//! use order_dlq::{log_dead_letter, log_ingest};
//!
//! log_ingest!(info, "MESSAGE_ACCEPTED", order_id: "o1");
//! log_dead_letter!(warn, "REPLAY_NOT_FOUND", id: "9b2e...");
//! ```

use std::io::IsTerminal;
use std::sync::OnceLock;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize console logging
///
/// Safe to call more than once and safe to call when another global
/// subscriber is already installed; neither case panics.
pub fn init_tracing() {
    TRACING_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment);
        let json_output = use_json_format();
        let use_ansi = !json_output && IsTerminal::is_terminal(&std::io::stdout());

        let console_layer = (!json_output).then(|| {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(use_ansi)
        });

        let json_layer = json_output.then(|| {
            fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_current_span(false)
        });

        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new(&log_level))
            .with(console_layer)
            .with(json_layer);

        if subscriber.try_init().is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        } else {
            tracing::info!(
                environment = %environment,
                log_level = %log_level,
                json = json_output,
                ansi_colors = use_ansi,
                "Console logging initialized"
            );
        }
    });
}

/// Current environment from `DLQ_ENV`, then `APP_ENV`, else `development`
pub fn get_environment() -> String {
    std::env::var("DLQ_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Filter directive from `LOG_LEVEL`, then `RUST_LOG`, else the
/// environment default
pub fn get_log_level(environment: &str) -> String {
    std::env::var("LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_log_level(environment).to_string())
}

fn default_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

fn use_json_format() -> bool {
    std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Ingest-path structured logging
///
/// # Examples
///
/// ```rust
/// use order_dlq::log_ingest;
///
/// log_ingest!(debug, "MESSAGE_RECEIVED");
/// log_ingest!(info, "MESSAGE_REJECTED", category: "MALFORMED_ERROR", reason: "Malformed JSON: ...");
/// ```
#[macro_export]
macro_rules! log_ingest {
    ($level:ident, $operation:expr $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            component = "ingest",
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "{}", $operation
        );
    };
    ($level:ident, $operation:expr, $($key:ident: $value:expr),+ $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            component = "ingest",
            $($key = %$value,)*
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "{}", $operation
        );
    };
}

/// Dead-letter side structured logging: receipt, replay, clear
///
/// # Examples
///
/// ```rust
/// use order_dlq::log_dead_letter;
///
/// log_dead_letter!(info, "CLEARED", removed: 3);
/// ```
#[macro_export]
macro_rules! log_dead_letter {
    ($level:ident, $operation:expr $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            component = "dead_letter",
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "{}", $operation
        );
    };
    ($level:ident, $operation:expr, $($key:ident: $value:expr),+ $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            component = "dead_letter",
            $($key = %$value,)*
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "{}", $operation
        );
    };
}

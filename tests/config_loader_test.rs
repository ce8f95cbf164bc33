//! Layered configuration loading: base file, environment overlay and
//! `DLQ__` variable overrides.

use std::fs;

use order_dlq::config::{ConfigManager, ConfigurationError, PipelineConfig};
use tempfile::TempDir;

fn overrides(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
    Some(
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect(),
    )
}

fn write(dir: &TempDir, name: &str, contents: &str) {
    fs::write(dir.path().join(name), contents).unwrap();
}

#[test]
fn test_empty_directory_yields_defaults() {
    let dir = TempDir::new().unwrap();

    let manager =
        ConfigManager::load_with_overrides(Some(dir.path().to_path_buf()), "test", overrides(&[]))
            .unwrap();

    assert_eq!(manager.config(), &PipelineConfig::default());
    assert_eq!(manager.environment(), "test");
    assert_eq!(manager.config_directory(), dir.path());
}

#[test]
fn test_environment_overlay_overrides_base() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "dlq.toml",
        r#"
[channels]
input = "orders"
dead_letter = "orders-dlq"

[stores]
valid_message_capacity = 50
"#,
    );
    write(
        &dir,
        "dlq.production.toml",
        r#"
[stores]
dead_letter_capacity = 10000

[retry]
interval_seconds = 60
"#,
    );

    let manager = ConfigManager::load_with_overrides(
        Some(dir.path().to_path_buf()),
        "production",
        overrides(&[]),
    )
    .unwrap();
    let config = manager.config();

    assert_eq!(config.channels.input, "orders");
    assert_eq!(config.channels.dead_letter, "orders-dlq");
    assert_eq!(config.stores.valid_message_capacity, 50);
    assert_eq!(config.stores.dead_letter_capacity, Some(10000));
    assert_eq!(config.retry.interval_seconds, 60);
    assert!(config.retry.enabled);

    // Other environments ignore the production overlay
    let development = ConfigManager::load_with_overrides(
        Some(dir.path().to_path_buf()),
        "development",
        overrides(&[]),
    )
    .unwrap();
    assert_eq!(development.config().stores.dead_letter_capacity, None);
}

#[test]
fn test_environment_variables_override_files() {
    let dir = TempDir::new().unwrap();
    write(&dir, "dlq.toml", "[channels]\ninput = \"orders\"\n");

    let manager = ConfigManager::load_with_overrides(
        Some(dir.path().to_path_buf()),
        "test",
        overrides(&[
            ("DLQ__CHANNELS__INPUT", "orders-override"),
            ("DLQ__CONSUMERS__MAX_CONCURRENT_DELIVERIES", "16"),
            ("DLQ__RETRY__ENABLED", "false"),
        ]),
    )
    .unwrap();
    let config = manager.config();

    assert_eq!(config.channels.input, "orders-override");
    assert_eq!(config.consumers.max_concurrent_deliveries, 16);
    assert!(!config.retry.enabled);
}

#[test]
fn test_invalid_merged_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "dlq.toml",
        "[channels]\ninput = \"same\"\ndead_letter = \"same\"\n",
    );

    let err = ConfigManager::load_with_overrides(Some(dir.path().to_path_buf()), "test", overrides(&[]))
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::ValidationError { .. }));
}

#[test]
fn test_malformed_toml_is_a_load_error() {
    let dir = TempDir::new().unwrap();
    write(&dir, "dlq.toml", "[channels\ninput = ");

    let err = ConfigManager::load_with_overrides(Some(dir.path().to_path_buf()), "test", overrides(&[]))
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::LoadError { .. }));
}

#[test]
fn test_wrong_type_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    write(&dir, "dlq.toml", "[stores]\nvalid_message_capacity = \"lots\"\n");

    let err = ConfigManager::load_with_overrides(Some(dir.path().to_path_buf()), "test", overrides(&[]))
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::ParseError { .. }));
}

#[test]
fn test_debug_config_renders_effective_values() {
    let dir = TempDir::new().unwrap();
    let manager =
        ConfigManager::load_with_overrides(Some(dir.path().to_path_buf()), "test", overrides(&[]))
            .unwrap();

    let rendered = manager.debug_config();
    assert_eq!(rendered["channels"]["input"], "input-topic");
    assert_eq!(rendered["stores"]["valid_message_capacity"], 200);
}

use formsync_core::config::*;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = FormSyncConfig::from_toml("").unwrap();

    assert_eq!(config.storage.client_db_path, "formsync-client.db");
    assert_eq!(config.storage.server_db_path, "formsync-server.db");
    assert!(config.storage.wal_mode);
    assert_eq!(config.storage.busy_timeout_ms, 5_000);
    assert_eq!(config.storage.read_pool_size, 4);

    assert_eq!(config.sync.timeout_ms, 30_000);
    assert_eq!(config.sync.max_retries, 2);
    assert!(config.sync.start_online);

    assert_eq!(config.server.max_batch_size, 500);

    assert_eq!(config.observability.log_level, "info");
    assert!(config.observability.json_logs);
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[storage]
client_db_path = "/data/client.db"

[sync]
base_url = "https://forms.example.org"
max_retries = 0
"#;
    let config = FormSyncConfig::from_toml(toml).unwrap();
    assert_eq!(config.storage.client_db_path, "/data/client.db");
    assert_eq!(config.sync.base_url, "https://forms.example.org");
    assert_eq!(config.sync.max_retries, 0);
    // Non-overridden fields keep defaults
    assert_eq!(config.storage.read_pool_size, 4);
    assert_eq!(config.sync.timeout().as_millis(), 30_000);
}

#[test]
fn config_rejects_malformed_toml() {
    let err = FormSyncConfig::from_toml("[sync\nbase_url = 1").unwrap_err();
    assert!(matches!(err, formsync_core::FormSyncError::ConfigError(_)));
}

#[test]
fn config_serde_roundtrip() {
    let config = FormSyncConfig::default();
    let toml_str = toml::to_string(&config).unwrap();
    let roundtripped = FormSyncConfig::from_toml(&toml_str).unwrap();
    assert_eq!(roundtripped.storage.client_db_path, config.storage.client_db_path);
    assert_eq!(roundtripped.sync.base_url, config.sync.base_url);
}

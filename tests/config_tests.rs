// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use codescan::Config;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.last_device_id, None);
    assert_eq!(config.user_agent_override, None);
}

#[test]
fn test_config_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let config = Config {
        last_device_id: Some("/dev/video2".to_string()),
        user_agent_override: Some("Mozilla/5.0 (Linux; Android 10)".to_string()),
    };
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Config::load_from(&dir.path().join("absent.json")).is_err());
}

#[test]
fn test_partial_config_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"last_device_id": "/dev/video0"}"#).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.last_device_id.as_deref(), Some("/dev/video0"));
    assert_eq!(loaded.user_agent_override, None);
}

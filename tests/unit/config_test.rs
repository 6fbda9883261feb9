//! Tests for configuration validation

use std::collections::HashMap;

use waitlist_admission::config::{EngineConfig, ResourceConfig, StoreConfig};

fn resource(capacity: u32) -> ResourceConfig {
    ResourceConfig {
        owner_id: "dev-1".to_string(),
        capacity,
        accepting_requests: true,
    }
}

#[test]
fn test_resource_config_validation() {
    assert!(resource(3).validate().is_ok());
    assert!(resource(0).validate().is_err());

    let mut ownerless = resource(3);
    ownerless.owner_id = "  ".into();
    assert!(ownerless.validate().is_err());
}

#[test]
fn test_engine_config_defaults_are_valid() {
    let config = EngineConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.store.lock_timeout_ms, 5_000);
}

#[test]
fn test_engine_config_invalid_lock_timeout() {
    let config = EngineConfig {
        store: StoreConfig { lock_timeout_ms: 0 },
        ..EngineConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_engine_config_invalid_metadata_limit() {
    let config = EngineConfig {
        max_metadata_bytes: 0,
        ..EngineConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_engine_config_reports_bad_resource() {
    let mut resources = HashMap::new();
    resources.insert("beta".to_string(), resource(0));
    let config = EngineConfig {
        resources,
        ..EngineConfig::default()
    };

    let err = config.validate().unwrap_err();
    assert!(err.contains("beta"), "{err}");
}

#[test]
fn test_engine_config_from_json() {
    let json = r#"{
        "resources": {
            "beta": { "owner_id": "dev-1", "capacity": 2 },
            "gamma": { "owner_id": "dev-2", "capacity": 5, "accepting_requests": false }
        },
        "store": { "lock_timeout_ms": 250 },
        "max_metadata_bytes": 1024
    }"#;

    let config = EngineConfig::from_json_str(json).unwrap();
    assert!(config.resources["beta"].accepting_requests);
    assert!(!config.resources["gamma"].accepting_requests);
    assert_eq!(config.store.lock_timeout().as_millis(), 250);
    assert_eq!(config.max_metadata_bytes, 1024);
    assert_eq!(config.audit_buffer, 1024);
}

#[test]
fn test_engine_config_from_json_rejects_zero_capacity() {
    let json = r#"{ "resources": { "beta": { "owner_id": "dev-1", "capacity": 0 } } }"#;
    assert!(EngineConfig::from_json_str(json).is_err());
    assert!(EngineConfig::from_json_str("not json").unwrap_err().starts_with("parse error"));
}

//! Tests for builder modules

use std::sync::Arc;

use waitlist_admission::builders::{build_engine, EngineBuilder};
use waitlist_admission::config::EngineConfig;
use waitlist_admission::core::{ErrorKind, InMemoryAuditSink, RequestStatus};
use waitlist_admission::util::ManualClock;

use crate::support::{config, tester_metadata, RESOURCE};

#[test]
fn test_engine_builder_defaults() {
    let builder = EngineBuilder::new(config(4));
    assert_eq!(builder.config().resources[RESOURCE].capacity, 4);
    assert!(builder.audit_log().is_some());
}

#[test]
fn test_engine_builder_without_audit_buffer() {
    let cfg = EngineConfig {
        audit_buffer: 0,
        ..config(1)
    };
    assert!(EngineBuilder::new(cfg).audit_log().is_none());
}

#[test]
fn test_custom_audit_sink_replaces_default_log() {
    let builder = EngineBuilder::new(config(1)).with_audit(Box::new(InMemoryAuditSink::new(8)));
    assert!(builder.audit_log().is_none());
    assert!(builder.build().is_ok());
}

#[test]
fn test_build_rejects_invalid_config() {
    let err = build_engine(&config(0)).err().expect("invalid config");
    assert_eq!(err.kind(), ErrorKind::ValidationError);
}

#[tokio::test]
async fn test_built_engine_uses_configured_clock() {
    let clock = Arc::new(ManualClock::new(42_000));
    let engine = EngineBuilder::new(config(1))
        .with_clock(clock)
        .build()
        .unwrap();

    let req = engine
        .submit(RESOURCE, "tester-a", tester_metadata())
        .await
        .unwrap();
    assert_eq!(req.status, RequestStatus::Approved);
    assert_eq!(req.submitted_at, 42_000);
    assert_eq!(req.admitted_at, Some(42_000));
}

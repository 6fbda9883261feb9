//! Tests for audit sink

use waitlist_admission::core::{
    build_audit_event, AuditAction, AuditSink, InMemoryAuditSink, SharedAuditLog,
};

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    let event = build_audit_event(1, "beta", "tester-a", AuditAction::Submitted, 1_000);
    sink.record(event.clone());
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0].event_id, event.event_id);
    assert_eq!(events[0].request_id, 1);
    assert_eq!(events[0].action, AuditAction::Submitted);
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event(1, "beta", "a", AuditAction::Submitted, 1_000));
    sink.record(build_audit_event(2, "beta", "b", AuditAction::Submitted, 1_000));
    sink.record(build_audit_event(3, "beta", "c", AuditAction::Submitted, 1_000));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].request_id, 2); // First one popped
    assert_eq!(events[1].request_id, 3);
}

#[test]
fn test_zero_capacity_sink_drops_everything() {
    let mut sink = InMemoryAuditSink::new(0);
    sink.record(build_audit_event(1, "beta", "a", AuditAction::Admitted, 1_000));
    assert!(sink.events().is_empty());
}

#[test]
fn test_build_audit_event() {
    let event = build_audit_event(7, "beta", "dev-1", AuditAction::Promoted, 1_000);

    assert_eq!(event.request_id, 7);
    assert_eq!(event.resource_id, "beta");
    assert_eq!(event.actor_id, "dev-1");
    assert_eq!(event.action, AuditAction::Promoted);
    assert_eq!(event.created_at_ms, 1_000);
    assert_ne!(
        event.event_id,
        build_audit_event(7, "beta", "dev-1", AuditAction::Promoted, 1_000).event_id
    );
}

#[test]
fn test_shared_log_clones_see_same_events() {
    let log = SharedAuditLog::new(4);
    let mut writer = log.clone();
    writer.record(build_audit_event(1, "beta", "a", AuditAction::Waitlisted, 1_000));
    assert_eq!(log.events().len(), 1);
}

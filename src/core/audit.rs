//! Audit sink implementations.
//!
//! Events are recorded after the unit of work that produced them commits.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::util::serde::{RequestId, Timestamp};

/// What happened to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Application received.
    Submitted,
    /// Seat granted at submission.
    Admitted,
    /// Queued at submission.
    Waitlisted,
    /// Approved by a decision.
    Approved,
    /// Rejected by a decision.
    Rejected,
    /// Moved from the waitlist into a freed seat.
    Promoted,
}

/// Audit event structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Related request identifier.
    pub request_id: RequestId,
    /// Resource identifier.
    pub resource_id: String,
    /// Requester or deciding actor.
    pub actor_id: String,
    /// Action taken.
    pub action: AuditAction,
    /// Timestamp milliseconds.
    pub created_at_ms: Timestamp,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events.min(1024)),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Cloneable handle to a bounded in-memory log, for reading events back
/// after handing the sink to an engine.
#[derive(Clone)]
pub struct SharedAuditLog {
    inner: Arc<Mutex<InMemoryAuditSink>>,
}

impl SharedAuditLog {
    /// Create a log retaining at most `max_events`.
    pub fn new(max_events: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(InMemoryAuditSink::new(max_events))),
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.inner.lock().events()
    }
}

impl AuditSink for SharedAuditLog {
    fn record(&mut self, event: AuditEvent) {
        self.inner.lock().record(event);
    }
}

/// Helper to build an audit event stamped at `created_at_ms`, taken from the
/// same clock that stamped the request rows.
pub fn build_audit_event(
    request_id: RequestId,
    resource_id: impl Into<String>,
    actor_id: impl Into<String>,
    action: AuditAction,
    created_at_ms: Timestamp,
) -> AuditEvent {
    AuditEvent {
        event_id: uuid::Uuid::new_v4().to_string(),
        request_id,
        resource_id: resource_id.into(),
        actor_id: actor_id.into(),
        action,
        created_at_ms,
    }
}

//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use waitlist_admission::builders::{EngineBuilder, InMemoryEngine};
use waitlist_admission::config::{EngineConfig, ResourceConfig};
use waitlist_admission::core::{AdmissionRequest, RequestStatus, SharedAuditLog};
use waitlist_admission::util::ManualClock;

pub const RESOURCE: &str = "beta-program";
pub const DEV: &str = "dev-1";

pub struct Harness {
    pub engine: InMemoryEngine,
    pub clock: Arc<ManualClock>,
    pub audit: SharedAuditLog,
}

impl Harness {
    /// Submit as `tester`, then move the clock forward so the next
    /// submission gets a later timestamp.
    pub async fn submit(&self, tester: &str) -> AdmissionRequest {
        let req = self
            .engine
            .submit(RESOURCE, tester, tester_metadata())
            .await
            .expect("submit");
        self.clock.advance(10);
        req
    }

    pub fn status_of(&self, id: u64) -> RequestStatus {
        self.engine
            .list_by_resource(RESOURCE)
            .expect("list")
            .into_iter()
            .find(|r| r.id == id)
            .expect("request exists")
            .status
    }

    pub fn count(&self, status: RequestStatus) -> usize {
        self.engine
            .list_by_resource(RESOURCE)
            .expect("list")
            .iter()
            .filter(|r| r.status == status)
            .count()
    }
}

pub fn config(capacity: u32) -> EngineConfig {
    let mut resources = HashMap::new();
    resources.insert(
        RESOURCE.to_string(),
        ResourceConfig {
            owner_id: DEV.to_string(),
            capacity,
            accepting_requests: true,
        },
    );
    EngineConfig {
        resources,
        ..EngineConfig::default()
    }
}

pub fn harness(capacity: u32) -> Harness {
    let clock = Arc::new(ManualClock::new(1_000));
    let builder = EngineBuilder::new(config(capacity)).with_clock(clock.clone());
    let audit = builder.audit_log().expect("default audit log");
    let engine = builder.build().expect("engine");
    Harness {
        engine,
        clock,
        audit,
    }
}

pub fn tester_metadata() -> serde_json::Value {
    serde_json::json!({ "device": "pixel-8", "os": "android-15" })
}

//! Admission engine: the façade tying resources, the request store and the
//! decision protocol together.
//!
//! Every call is an independent unit of work. The engine keeps no occupancy
//! state of its own; seat counts are always derived from the store's rows
//! inside the unit of work that acts on them.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::admission::{admit, validate_submission};
use crate::core::audit::{build_audit_event, AuditAction, AuditEvent, AuditSink};
use crate::core::decision::{apply_decision, authorize, DecisionOutcome};
use crate::core::request::{AdmissionRequest, Decision, RequestStatus};
use crate::core::resource::{CapacityResource, Occupancy, ResourceDirectory};
use crate::core::store::AdmissionStore;
use crate::core::AdmissionError;
use crate::util::clock::{Clock, SystemClock};
use crate::util::serde::RequestId;

/// Default upper bound on serialized metadata size.
pub const DEFAULT_MAX_METADATA_BYTES: usize = 4096;

/// Input limits enforced before touching the store.
#[derive(Debug, Clone)]
pub struct EngineLimits {
    /// Maximum serialized size of submission metadata.
    pub max_metadata_bytes: usize,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            max_metadata_bytes: DEFAULT_MAX_METADATA_BYTES,
        }
    }
}

/// Admission and waitlist promotion engine.
pub struct AdmissionEngine<S, D> {
    store: S,
    directory: D,
    clock: Arc<dyn Clock>,
    limits: EngineLimits,
    audit: Option<Arc<Mutex<Box<dyn AuditSink>>>>,
}

impl<S, D> AdmissionEngine<S, D>
where
    S: AdmissionStore,
    D: ResourceDirectory,
{
    /// Create an engine using the system clock and no audit sink.
    pub fn new(store: S, directory: D, limits: EngineLimits) -> Self {
        Self {
            store,
            directory,
            clock: Arc::new(SystemClock),
            limits,
            audit: None,
        }
    }

    /// Replace the clock used for `submitted_at` and `admitted_at`.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(Arc::new(Mutex::new(audit)));
        self
    }

    /// Underlying request store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Resource directory consulted on every operation.
    pub const fn directory(&self) -> &D {
        &self.directory
    }

    /// Submit an application. The request is created `APPROVED` when a seat
    /// is free and `WAITLISTED` otherwise.
    pub async fn submit(
        &self,
        resource_id: &str,
        requester_id: &str,
        metadata: serde_json::Value,
    ) -> Result<AdmissionRequest, AdmissionError> {
        validate_submission(
            resource_id,
            requester_id,
            &metadata,
            self.limits.max_metadata_bytes,
        )?;
        let resource = self.resolve(resource_id).await?;

        let clock = Arc::clone(&self.clock);
        let request = self
            .store
            .transaction(&resource.id, |uow| {
                admit(uow, &resource, requester_id, metadata, clock.now_ms())
            })
            .inspect_err(|e| {
                tracing::warn!(
                    "submission by {} to {} refused: {}",
                    requester_id,
                    resource_id,
                    e
                );
            })?;

        let action = if request.status == RequestStatus::Approved {
            tracing::info!("request {} admitted to {}", request.id, resource.id);
            AuditAction::Admitted
        } else {
            tracing::info!("request {} waitlisted on {}", request.id, resource.id);
            AuditAction::Waitlisted
        };
        let at = request.submitted_at;
        self.record_audit([
            build_audit_event(request.id, &resource.id, requester_id, AuditAction::Submitted, at),
            build_audit_event(request.id, &resource.id, requester_id, action, at),
        ]);
        Ok(request)
    }

    /// Approve or reject an existing application.
    pub async fn decide(
        &self,
        request_id: RequestId,
        decision: Decision,
        actor_id: &str,
    ) -> Result<AdmissionRequest, AdmissionError> {
        self.decide_with_outcome(request_id, decision, actor_id)
            .await
            .map(|outcome| outcome.request)
    }

    /// Like [`decide`](Self::decide), also reporting the previous status and
    /// any request promoted into a freed seat.
    pub async fn decide_with_outcome(
        &self,
        request_id: RequestId,
        decision: Decision,
        actor_id: &str,
    ) -> Result<DecisionOutcome, AdmissionError> {
        let resource_id = self
            .store
            .locate(request_id)?
            .ok_or_else(|| AdmissionError::NotFound(format!("request {request_id}")))?;
        let resource = self.resolve(&resource_id).await?;
        authorize(&resource, actor_id).inspect_err(|e| tracing::warn!("{}", e))?;

        let clock = Arc::clone(&self.clock);
        let (outcome, decided_at) = self.store.transaction(&resource.id, |uow| {
            let now = clock.now_ms();
            apply_decision(uow, request_id, decision, resource.capacity, now)
                .map(|outcome| (outcome, now))
        })?;

        let action = match decision {
            Decision::Approve => AuditAction::Approved,
            Decision::Reject => AuditAction::Rejected,
        };
        tracing::info!(
            "request {} on {} {} by {}",
            request_id,
            resource.id,
            outcome.request.status,
            actor_id
        );
        let mut events = vec![build_audit_event(
            request_id,
            &resource.id,
            actor_id,
            action,
            decided_at,
        )];
        if let Some(promoted) = &outcome.promoted {
            events.push(build_audit_event(
                promoted.id,
                &resource.id,
                &promoted.requester_id,
                AuditAction::Promoted,
                decided_at,
            ));
        }
        self.record_audit(events);
        Ok(outcome)
    }

    /// All applications submitted by a requester.
    pub fn list_by_requester(
        &self,
        requester_id: &str,
    ) -> Result<Vec<AdmissionRequest>, AdmissionError> {
        let rows = self.store.list_by_requester(requester_id)?;
        tracing::debug!("listed {} requests for requester {}", rows.len(), requester_id);
        Ok(rows)
    }

    /// All applications to a resource, in FIFO order.
    pub fn list_by_resource(
        &self,
        resource_id: &str,
    ) -> Result<Vec<AdmissionRequest>, AdmissionError> {
        let rows = self.store.list_by_resource(resource_id)?;
        tracing::debug!("listed {} requests for resource {}", rows.len(), resource_id);
        Ok(rows)
    }

    /// Seat usage of a resource, derived from its rows.
    pub async fn occupancy(&self, resource_id: &str) -> Result<Occupancy, AdmissionError> {
        let resource = self.resolve(resource_id).await?;
        let rows = self.store.list_by_resource(&resource.id)?;
        let count = |status: RequestStatus| {
            u32::try_from(rows.iter().filter(|r| r.status == status).count()).unwrap_or(u32::MAX)
        };
        Ok(Occupancy {
            capacity: resource.capacity,
            approved: count(RequestStatus::Approved),
            waitlisted: count(RequestStatus::Waitlisted),
        })
    }

    /// 1-based position of a `WAITLISTED` request in its resource's queue.
    /// `None` when the request is not waitlisted.
    pub fn waitlist_position(&self, request_id: RequestId) -> Result<Option<usize>, AdmissionError> {
        let resource_id = self
            .store
            .locate(request_id)?
            .ok_or_else(|| AdmissionError::NotFound(format!("request {request_id}")))?;
        let position = self
            .store
            .list_by_resource(&resource_id)?
            .iter()
            .filter(|r| r.status == RequestStatus::Waitlisted)
            .position(|r| r.id == request_id)
            .map(|idx| idx + 1);
        Ok(position)
    }

    async fn resolve(&self, resource_id: &str) -> Result<CapacityResource, AdmissionError> {
        let resource = self
            .directory
            .resolve(resource_id)
            .await?
            .ok_or_else(|| AdmissionError::NotFound(format!("resource `{resource_id}`")))?;
        resource
            .validate()
            .map_err(|e| AdmissionError::fatal(format!("directory returned invalid resource: {e}")))?;
        Ok(resource)
    }

    fn record_audit(&self, events: impl IntoIterator<Item = AuditEvent>) {
        if let Some(audit_sink) = &self.audit {
            let mut sink = audit_sink.lock();
            for event in events {
                sink.record(event);
            }
        }
    }
}

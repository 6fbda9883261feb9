//! Read-only view of capacity-limited resources.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::AdmissionError;
use crate::util::serde::{ActorId, ResourceId};

/// Snapshot of a bounded resource, supplied by the registration subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityResource {
    /// Resource identifier.
    pub id: ResourceId,
    /// Developer allowed to decide on applications.
    pub owner_id: ActorId,
    /// Number of seats. Always at least 1.
    pub capacity: u32,
    /// Whether new applications are accepted.
    pub accepting_requests: bool,
}

impl CapacityResource {
    /// Build a snapshot, rejecting a zero capacity.
    pub fn new(
        id: impl Into<ResourceId>,
        owner_id: impl Into<ActorId>,
        capacity: u32,
        accepting_requests: bool,
    ) -> Result<Self, AdmissionError> {
        let resource = Self {
            id: id.into(),
            owner_id: owner_id.into(),
            capacity,
            accepting_requests,
        };
        resource.validate()?;
        Ok(resource)
    }

    /// Check the snapshot invariants.
    pub fn validate(&self) -> Result<(), AdmissionError> {
        if self.id.trim().is_empty() {
            return Err(AdmissionError::Validation("resource id must not be empty".into()));
        }
        if self.capacity == 0 {
            return Err(AdmissionError::Validation(format!(
                "resource `{}` capacity must be at least 1",
                self.id
            )));
        }
        Ok(())
    }

    /// Whether `actor` may approve or reject applications for this resource.
    pub fn is_decided_by(&self, actor: &str) -> bool {
        self.owner_id == actor
    }
}

/// Seat usage derived from the request rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupancy {
    /// Total seats.
    pub capacity: u32,
    /// Seats held by `APPROVED` requests.
    pub approved: u32,
    /// Requests waiting for a seat.
    pub waitlisted: u32,
}

impl Occupancy {
    /// Free seats. Zero when full.
    pub const fn available(&self) -> u32 {
        self.capacity.saturating_sub(self.approved)
    }
}

/// Source of resource snapshots.
#[async_trait]
pub trait ResourceDirectory: Send + Sync {
    /// Look up a resource. `Ok(None)` when it does not exist.
    async fn resolve(&self, id: &str) -> Result<Option<CapacityResource>, AdmissionError>;
}

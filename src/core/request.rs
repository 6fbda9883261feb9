//! Admission request model and the status transition table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::AdmissionError;
use crate::util::serde::{RequestId, RequesterId, ResourceId, Timestamp};

/// Lifecycle status of an admission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    /// Awaiting manual review. Never produced by the admission path.
    Pending,
    /// Queued for a seat.
    Waitlisted,
    /// Occupies a seat.
    Approved,
    /// Terminal. Retained for audit.
    Rejected,
}

/// Allowed `(from, to)` pairs. Anything absent is an invalid transition.
const TRANSITIONS: &[(RequestStatus, RequestStatus)] = &[
    (RequestStatus::Pending, RequestStatus::Approved),
    (RequestStatus::Pending, RequestStatus::Rejected),
    (RequestStatus::Waitlisted, RequestStatus::Approved),
    (RequestStatus::Waitlisted, RequestStatus::Rejected),
    (RequestStatus::Approved, RequestStatus::Rejected),
];

impl RequestStatus {
    /// Wire literal for this status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Waitlisted => "WAITLISTED",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// No transitions leave a terminal status.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected)
    }

    /// Whether `self -> to` appears in the transition table.
    pub fn can_transition_to(self, to: Self) -> bool {
        TRANSITIONS.iter().any(|&(f, t)| f == self && t == to)
    }

    /// Whether `self -> to` releases an occupied seat.
    pub const fn frees_seat(self, to: Self) -> bool {
        matches!((self, to), (Self::Approved, Self::Rejected))
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = AdmissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "WAITLISTED" => Ok(Self::Waitlisted),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(AdmissionError::Validation(format!(
                "unrecognized status `{other}`"
            ))),
        }
    }
}

/// Outcome a developer may request for an existing application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Move the request to `APPROVED`.
    Approve,
    /// Move the request to `REJECTED`.
    Reject,
}

impl Decision {
    /// Target status of this decision.
    pub const fn target(self) -> RequestStatus {
        match self {
            Self::Approve => RequestStatus::Approved,
            Self::Reject => RequestStatus::Rejected,
        }
    }

    /// Parse a status literal as a decision. Missing literals and statuses
    /// that cannot be requested (`PENDING`, `WAITLISTED`) are validation errors.
    pub fn parse(literal: Option<&str>) -> Result<Self, AdmissionError> {
        let literal = literal
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AdmissionError::Validation("status is required".into()))?;
        match literal.parse::<RequestStatus>()? {
            RequestStatus::Approved => Ok(Self::Approve),
            RequestStatus::Rejected => Ok(Self::Reject),
            other => Err(AdmissionError::Validation(format!(
                "status `{other}` cannot be requested by a decision"
            ))),
        }
    }
}

/// A persisted application to join a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionRequest {
    /// Creation-ordered identifier.
    pub id: RequestId,
    /// Resource the requester applied to.
    pub resource_id: ResourceId,
    /// Tester who applied.
    pub requester_id: RequesterId,
    /// Current status.
    pub status: RequestStatus,
    /// Submission time; FIFO ordering key.
    pub submitted_at: Timestamp,
    /// Set iff `status == APPROVED`.
    pub admitted_at: Option<Timestamp>,
    /// Caller-supplied metadata, stored verbatim.
    pub metadata: serde_json::Value,
}

impl AdmissionRequest {
    /// Key used for FIFO ordering: submission time, then creation order.
    pub const fn fifo_key(&self) -> (Timestamp, RequestId) {
        (self.submitted_at, self.id)
    }

    /// Move to `to`, maintaining the `admitted_at` invariant.
    pub(crate) fn transition(&mut self, to: RequestStatus, now: Timestamp) {
        self.status = to;
        self.admitted_at = (to == RequestStatus::Approved).then_some(now);
    }
}

/// Row to insert; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewAdmissionRequest {
    /// Resource the requester applied to.
    pub resource_id: ResourceId,
    /// Tester who applied.
    pub requester_id: RequesterId,
    /// Status decided by the admission controller.
    pub status: RequestStatus,
    /// Submission time.
    pub submitted_at: Timestamp,
    /// Admission time when `status == APPROVED`.
    pub admitted_at: Option<Timestamp>,
    /// Caller-supplied metadata.
    pub metadata: serde_json::Value,
}

impl NewAdmissionRequest {
    /// Materialize the row with its assigned id.
    pub fn into_request(self, id: RequestId) -> AdmissionRequest {
        AdmissionRequest {
            id,
            resource_id: self.resource_id,
            requester_id: self.requester_id,
            status: self.status,
            submitted_at: self.submitted_at,
            admitted_at: self.admitted_at,
            metadata: self.metadata,
        }
    }
}

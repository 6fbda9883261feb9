//! Admission controller: decides `APPROVED` vs `WAITLISTED` at submission.

use crate::core::request::{AdmissionRequest, NewAdmissionRequest, RequestStatus};
use crate::core::resource::CapacityResource;
use crate::core::store::UnitOfWork;
use crate::core::AdmissionError;
use crate::util::serde::Timestamp;

/// Validate caller input before any store access.
pub fn validate_submission(
    resource_id: &str,
    requester_id: &str,
    metadata: &serde_json::Value,
    max_metadata_bytes: usize,
) -> Result<(), AdmissionError> {
    if resource_id.trim().is_empty() {
        return Err(AdmissionError::Validation("resource id must not be empty".into()));
    }
    if requester_id.trim().is_empty() {
        return Err(AdmissionError::Validation("requester id must not be empty".into()));
    }
    if !metadata.is_object() {
        return Err(AdmissionError::Validation("metadata must be a JSON object".into()));
    }
    let size = serde_json::to_vec(metadata)
        .map_err(|e| AdmissionError::Validation(format!("metadata not serializable: {e}")))?
        .len();
    if size > max_metadata_bytes {
        return Err(AdmissionError::Validation(format!(
            "metadata is {size} bytes, limit is {max_metadata_bytes}"
        )));
    }
    Ok(())
}

/// Count-then-insert. Must run inside the resource's unit of work.
pub fn admit(
    uow: &mut dyn UnitOfWork,
    resource: &CapacityResource,
    requester_id: &str,
    metadata: serde_json::Value,
    now: Timestamp,
) -> Result<AdmissionRequest, AdmissionError> {
    if !resource.accepting_requests {
        return Err(AdmissionError::CapacityState(format!(
            "resource `{}` is not accepting requests",
            resource.id
        )));
    }
    if let Some(existing) = uow.find_by_requester(requester_id)? {
        return Err(AdmissionError::Conflict(format!(
            "requester `{requester_id}` already applied to `{}` (request {})",
            resource.id, existing.id
        )));
    }

    let approved = uow.count_approved()?;
    let (status, admitted_at) = if approved < resource.capacity {
        (RequestStatus::Approved, Some(now))
    } else {
        (RequestStatus::Waitlisted, None)
    };

    let request = uow.insert(NewAdmissionRequest {
        resource_id: resource.id.clone(),
        requester_id: requester_id.to_string(),
        status,
        submitted_at: now,
        admitted_at,
        metadata,
    })?;
    tracing::debug!(
        "request {} on {}: {} ({} of {} seats were taken)",
        request.id,
        resource.id,
        status,
        approved,
        resource.capacity
    );
    Ok(request)
}

//! Decision transition validator for developer approve/reject actions.

use crate::core::promotion::promote_next;
use crate::core::request::{AdmissionRequest, Decision, RequestStatus};
use crate::core::resource::CapacityResource;
use crate::core::store::UnitOfWork;
use crate::core::AdmissionError;
use crate::util::serde::{RequestId, Timestamp};

/// Result of applying a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionOutcome {
    /// The decided request after the transition.
    pub request: AdmissionRequest,
    /// Status before the transition.
    pub previous: RequestStatus,
    /// Request promoted into the freed seat, if any.
    pub promoted: Option<AdmissionRequest>,
}

/// Check that `actor_id` may decide for `resource`.
pub fn authorize(resource: &CapacityResource, actor_id: &str) -> Result<(), AdmissionError> {
    if resource.is_decided_by(actor_id) {
        Ok(())
    } else {
        Err(AdmissionError::Authorization(format!(
            "actor `{actor_id}` may not decide for resource `{}`",
            resource.id
        )))
    }
}

/// Validate and apply `decision` to `request_id`, cascading into promotion
/// when a seat is freed. Must run inside the resource's unit of work.
pub fn apply_decision(
    uow: &mut dyn UnitOfWork,
    request_id: RequestId,
    decision: Decision,
    capacity: u32,
    now: Timestamp,
) -> Result<DecisionOutcome, AdmissionError> {
    let mut request = uow
        .get(request_id)?
        .ok_or_else(|| AdmissionError::NotFound(format!("request {request_id}")))?;

    let from = request.status;
    let to = decision.target();
    if !from.can_transition_to(to) {
        return Err(AdmissionError::InvalidTransition { from, to });
    }
    if to == RequestStatus::Approved {
        let approved = uow.count_approved()?;
        if approved >= capacity {
            return Err(AdmissionError::CapacityState(format!(
                "resource `{}` has no free seat ({approved} of {capacity} taken)",
                request.resource_id
            )));
        }
    }

    request.transition(to, now);
    uow.update(request.clone())?;
    tracing::debug!("request {} transitioned {} -> {}", request.id, from, to);

    let promoted = if from.frees_seat(to) {
        promote_next(uow, capacity, now)?
    } else {
        None
    };

    Ok(DecisionOutcome {
        request,
        previous: from,
        promoted,
    })
}

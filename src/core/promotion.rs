//! Waitlist promotion: fills a freed seat with the earliest queued request.

use crate::core::request::{AdmissionRequest, RequestStatus};
use crate::core::store::UnitOfWork;
use crate::core::AdmissionError;
use crate::util::serde::Timestamp;

/// Promote the `WAITLISTED` request with the smallest `(submitted_at, id)`.
///
/// Runs inside the unit of work that freed the seat. Promotes at most one
/// request and never past `capacity`. Any error aborts the enclosing unit of
/// work, including the status change that triggered the promotion.
pub fn promote_next(
    uow: &mut dyn UnitOfWork,
    capacity: u32,
    now: Timestamp,
) -> Result<Option<AdmissionRequest>, AdmissionError> {
    if uow.count_approved()? >= capacity {
        tracing::debug!("no free seat on {}, skipping promotion", uow.resource_id());
        return Ok(None);
    }
    let Some(mut next) = uow.earliest_waitlisted()? else {
        tracing::debug!("waitlist empty on {}", uow.resource_id());
        return Ok(None);
    };
    next.transition(RequestStatus::Approved, now);
    uow.update(next.clone())?;
    tracing::info!("promoted request {} on {}", next.id, next.resource_id);
    Ok(Some(next))
}

//! Persistence abstractions for admission requests.
//!
//! Every write goes through [`AdmissionStore::transaction`], which scopes a
//! [`UnitOfWork`] to a single resource. The store guarantees that units of
//! work on the same resource are serialized and that a unit of work whose
//! closure returns `Err` leaves no trace.

use crate::core::request::{AdmissionRequest, NewAdmissionRequest};
use crate::core::AdmissionError;
use crate::util::serde::{RequestId, ResourceId};

/// Transactional view of one resource's request rows.
///
/// Reads observe writes staged earlier in the same unit of work.
pub trait UnitOfWork {
    /// Resource this unit of work is scoped to.
    fn resource_id(&self) -> &str;

    /// Fetch a request of this resource by id.
    fn get(&self, id: RequestId) -> Result<Option<AdmissionRequest>, AdmissionError>;

    /// Existing request for the requester on this resource, in any status.
    fn find_by_requester(
        &self,
        requester_id: &str,
    ) -> Result<Option<AdmissionRequest>, AdmissionError>;

    /// Number of `APPROVED` rows.
    fn count_approved(&self) -> Result<u32, AdmissionError>;

    /// `WAITLISTED` row with the smallest `(submitted_at, id)`.
    fn earliest_waitlisted(&self) -> Result<Option<AdmissionRequest>, AdmissionError>;

    /// Insert a new row and assign its id. Fails with `Conflict` when the
    /// requester already has a row for this resource.
    fn insert(&mut self, row: NewAdmissionRequest) -> Result<AdmissionRequest, AdmissionError>;

    /// Replace an existing row.
    fn update(&mut self, row: AdmissionRequest) -> Result<(), AdmissionError>;
}

/// Store of admission requests with per-resource transactions.
pub trait AdmissionStore: Send + Sync {
    /// Run `work` as one atomic unit against `resource_id`'s rows.
    ///
    /// Blocks until the resource's isolation is acquired; a timeout is
    /// reported as a retryable [`AdmissionError::Internal`].
    fn transaction<T, F>(&self, resource_id: &str, work: F) -> Result<T, AdmissionError>
    where
        F: FnOnce(&mut dyn UnitOfWork) -> Result<T, AdmissionError>;

    /// Resource a request belongs to. Immutable once the request exists.
    fn locate(&self, request_id: RequestId) -> Result<Option<ResourceId>, AdmissionError>;

    /// Committed rows of a resource ordered by `(submitted_at, id)`.
    fn list_by_resource(&self, resource_id: &str) -> Result<Vec<AdmissionRequest>, AdmissionError>;

    /// Committed rows of a requester across resources ordered by `(submitted_at, id)`.
    fn list_by_requester(
        &self,
        requester_id: &str,
    ) -> Result<Vec<AdmissionRequest>, AdmissionError>;
}

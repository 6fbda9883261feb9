//! Identifier and timestamp types shared across the crate.

/// Admission request identifier. Assigned in creation order.
pub type RequestId = u64;

/// Identifier of a capacity-limited resource (a test program).
pub type ResourceId = String;

/// Identifier of the tester submitting a request.
pub type RequesterId = String;

/// Identifier of the actor deciding on a request.
pub type ActorId = String;

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

//! Core admission abstractions: request model, stores, and the decision protocol.

pub mod admission;
pub mod audit;
pub mod decision;
pub mod engine;
pub mod error;
pub mod promotion;
pub mod request;
pub mod resource;
pub mod store;

pub use audit::{
    build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink,
    SharedAuditLog,
};
pub use decision::DecisionOutcome;
pub use engine::{AdmissionEngine, EngineLimits, DEFAULT_MAX_METADATA_BYTES};
pub use error::{AdmissionError, AppResult, ErrorKind};
pub use request::{AdmissionRequest, Decision, NewAdmissionRequest, RequestStatus};
pub use resource::{CapacityResource, Occupancy, ResourceDirectory};
pub use store::{AdmissionStore, UnitOfWork};

//! API-facing request/response models.
//!
//! Every failure is reported as an [`ErrorResponse`] carrying a stable
//! `error_kind` code so callers can tell user errors from transient ones.

use serde::{Deserialize, Serialize};

use crate::core::{
    AdmissionEngine, AdmissionError, AdmissionRequest, AdmissionStore, Decision, ErrorKind,
    ResourceDirectory,
};
use crate::util::serde::RequestId;

/// Application submission payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitApplication {
    /// Target resource.
    pub resource_id: String,
    /// Applying tester, as resolved by the identity layer.
    pub requester_id: String,
    /// Free-form JSON object.
    #[serde(default = "empty_metadata")]
    pub metadata: serde_json::Value,
}

fn empty_metadata() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Decision payload. `status` is a raw literal validated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecideApplication {
    /// Request to decide on.
    pub request_id: RequestId,
    /// `APPROVED` or `REJECTED`.
    pub status: Option<String>,
    /// Deciding developer, as resolved by the identity layer.
    pub actor_id: String,
}

/// Structured failure payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable error classification.
    pub error_kind: ErrorKind,
    /// Human readable description.
    pub message: String,
    /// Whether re-running the call is safe and may succeed.
    pub retryable: bool,
}

impl From<AdmissionError> for ErrorResponse {
    fn from(err: AdmissionError) -> Self {
        Self {
            error_kind: err.kind(),
            retryable: err.is_retryable(),
            message: err.to_string(),
        }
    }
}

/// Submit an application.
pub async fn submit_application<S, D>(
    engine: &AdmissionEngine<S, D>,
    req: SubmitApplication,
) -> Result<AdmissionRequest, ErrorResponse>
where
    S: AdmissionStore,
    D: ResourceDirectory,
{
    engine
        .submit(&req.resource_id, &req.requester_id, req.metadata)
        .await
        .map_err(ErrorResponse::from)
}

/// Approve or reject an application.
pub async fn decide_application<S, D>(
    engine: &AdmissionEngine<S, D>,
    req: DecideApplication,
) -> Result<AdmissionRequest, ErrorResponse>
where
    S: AdmissionStore,
    D: ResourceDirectory,
{
    let decision = Decision::parse(req.status.as_deref())?;
    engine
        .decide(req.request_id, decision, &req.actor_id)
        .await
        .map_err(ErrorResponse::from)
}

/// Applications of a requester.
pub fn list_by_requester<S, D>(
    engine: &AdmissionEngine<S, D>,
    requester_id: &str,
) -> Result<Vec<AdmissionRequest>, ErrorResponse>
where
    S: AdmissionStore,
    D: ResourceDirectory,
{
    engine.list_by_requester(requester_id).map_err(ErrorResponse::from)
}

/// Applications to a resource.
pub fn list_by_resource<S, D>(
    engine: &AdmissionEngine<S, D>,
    resource_id: &str,
) -> Result<Vec<AdmissionRequest>, ErrorResponse>
where
    S: AdmissionStore,
    D: ResourceDirectory,
{
    engine.list_by_resource(resource_id).map_err(ErrorResponse::from)
}

//! Tests for error types

use waitlist_admission::core::{AdmissionError, ErrorKind, RequestStatus};

#[test]
fn test_validation_error() {
    let err = AdmissionError::Validation("metadata must be a JSON object".to_string());
    assert_eq!(format!("{}", err), "validation failed: metadata must be a JSON object");
    assert_eq!(err.kind(), ErrorKind::ValidationError);
}

#[test]
fn test_invalid_transition_error() {
    let err = AdmissionError::InvalidTransition {
        from: RequestStatus::Rejected,
        to: RequestStatus::Approved,
    };
    assert_eq!(format!("{}", err), "invalid transition: REJECTED -> APPROVED");
    assert_eq!(err.kind().code(), "INVALID_TRANSITION");
}

#[test]
fn test_only_transient_internal_errors_are_retryable() {
    assert!(AdmissionError::retryable("lock timeout").is_retryable());
    assert!(!AdmissionError::fatal("corrupt row").is_retryable());
    assert!(!AdmissionError::Conflict("dup".into()).is_retryable());
    assert_eq!(
        format!("{}", AdmissionError::retryable("lock timeout")),
        "internal error: lock timeout"
    );
}

#[test]
fn test_error_codes_are_distinct() {
    let errors = [
        AdmissionError::Validation(String::new()),
        AdmissionError::NotFound(String::new()),
        AdmissionError::Conflict(String::new()),
        AdmissionError::CapacityState(String::new()),
        AdmissionError::Authorization(String::new()),
        AdmissionError::InvalidTransition {
            from: RequestStatus::Pending,
            to: RequestStatus::Pending,
        },
        AdmissionError::fatal(""),
    ];
    let mut codes: Vec<_> = errors.iter().map(|e| e.kind().code()).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), errors.len());
}

#[test]
fn test_error_kind_serializes_as_code() {
    let json = serde_json::to_string(&ErrorKind::CapacityState).unwrap();
    assert_eq!(json, "\"CAPACITY_STATE\"");
    assert_eq!(ErrorKind::ValidationError.to_string(), "VALIDATION_ERROR");
}

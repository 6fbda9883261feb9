//! Tests for the API surface

use waitlist_admission::core::{ErrorKind, RequestStatus};
use waitlist_admission::runtime::{
    decide_application, list_by_requester, list_by_resource, submit_application,
    DecideApplication, ErrorResponse, SubmitApplication,
};

use crate::support::{harness, DEV, RESOURCE};

fn submission(tester: &str) -> SubmitApplication {
    SubmitApplication {
        resource_id: RESOURCE.to_string(),
        requester_id: tester.to_string(),
        metadata: serde_json::json!({}),
    }
}

#[tokio::test]
async fn test_submit_and_decide_round_trip() {
    let h = harness(1);

    let a = submit_application(&h.engine, submission("tester-a")).await.unwrap();
    let b = submit_application(&h.engine, submission("tester-b")).await.unwrap();
    assert_eq!(b.status, RequestStatus::Waitlisted);

    let rejected = decide_application(
        &h.engine,
        DecideApplication {
            request_id: a.id,
            status: Some("REJECTED".into()),
            actor_id: DEV.into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(rejected.status, RequestStatus::Rejected);

    let rows = list_by_resource(&h.engine, RESOURCE).unwrap();
    assert_eq!(rows[1].status, RequestStatus::Approved);
    assert_eq!(list_by_requester(&h.engine, "tester-b").unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_or_unknown_status_is_validation_error() {
    let h = harness(1);
    let a = submit_application(&h.engine, submission("tester-a")).await.unwrap();

    for status in [None, Some("maybe".to_string()), Some("WAITLISTED".to_string())] {
        let err = decide_application(
            &h.engine,
            DecideApplication {
                request_id: a.id,
                status,
                actor_id: DEV.into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.error_kind, ErrorKind::ValidationError);
        assert!(!err.retryable);
    }
}

#[tokio::test]
async fn test_error_response_payload() {
    let h = harness(1);
    submit_application(&h.engine, submission("tester-a")).await.unwrap();

    let err = submit_application(&h.engine, submission("tester-a"))
        .await
        .unwrap_err();
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["error_kind"], "CONFLICT");
    assert_eq!(json["retryable"], false);
    assert!(json["message"].as_str().unwrap().contains("tester-a"));
}

#[test]
fn test_submission_metadata_defaults_to_empty_object() {
    let req: SubmitApplication =
        serde_json::from_str(r#"{ "resource_id": "beta", "requester_id": "t" }"#).unwrap();
    assert_eq!(req.metadata, serde_json::json!({}));
}

#[test]
fn test_error_response_from_retryable_error() {
    let resp = ErrorResponse::from(waitlist_admission::core::AdmissionError::retryable("busy"));
    assert_eq!(resp.error_kind, ErrorKind::Internal);
    assert!(resp.retryable);
}

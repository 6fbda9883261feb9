//! Tests for the static resource directory

use waitlist_admission::core::{CapacityResource, ErrorKind, ResourceDirectory};
use waitlist_admission::infra::StaticResourceDirectory;

fn beta() -> CapacityResource {
    CapacityResource::new("beta", "dev-1", 2, true).unwrap()
}

#[test]
fn test_capacity_resource_rejects_zero_capacity() {
    let err = CapacityResource::new("beta", "dev-1", 0, true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);
}

#[test]
fn test_only_owner_decides() {
    let resource = beta();
    assert!(resource.is_decided_by("dev-1"));
    assert!(!resource.is_decided_by("dev-2"));
}

#[tokio::test]
async fn test_resolve_registered_resource() {
    let directory = StaticResourceDirectory::from_resources([beta()]).unwrap();
    assert_eq!(directory.resolve("beta").await.unwrap(), Some(beta()));
    assert_eq!(directory.resolve("gamma").await.unwrap(), None);
}

#[tokio::test]
async fn test_runtime_updates() {
    let directory = StaticResourceDirectory::new();
    directory.register(beta()).unwrap();

    directory.set_accepting("beta", false).unwrap();
    directory.set_capacity("beta", 9).unwrap();
    let resource = directory.resolve("beta").await.unwrap().unwrap();
    assert!(!resource.accepting_requests);
    assert_eq!(resource.capacity, 9);

    assert_eq!(
        directory.set_capacity("beta", 0).unwrap_err().kind(),
        ErrorKind::ValidationError
    );
    assert_eq!(
        directory.set_accepting("gamma", true).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

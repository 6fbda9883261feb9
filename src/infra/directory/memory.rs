//! In-memory resource directory seeded from configuration.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::core::resource::{CapacityResource, ResourceDirectory};
use crate::core::AdmissionError;
use crate::util::serde::ResourceId;

/// Resource snapshots held in process and updated by the registration side.
#[derive(Default)]
pub struct StaticResourceDirectory {
    resources: RwLock<HashMap<ResourceId, CapacityResource>>,
}

impl StaticResourceDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory holding `resources`.
    pub fn from_resources(
        resources: impl IntoIterator<Item = CapacityResource>,
    ) -> Result<Self, AdmissionError> {
        let directory = Self::new();
        for resource in resources {
            directory.register(resource)?;
        }
        Ok(directory)
    }

    /// Insert or replace a resource snapshot.
    pub fn register(&self, resource: CapacityResource) -> Result<(), AdmissionError> {
        resource.validate()?;
        tracing::debug!(
            "registered resource {} (capacity {}, accepting {})",
            resource.id,
            resource.capacity,
            resource.accepting_requests
        );
        self.resources.write().insert(resource.id.clone(), resource);
        Ok(())
    }

    /// Open or close a resource for new applications.
    pub fn set_accepting(&self, id: &str, accepting: bool) -> Result<(), AdmissionError> {
        self.modify(id, |r| {
            r.accepting_requests = accepting;
            Ok(())
        })
    }

    /// Change the number of seats. Existing approvals are left untouched.
    pub fn set_capacity(&self, id: &str, capacity: u32) -> Result<(), AdmissionError> {
        self.modify(id, |r| {
            if capacity == 0 {
                return Err(AdmissionError::Validation(format!(
                    "resource `{id}` capacity must be at least 1"
                )));
            }
            r.capacity = capacity;
            Ok(())
        })
    }

    fn modify(
        &self,
        id: &str,
        f: impl FnOnce(&mut CapacityResource) -> Result<(), AdmissionError>,
    ) -> Result<(), AdmissionError> {
        let mut resources = self.resources.write();
        let resource = resources
            .get_mut(id)
            .ok_or_else(|| AdmissionError::NotFound(format!("resource `{id}`")))?;
        f(resource)
    }
}

#[async_trait]
impl ResourceDirectory for StaticResourceDirectory {
    async fn resolve(&self, id: &str) -> Result<Option<CapacityResource>, AdmissionError> {
        Ok(self.resources.read().get(id).cloned())
    }
}

//! In-memory request store with per-resource serializable units of work.
//!
//! Rows are partitioned by resource. Each partition sits behind its own
//! `parking_lot::Mutex`, held for the whole unit of work, so count-then-write
//! sequences on one resource never interleave. Writes are staged inside the
//! unit of work and only applied when its closure returns `Ok`.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard, RwLock};

use crate::core::request::{AdmissionRequest, NewAdmissionRequest, RequestStatus};
use crate::core::store::{AdmissionStore, UnitOfWork};
use crate::core::AdmissionError;
use crate::util::serde::{RequestId, ResourceId};

/// How long a unit of work waits for its resource before giving up.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct Partition {
    /// Keyed by id, so iteration follows creation order.
    rows: BTreeMap<RequestId, AdmissionRequest>,
}

/// In-memory store for development, tests and single-process deployments.
pub struct InMemoryStore {
    partitions: RwLock<HashMap<ResourceId, Arc<Mutex<Partition>>>>,
    locations: RwLock<HashMap<RequestId, ResourceId>>,
    next_id: AtomicU64,
    lock_timeout: Duration,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_LOCK_TIMEOUT)
    }
}

impl InMemoryStore {
    /// Create an empty store whose units of work wait at most `lock_timeout`.
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            partitions: RwLock::new(HashMap::new()),
            locations: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            lock_timeout,
        }
    }

    /// Configured lock timeout.
    pub const fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }

    fn partition(&self, resource_id: &str) -> Arc<Mutex<Partition>> {
        if let Some(partition) = self.partitions.read().get(resource_id) {
            return Arc::clone(partition);
        }
        let mut partitions = self.partitions.write();
        Arc::clone(partitions.entry(resource_id.to_string()).or_default())
    }

    fn existing_partition(&self, resource_id: &str) -> Option<Arc<Mutex<Partition>>> {
        self.partitions.read().get(resource_id).map(Arc::clone)
    }

    fn lock<'a>(
        &self,
        partition: &'a Mutex<Partition>,
        resource_id: &str,
    ) -> Result<MutexGuard<'a, Partition>, AdmissionError> {
        partition.try_lock_for(self.lock_timeout).ok_or_else(|| {
            tracing::warn!(
                "timed out after {:?} waiting for resource {}",
                self.lock_timeout,
                resource_id
            );
            AdmissionError::retryable(format!(
                "timed out waiting for resource `{resource_id}`"
            ))
        })
    }
}

impl AdmissionStore for InMemoryStore {
    fn transaction<T, F>(&self, resource_id: &str, work: F) -> Result<T, AdmissionError>
    where
        F: FnOnce(&mut dyn UnitOfWork) -> Result<T, AdmissionError>,
    {
        let partition = self.partition(resource_id);
        let mut guard = self.lock(&partition, resource_id)?;

        let (out, staged) = {
            let mut tx = MemoryTransaction {
                resource_id,
                committed: &guard.rows,
                staged: BTreeMap::new(),
                next_id: &self.next_id,
            };
            // An error drops `tx` and everything staged in it.
            let out = work(&mut tx)?;
            (out, tx.staged)
        };

        if !staged.is_empty() {
            let mut locations = self.locations.write();
            for (id, row) in staged {
                locations
                    .entry(id)
                    .or_insert_with(|| row.resource_id.clone());
                guard.rows.insert(id, row);
            }
        }
        Ok(out)
    }

    fn locate(&self, request_id: RequestId) -> Result<Option<ResourceId>, AdmissionError> {
        Ok(self.locations.read().get(&request_id).cloned())
    }

    fn list_by_resource(&self, resource_id: &str) -> Result<Vec<AdmissionRequest>, AdmissionError> {
        let Some(partition) = self.existing_partition(resource_id) else {
            return Ok(Vec::new());
        };
        let guard = self.lock(&partition, resource_id)?;
        let mut rows: Vec<_> = guard.rows.values().cloned().collect();
        drop(guard);
        rows.sort_by_key(AdmissionRequest::fifo_key);
        Ok(rows)
    }

    fn list_by_requester(
        &self,
        requester_id: &str,
    ) -> Result<Vec<AdmissionRequest>, AdmissionError> {
        let partitions: Vec<(ResourceId, Arc<Mutex<Partition>>)> = self
            .partitions
            .read()
            .iter()
            .map(|(id, p)| (id.clone(), Arc::clone(p)))
            .collect();

        let mut rows = Vec::new();
        for (resource_id, partition) in partitions {
            let guard = self.lock(&partition, &resource_id)?;
            rows.extend(
                guard
                    .rows
                    .values()
                    .filter(|r| r.requester_id == requester_id)
                    .cloned(),
            );
        }
        rows.sort_by_key(AdmissionRequest::fifo_key);
        Ok(rows)
    }
}

struct MemoryTransaction<'a> {
    resource_id: &'a str,
    committed: &'a BTreeMap<RequestId, AdmissionRequest>,
    staged: BTreeMap<RequestId, AdmissionRequest>,
    next_id: &'a AtomicU64,
}

impl MemoryTransaction<'_> {
    /// Committed rows overlaid with staged writes.
    fn rows(&self) -> impl Iterator<Item = &AdmissionRequest> + '_ {
        self.committed
            .values()
            .filter(|r| !self.staged.contains_key(&r.id))
            .chain(self.staged.values())
    }
}

impl UnitOfWork for MemoryTransaction<'_> {
    fn resource_id(&self) -> &str {
        self.resource_id
    }

    fn get(&self, id: RequestId) -> Result<Option<AdmissionRequest>, AdmissionError> {
        Ok(self
            .staged
            .get(&id)
            .or_else(|| self.committed.get(&id))
            .cloned())
    }

    fn find_by_requester(
        &self,
        requester_id: &str,
    ) -> Result<Option<AdmissionRequest>, AdmissionError> {
        Ok(self.rows().find(|r| r.requester_id == requester_id).cloned())
    }

    fn count_approved(&self) -> Result<u32, AdmissionError> {
        let count = self
            .rows()
            .filter(|r| r.status == RequestStatus::Approved)
            .count();
        u32::try_from(count).map_err(|_| AdmissionError::fatal("approved count overflow"))
    }

    fn earliest_waitlisted(&self) -> Result<Option<AdmissionRequest>, AdmissionError> {
        Ok(self
            .rows()
            .filter(|r| r.status == RequestStatus::Waitlisted)
            .min_by_key(|r| r.fifo_key())
            .cloned())
    }

    fn insert(&mut self, row: NewAdmissionRequest) -> Result<AdmissionRequest, AdmissionError> {
        if row.resource_id != self.resource_id {
            return Err(AdmissionError::fatal(format!(
                "insert for `{}` inside unit of work for `{}`",
                row.resource_id, self.resource_id
            )));
        }
        if self.find_by_requester(&row.requester_id)?.is_some() {
            return Err(AdmissionError::Conflict(format!(
                "requester `{}` already applied to `{}`",
                row.requester_id, self.resource_id
            )));
        }
        let id = self.next_id.fetch_add(1, Ordering::AcqRel);
        let request = row.into_request(id);
        self.staged.insert(id, request.clone());
        Ok(request)
    }

    fn update(&mut self, row: AdmissionRequest) -> Result<(), AdmissionError> {
        let existing = self
            .get(row.id)?
            .ok_or_else(|| AdmissionError::NotFound(format!("request {}", row.id)))?;
        if existing.resource_id != row.resource_id
            || existing.requester_id != row.requester_id
            || existing.submitted_at != row.submitted_at
        {
            return Err(AdmissionError::fatal(format!(
                "request {} changed an immutable field",
                row.id
            )));
        }
        self.staged.insert(row.id, row);
        Ok(())
    }
}

use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::job::{ImageResult, Job, JobError, JobId, JobStatus};
use crate::models::request::JobRequest;

/// In-memory table of every job created during the life of the process.
///
/// All reads and writes go through one mutex that is held only for the map
/// access itself. Identifiers come from a separate atomic counter, and an
/// identifier is handed out only after its job is inserted, so a caller can
/// never observe an allocated id that is not yet fetchable.
///
/// Mutating an id that was never created is a caller bug and panics.
#[derive(Debug)]
pub struct JobRegistry {
    jobs: Mutex<HashMap<JobId, Job>>,
    next_id: AtomicU64,
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl JobRegistry {
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Store a new `ongoing` job and return its freshly allocated id.
    pub fn create_job(&self, request: JobRequest) -> JobId {
        let id = JobId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.table().insert(id, Job::new(id, request));
        id
    }

    /// Snapshot of the job's current state.
    pub fn fetch_job(&self, id: JobId) -> Result<Job, RegistryError> {
        self.table()
            .get(&id)
            .cloned()
            .ok_or(RegistryError::NotFound(id))
    }

    pub fn add_error(&self, id: JobId, store_id: &str, message: impl Into<String>) {
        self.mutate(id, |job| {
            job.errors.push(JobError {
                store_id: store_id.to_string(),
                error: message.into(),
            })
        });
    }

    pub fn add_result(&self, id: JobId, store_id: &str, image_url: &str, perimeter: u64) {
        self.mutate(id, |job| {
            job.results.push(ImageResult {
                store_id: store_id.to_string(),
                image_url: image_url.to_string(),
                perimeter,
            })
        });
    }

    /// Overwrite the job's status. Repeating the same transition is a no-op.
    pub fn set_status(&self, id: JobId, status: JobStatus) {
        self.mutate(id, |job| job.status = status);
    }

    pub fn fail_job(&self, id: JobId) {
        self.set_status(id, JobStatus::Failed);
    }

    pub fn complete_job(&self, id: JobId) {
        self.set_status(id, JobStatus::Completed);
    }

    /// Current status together with the errors recorded so far.
    pub fn job_status(&self, id: JobId) -> Result<(JobStatus, Vec<JobError>), RegistryError> {
        self.table()
            .get(&id)
            .map(|job| (job.status, job.errors.clone()))
            .ok_or(RegistryError::NotFound(id))
    }

    /// Number of jobs tracked. Jobs are never evicted.
    pub fn len(&self) -> usize {
        self.table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn mutate<F>(&self, id: JobId, f: F)
    where
        F: FnOnce(&mut Job),
    {
        let mut jobs = self.table();
        let job = jobs
            .get_mut(&id)
            .unwrap_or_else(|| panic!("job {id} mutated before it was created"));
        f(job);
        job.updated_at = Utc::now();
    }

    // Every critical section is a single insert, push or assignment, so a
    // poisoned table is still consistent.
    fn table(&self) -> MutexGuard<'_, HashMap<JobId, Job>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("job {0} not found")]
    NotFound(JobId),
}

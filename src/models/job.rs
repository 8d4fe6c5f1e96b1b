use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use strum::{Display, EnumString};

use crate::models::request::JobRequest;

/// Process-unique job identifier, allocated by the registry starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a job. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, EnumString, Display, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobStatus {
    Ongoing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::Ongoing)
    }
}

/// A per-item failure recorded against the store it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobError {
    pub store_id: String,
    pub error: String,
}

/// Metric computed for one successfully processed image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageResult {
    pub store_id: String,
    pub image_url: String,
    pub perimeter: u64,
}

/// A submitted batch of store visits and everything recorded while processing it.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub request: Arc<JobRequest>,
    pub status: JobStatus,
    pub errors: Vec<JobError>,
    pub results: Vec<ImageResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(id: JobId, request: JobRequest) -> Self {
        let now = Utc::now();
        Self {
            id,
            request: Arc::new(request),
            status: JobStatus::Ongoing,
            errors: Vec::new(),
            results: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

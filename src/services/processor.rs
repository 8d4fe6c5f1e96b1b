use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::models::job::{JobId, JobStatus};
use crate::models::request::Visit;
use crate::services::{
    catalog::StoreCatalog,
    fetch::{FetchError, ImageFetcher},
    imaging,
    registry::JobRegistry,
};

pub const DEFAULT_DELAY_MIN_MS: u64 = 100;
pub const DEFAULT_DELAY_MAX_MS: u64 = 400;

/// Pause applied after each successfully measured image, standing in for
/// the heavyweight analysis a real deployment would run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingDelay {
    /// Uniform over `[min_ms, max_ms]`, both inclusive.
    Uniform { min_ms: u64, max_ms: u64 },
    Fixed(Duration),
}

impl Default for ProcessingDelay {
    fn default() -> Self {
        Self::uniform_ms(DEFAULT_DELAY_MIN_MS, DEFAULT_DELAY_MAX_MS)
    }
}

impl ProcessingDelay {
    pub fn uniform_ms(min_ms: u64, max_ms: u64) -> Self {
        Self::Uniform { min_ms, max_ms }
    }

    pub fn none() -> Self {
        Self::Fixed(Duration::ZERO)
    }

    pub fn sample(&self) -> Duration {
        match *self {
            Self::Uniform { min_ms, max_ms } if max_ms > min_ms => {
                Duration::from_millis(rand::rng().random_range(min_ms..=max_ms))
            }
            Self::Uniform { min_ms, .. } => Duration::from_millis(min_ms),
            Self::Fixed(delay) => delay,
        }
    }
}

/// Why a visit or one of its images produced no result. The display text is
/// what gets recorded on the job.
#[derive(Debug, thiserror::Error)]
pub enum VisitError {
    #[error("Invalid store ID")]
    InvalidStore,

    #[error("No images provided for processing")]
    NoImages,

    #[error("Failed to download image")]
    Download(#[source] FetchError),

    #[error("Failed to process image")]
    Decode(#[source] image::ImageError),
}

/// Drives a job from `ongoing` to `completed` or `failed`.
///
/// Visits and their images are handled strictly in request order, so the
/// recorded errors and results keep that order. A failing item never stops
/// its siblings; it only makes the final status `failed`.
pub struct JobProcessor {
    registry: Arc<JobRegistry>,
    catalog: Arc<StoreCatalog>,
    fetcher: Arc<dyn ImageFetcher>,
    delay: ProcessingDelay,
}

impl JobProcessor {
    pub fn new(
        registry: Arc<JobRegistry>,
        catalog: Arc<StoreCatalog>,
        fetcher: Arc<dyn ImageFetcher>,
        delay: ProcessingDelay,
    ) -> Self {
        Self {
            registry,
            catalog,
            fetcher,
            delay,
        }
    }

    /// Run the job on its own detached task. Nothing waits for it; callers
    /// poll the registry for the outcome.
    pub fn spawn(self: &Arc<Self>, job_id: JobId) {
        let processor = Arc::clone(self);
        tokio::spawn(async move { processor.run(job_id).await });
    }

    pub async fn run(&self, job_id: JobId) {
        let started = Instant::now();

        let job = match self.registry.fetch_job(job_id) {
            Ok(job) => job,
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "Failed to fetch job");
                return;
            }
        };

        let mut failures = 0usize;

        for visit in &job.request.visits {
            tracing::info!(job_id = %job_id, store_id = %visit.store_id, "Processing visit");

            if let Err(e) = self.check_visit(visit) {
                self.record_error(job_id, &visit.store_id, &e);
                failures += 1;
                continue;
            }

            for image_url in &visit.image_urls {
                match self.process_image(job_id, image_url).await {
                    Ok(perimeter) => {
                        self.registry
                            .add_result(job_id, &visit.store_id, image_url, perimeter);
                        tracing::info!(
                            job_id = %job_id,
                            store_id = %visit.store_id,
                            image_url = %image_url,
                            perimeter,
                            "Image processed"
                        );
                    }
                    Err(e) => {
                        self.record_error(job_id, &visit.store_id, &e);
                        failures += 1;
                    }
                }
            }
        }

        let status = if failures > 0 {
            self.registry.fail_job(job_id);
            metrics::counter!("jobs_failed_total").increment(1);
            JobStatus::Failed
        } else {
            self.registry.complete_job(job_id);
            metrics::counter!("jobs_completed_total").increment(1);
            JobStatus::Completed
        };

        let elapsed = started.elapsed();
        metrics::histogram!("job_processing_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            job_id = %job_id,
            status = %status,
            failures,
            elapsed_ms = elapsed.as_millis() as u64,
            "Job finished"
        );
    }

    fn check_visit(&self, visit: &Visit) -> Result<(), VisitError> {
        if !self.catalog.contains(&visit.store_id) {
            return Err(VisitError::InvalidStore);
        }
        if visit.image_urls.is_empty() {
            return Err(VisitError::NoImages);
        }
        Ok(())
    }

    async fn process_image(&self, job_id: JobId, image_url: &str) -> Result<u64, VisitError> {
        tracing::debug!(job_id = %job_id, image_url = %image_url, "Downloading image");
        let bytes = self
            .fetcher
            .fetch(image_url)
            .await
            .map_err(VisitError::Download)?;

        let perimeter = imaging::perimeter(&bytes).map_err(VisitError::Decode)?;

        let delay = self.delay.sample();
        tracing::debug!(
            job_id = %job_id,
            delay_ms = delay.as_millis() as u64,
            "Simulating image analysis"
        );
        tokio::time::sleep(delay).await;

        Ok(perimeter)
    }

    fn record_error(&self, job_id: JobId, store_id: &str, error: &VisitError) {
        match std::error::Error::source(error) {
            Some(cause) => tracing::warn!(
                job_id = %job_id,
                store_id = %store_id,
                error = %error,
                cause = %cause,
                "Visit item failed"
            ),
            None => tracing::warn!(
                job_id = %job_id,
                store_id = %store_id,
                error = %error,
                "Visit item failed"
            ),
        }

        metrics::counter!("job_item_errors_total").increment(1);
        self.registry.add_error(job_id, store_id, error.to_string());
    }
}

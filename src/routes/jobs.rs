use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::models::job::{JobError, JobId, JobStatus};
use crate::models::request::JobRequest;
use crate::routes::ApiError;

/// Response after a job is accepted.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub job_id: JobId,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub jobid: Option<String>,
}

/// Response for querying job status. Errors are only present once failed.
#[derive(Debug, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub job_id: JobId,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Vec<JobError>>,
}

/// POST /api/submit/ — accept a batch of store visits for processing.
///
/// The body is decoded regardless of content type; any decode failure or a
/// `count` that disagrees with the visit list is a 400.
pub async fn submit_job(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let request: JobRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected undecodable job submission");
        ApiError::invalid_request()
    })?;

    if let Err(report) = request.validate() {
        tracing::debug!(error = %report, "Rejected invalid job submission");
        return Err(ApiError::invalid_request());
    }

    let visits = request.visits.len();
    let images = request.image_count();
    let job_id = state.registry.create_job(request);
    state.processor.spawn(job_id);

    metrics::counter!("jobs_submitted_total").increment(1);
    tracing::info!(job_id = %job_id, visits, images, "Job submitted");

    Ok((StatusCode::CREATED, Json(SubmitResponse { job_id })))
}

/// GET /api/status?jobid=N — current status of a job.
pub async fn get_job_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<JobStatusResponse>, ApiError> {
    let job_id = query
        .jobid
        .as_deref()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .map(JobId)
        .ok_or_else(|| ApiError::bad_request("Missing or malformed jobid"))?;

    let (status, errors) = state
        .registry
        .job_status(job_id)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    Ok(Json(JobStatusResponse {
        job_id,
        status,
        error: (status == JobStatus::Failed).then_some(errors),
    }))
}

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Describe the job metrics so they carry help text on the scrape endpoint.
pub fn describe_job_metrics() {
    metrics::describe_counter!("jobs_submitted_total", "Total jobs accepted for processing");
    metrics::describe_counter!("jobs_completed_total", "Jobs that finished without errors");
    metrics::describe_counter!("jobs_failed_total", "Jobs that finished with at least one error");
    metrics::describe_counter!(
        "job_item_errors_total",
        "Visits or images that produced an error instead of a result"
    );
    metrics::describe_histogram!(
        "job_processing_seconds",
        "Wall time from a job's first visit to its terminal status"
    );
}

/// GET /metrics — Prometheus text exposition format.
pub async fn prometheus_metrics(State(handle): State<Arc<PrometheusHandle>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
}

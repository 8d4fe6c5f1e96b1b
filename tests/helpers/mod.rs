//! Test helper utilities for API and E2E testing

#![allow(dead_code)]

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::sleep;

use store_visit_jobs::app_state::AppState;
use store_visit_jobs::models::job::JobId;
use store_visit_jobs::routes::{self, jobs::JobStatusResponse};
use store_visit_jobs::services::fetch::{FetchError, HttpImageFetcher, ImageFetcher};
use store_visit_jobs::services::processor::ProcessingDelay;

use crate::fixtures;

/// Fetcher for router-level tests: `.jpg` URLs return the 100x200 fixture,
/// everything else answers 404. Never touches the network.
pub struct FixtureFetcher;

#[async_trait]
impl ImageFetcher for FixtureFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if url.ends_with(".jpg") {
            Ok(fixtures::jpeg_100x200())
        } else {
            Err(FetchError::Status(StatusCode::NOT_FOUND))
        }
    }
}

pub fn fixture_state() -> AppState {
    AppState::new(
        fixtures::test_catalog(),
        Arc::new(FixtureFetcher),
        ProcessingDelay::none(),
    )
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });
    addr
}

/// Serve canned image responses on an ephemeral port and return its base URL.
///
/// - `/image.jpg` 100x200 JPEG
/// - `/small.png` 3x5 PNG
/// - `/broken` 500
/// - `/garbage` 200 with a non-image body
pub async fn spawn_image_server() -> String {
    let jpeg = fixtures::jpeg_100x200();
    let png = fixtures::png_3x5();

    let app = Router::new()
        .route("/image.jpg", get(move || async move { jpeg }))
        .route("/small.png", get(move || async move { png }))
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "server error") }),
        )
        .route("/garbage", get(|| async { "not-an-image" }));

    format!("http://{}", serve(app).await)
}

/// A URL on a port nothing listens on, so fetching it fails at the transport.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("listener has an address");
    drop(listener);
    format!("http://{}/image.jpg", addr)
}

/// HTTP client that ignores proxy environment variables, since every test
/// server listens on loopback.
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("build test client")
}

/// Start the full application with the real HTTP fetcher and return its
/// base URL together with the shared state.
pub async fn spawn_app(delay: ProcessingDelay) -> (String, AppState) {
    let state = AppState::new(
        fixtures::test_catalog(),
        Arc::new(HttpImageFetcher::with_client(test_client())),
        delay,
    );
    let addr = serve(routes::create_router(state.clone())).await;
    (format!("http://{}", addr), state)
}

/// Submit a job and return its id.
pub async fn submit_job(
    client: &reqwest::Client,
    base_url: &str,
    body: &serde_json::Value,
) -> Result<JobId, Box<dyn std::error::Error>> {
    let response = client
        .post(format!("{}/api/submit/", base_url))
        .json(body)
        .send()
        .await?;

    let status = response.status();
    if status != reqwest::StatusCode::CREATED {
        let error_text = response.text().await?;
        return Err(format!("Submit failed with status {}: {}", status, error_text).into());
    }

    let body: serde_json::Value = response.json().await?;
    let job_id = body["job_id"].as_u64().ok_or("No job_id in response")?;
    Ok(JobId(job_id))
}

pub async fn get_status(
    client: &reqwest::Client,
    base_url: &str,
    job_id: JobId,
) -> Result<JobStatusResponse, Box<dyn std::error::Error>> {
    let response = client
        .get(format!("{}/api/status?jobid={}", base_url, job_id))
        .send()
        .await?;

    if !response.status().is_success() {
        let error_text = response.text().await?;
        return Err(format!("Status check failed: {}", error_text).into());
    }

    Ok(response.json::<JobStatusResponse>().await?)
}

/// Poll job status until completed or failed (with timeout)
pub async fn poll_job_status(
    client: &reqwest::Client,
    base_url: &str,
    job_id: JobId,
    timeout_secs: u64,
) -> Result<JobStatusResponse, Box<dyn std::error::Error>> {
    let max_attempts = timeout_secs * 20; // Poll every 50ms

    for _ in 0..max_attempts {
        let status = get_status(client, base_url, job_id).await?;
        if status.status.is_terminal() {
            return Ok(status);
        }
        sleep(Duration::from_millis(50)).await;
    }

    Err(format!("Job {} did not finish within {} seconds", job_id, timeout_secs).into())
}

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    pub store_catalog: ComponentHealth,
    pub jobs_tracked: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: String,
    pub entries: usize,
}

/// GET /health — liveness plus a summary of in-memory state.
///
/// An empty store catalog still serves requests but rejects every visit, so
/// it is reported as degraded.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let stores = state.catalog.len();
    let catalog_ok = stores > 0;

    let status_code = if catalog_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        status: if catalog_ok { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            store_catalog: ComponentHealth {
                status: if catalog_ok { "ok" } else { "empty" }.to_string(),
                entries: stores,
            },
            jobs_tracked: state.registry.len(),
        },
    };

    (status_code, Json(response))
}

//! Health check HTTP route handlers
//!
//! Provides endpoints for checking the health of the API and its store:
//! - `GET /health` - Simple liveness check (returns 200 OK)
//! - `GET /health/live` - Kubernetes-style liveness probe
//! - `GET /health/ready` - Readiness check (pings the store)

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::repositories::Store;

/// Shared application state for health check handlers
#[derive(Clone)]
pub struct HealthState {
    /// Store checked by the readiness probe
    pub store: Arc<dyn Store>,
}

impl HealthState {
    /// Create new health state over a store
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

/// Readiness probe response body
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    /// Time the store took to answer, in milliseconds
    pub response_time_ms: u64,
    pub version: &'static str,
}

/// Create health check router
pub fn health_router(state: HealthState) -> Router {
    Router::new()
        .route("/", get(simple_health))
        .route("/live", get(liveness_probe))
        .route("/ready", get(readiness_probe))
        .with_state(state)
}

/// Simple health check - always returns OK if the server is running
async fn simple_health() -> &'static str {
    "OK"
}

/// Liveness probe for Kubernetes
///
/// This should NOT check external dependencies - that's what readiness is for.
async fn liveness_probe() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness probe - verifies the store answers
///
/// # Response
/// - 200 OK if the store is reachable
/// - 503 Service Unavailable otherwise
async fn readiness_probe(State(state): State<HealthState>) -> ApiResult<Json<ReadinessResponse>> {
    let start = Instant::now();
    state
        .store
        .ping()
        .await
        .map_err(ApiError::store_unavailable)?;

    Ok(Json(ReadinessResponse {
        status: "healthy",
        response_time_ms: start.elapsed().as_millis() as u64,
        version: env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_simple_health() {
        let response = simple_health().await;
        assert_eq!(response, "OK");
    }

    #[tokio::test]
    async fn test_liveness_probe() {
        let response = liveness_probe().await;
        let json = response.into_response();
        assert_eq!(json.status(), StatusCode::OK);
    }
}

//! Health check controller.

use crate::state::AppState;
use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use roster_core::HealthStatus;
use serde::Serialize;
use utoipa::ToSchema;

/// Health of a single dependency.
#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    /// Dependency name.
    pub name: String,
    /// `healthy`, `degraded` or `unhealthy`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Worst status among the dependencies.
    pub status: String,
    /// Application version.
    pub version: String,
    pub checks: Vec<ComponentHealth>,
}

fn status_code(overall: &HealthStatus) -> StatusCode {
    if overall.is_unhealthy() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}

/// Creates the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .route("/health/live", get(liveness_check))
}

async fn collect(state: &AppState) -> (HealthStatus, HealthResponse) {
    let mut overall = HealthStatus::Healthy;
    let mut checks = Vec::with_capacity(state.health_checks.len());

    for check in &state.health_checks {
        let status = check.check().await;
        checks.push(ComponentHealth {
            name: check.name().to_string(),
            status: status.label().to_string(),
            detail: status.detail().map(ToString::to_string),
        });

        if status.is_unhealthy() || (overall.is_healthy() && !status.is_healthy()) {
            overall = status;
        }
    }

    let report = HealthResponse {
        status: overall.label().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
    };
    (overall, report)
}

/// Health check endpoint.
///
/// A degraded cache still answers 200; an unreachable database answers 503.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy or degraded", body = HealthResponse),
        (status = 503, description = "A required dependency is down", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (overall, report) = collect(&state).await;
    (status_code(&overall), Json(report))
}

/// Readiness check endpoint.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Service is not ready")
    )
)]
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let (overall, _) = collect(&state).await;
    status_code(&overall)
}

/// Liveness check endpoint.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses(
        (status = 200, description = "Service is alive")
    )
)]
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}

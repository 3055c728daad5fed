//! Application state for Axum handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use roster_core::HealthCheck;
use roster_service::UserService;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Creates a new application state with no health checks or metrics.
    pub fn new(user_service: Arc<dyn UserService>) -> Self {
        Self {
            user_service,
            health_checks: Vec::new(),
            metrics: None,
        }
    }

    /// Adds a dependency reported by the health endpoints.
    #[must_use]
    pub fn with_health_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.health_checks.push(check);
        self
    }

    /// Enables the Prometheus endpoint.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

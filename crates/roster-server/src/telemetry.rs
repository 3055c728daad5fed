//! Logging, tracing and metrics setup.
//!
//! Structured logs go to stdout, pretty or JSON depending on
//! `observability.log_format`. With the `otlp` feature and
//! `observability.tracing_enabled`, spans are also exported over OTLP.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use roster_config::ObservabilityConfig;
use roster_core::{RosterError, RosterResult};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[cfg(feature = "otlp")]
use opentelemetry::{trace::TracerProvider as _, KeyValue};
#[cfg(feature = "otlp")]
use opentelemetry_otlp::WithExportConfig;
#[cfg(feature = "otlp")]
use opentelemetry_sdk::{
    runtime,
    trace::{RandomIdGenerator, Sampler},
    Resource,
};
#[cfg(feature = "otlp")]
use opentelemetry_semantic_conventions::resource::SERVICE_NAME;

/// Builds the log filter. `RUST_LOG` wins over the configured level.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},roster=debug,tower_http=debug")))
}

/// Installs the global tracing subscriber.
pub fn init_telemetry(config: &ObservabilityConfig) -> RosterResult<()> {
    let json = config.json_logs();

    #[cfg(feature = "otlp")]
    let otel_layer = if config.tracing_enabled {
        Some(tracing_opentelemetry::layer().with_tracer(otlp_tracer(config)?))
    } else {
        None
    };
    #[cfg(not(feature = "otlp"))]
    let otel_layer: Option<tracing_subscriber::layer::Identity> = None;

    tracing_subscriber::registry()
        .with(env_filter(&config.log_level))
        .with((!json).then(|| fmt::layer().with_target(true)))
        .with(json.then(|| fmt::layer().json().with_target(true)))
        .with(otel_layer)
        .try_init()
        .map_err(|e| RosterError::Internal(format!("Failed to init tracing: {e}")))?;

    #[cfg(not(feature = "otlp"))]
    if config.tracing_enabled {
        warn!("tracing_enabled is set but the binary was built without the otlp feature");
    }

    Ok(())
}

#[cfg(feature = "otlp")]
fn otlp_tracer(config: &ObservabilityConfig) -> RosterResult<opentelemetry_sdk::trace::Tracer> {
    let sampler = if config.sampling_ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if config.sampling_ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(config.sampling_ratio)
    };

    let resource = Resource::new(vec![KeyValue::new(
        SERVICE_NAME,
        config.service_name.clone(),
    )]);

    let mut exporter = opentelemetry_otlp::SpanExporter::builder().with_tonic();
    if let Some(endpoint) = &config.otlp_endpoint {
        exporter = exporter.with_endpoint(endpoint);
    }
    let exporter = exporter
        .build()
        .map_err(|e| RosterError::Internal(format!("Failed to create OTLP exporter: {e}")))?;

    let provider = opentelemetry_sdk::trace::TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_sampler(sampler)
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource)
        .build();

    let tracer = provider.tracer("roster");
    opentelemetry::global::set_tracer_provider(provider);
    Ok(tracer)
}

/// Flushes pending spans.
pub fn shutdown_telemetry() {
    #[cfg(feature = "otlp")]
    opentelemetry::global::shutdown_tracer_provider();
}

/// Installs the Prometheus recorder when metrics are enabled.
///
/// A recorder that cannot be installed disables the metrics route rather
/// than aborting startup.
pub fn init_metrics(config: &ObservabilityConfig) -> Option<PrometheusHandle> {
    if !config.metrics_enabled {
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            roster_service::metrics::register_metrics();
            info!("Prometheus metrics exposed at {}", config.metrics_path);
            Some(handle)
        }
        Err(e) => {
            warn!("Failed to install metrics recorder: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_defaults() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let filter = env_filter("warn").to_string();
        assert!(filter.contains("warn"));
        assert!(filter.contains("roster=debug"));
        assert!(filter.contains("tower_http=debug"));
    }

    #[test]
    fn test_metrics_disabled() {
        let config = ObservabilityConfig {
            metrics_enabled: false,
            ..ObservabilityConfig::default()
        };
        assert!(init_metrics(&config).is_none());
    }
}

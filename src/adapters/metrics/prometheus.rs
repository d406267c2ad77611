//! Prometheus Metrics Registry - Dashboard Observability
//!
//! Registers the service's metrics and serves them on a dedicated
//! listener for scraping. Covers request counts and latency per
//! endpoint plus dataset load outcomes.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use tokio::sync::broadcast;
use tracing::{info, instrument};

/// Centralized Prometheus metrics for the dashboard backend.
///
/// All metrics follow the naming convention `dashboard_*`.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// HTTP requests by route template and status code.
    pub http_requests: IntCounterVec,
    /// HTTP request latency by route template (seconds).
    pub http_request_duration: HistogramVec,
    /// Records currently in the store, as last reported by initialization.
    pub records_loaded: IntGauge,
    /// Initialization attempts by outcome (created, skipped, failed).
    pub initializations: IntCounterVec,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let http_requests = IntCounterVec::new(
            Opts::new("dashboard_http_requests_total", "Total HTTP requests served"),
            &["endpoint", "status"],
        )?;

        let http_request_duration = HistogramVec::new(
            HistogramOpts::new(
                "dashboard_http_request_duration_seconds",
                "HTTP request latency in seconds",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 1.0, 5.0]),
            &["endpoint"],
        )?;

        let records_loaded = IntGauge::new(
            "dashboard_records_loaded",
            "Records present in the store after the last initialization",
        )?;

        let initializations = IntCounterVec::new(
            Opts::new(
                "dashboard_initializations_total",
                "Dataset initialization attempts by outcome",
            ),
            &["outcome"],
        )?;

        registry.register(Box::new(http_requests.clone()))?;
        registry.register(Box::new(http_request_duration.clone()))?;
        registry.register(Box::new(records_loaded.clone()))?;
        registry.register(Box::new(initializations.clone()))?;

        Ok(Self {
            registry,
            http_requests,
            http_request_duration,
            records_loaded,
            initializations,
        })
    }

    /// Record one served request.
    pub fn observe_request(&self, endpoint: &str, status: StatusCode, elapsed: Duration) {
        self.http_requests
            .with_label_values(&[endpoint, status.as_str()])
            .inc();
        self.http_request_duration
            .with_label_values(&[endpoint])
            .observe(elapsed.as_secs_f64());
    }

    /// Record an initialization outcome.
    pub fn observe_initialization(&self, outcome: &str, records: Option<u64>) {
        self.initializations.with_label_values(&[outcome]).inc();
        if let Some(records) = records {
            self.records_loaded
                .set(i64::try_from(records).unwrap_or(i64::MAX));
        }
    }

    /// Encode all metrics in the Prometheus text format.
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Serve Prometheus metrics on the configured bind address.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn serve(
        self: Arc<Self>,
        bind_address: String,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> anyhow::Result<()> {
        let metrics = Arc::clone(&self);

        let app = Router::new().route(
            "/metrics",
            get(move || {
                let metrics = Arc::clone(&metrics);
                async move {
                    match metrics.render() {
                        Ok(body) => (StatusCode::OK, body),
                        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
                    }
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind(&bind_address).await?;
        info!(address = %bind_address, "Prometheus metrics server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }
}

//! Dashboard HTTP API
//!
//! axum router exposing the use cases as JSON over GET, plus health
//! probes. Every route is measured by the metrics middleware.
//!
//! Sub-modules:
//! - `handlers`: one handler per `/api/*` endpoint
//! - `health`: `/live` and `/ready` probes
//! - `types`: query-string and response types
//! - `error`: failure → `500 {"error": ...}` mapping

pub mod error;
pub mod handlers;
pub mod health;
pub mod types;

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::http::Method;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, instrument};

use crate::adapters::metrics::MetricsRegistry;
use crate::ports::source::DatasetSource;
use crate::ports::store::TransactionStore;
use crate::usecases::{AggregationEngine, DatasetLoader, QueryEngine};

pub use error::ApiError;

/// Shared handler state. Cheap to clone; everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub loader: Arc<DatasetLoader>,
    pub query: Arc<QueryEngine>,
    pub aggregation: Arc<AggregationEngine>,
    pub store: Arc<dyn TransactionStore>,
    pub metrics: Arc<MetricsRegistry>,
}

impl AppState {
    /// Wire the use cases over one store and one dataset source.
    pub fn new(
        store: Arc<dyn TransactionStore>,
        source: Arc<dyn DatasetSource>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            loader: Arc::new(DatasetLoader::new(Arc::clone(&store), source)),
            query: Arc::new(QueryEngine::new(Arc::clone(&store))),
            aggregation: Arc::new(AggregationEngine::new(Arc::clone(&store))),
            store,
            metrics,
        }
    }
}

/// Build the API router.
///
/// With `cors_permissive`, any origin may issue GET requests, which is
/// what a separately served single-page frontend needs.
pub fn router(state: AppState, cors_permissive: bool) -> Router {
    let metrics = Arc::clone(&state.metrics);

    let app = Router::new()
        .route("/api/initialize", get(handlers::initialize))
        .route("/api/transactions", get(handlers::list_transactions))
        .route("/api/statistics", get(handlers::statistics))
        .route("/api/bar-chart", get(handlers::bar_chart))
        .route("/api/pie-chart", get(handlers::pie_chart))
        .route("/api/combined-data", get(handlers::combined_data))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        .route_layer(middleware::from_fn_with_state(metrics, track_metrics))
        .with_state(state);

    if cors_permissive {
        app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET]),
        )
    } else {
        app
    }
}

/// Count and time every routed request by its route template.
///
/// Installed with `route_layer`, so only matched routes reach it.
async fn track_metrics(
    State(metrics): State<Arc<MetricsRegistry>>,
    matched_path: MatchedPath,
    request: Request,
    next: Next,
) -> Response {
    let endpoint = matched_path.as_str().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let elapsed = started.elapsed();
    debug!(
        endpoint = %endpoint,
        status = response.status().as_u16(),
        elapsed_ms = elapsed.as_millis() as u64,
        "Request served"
    );
    metrics.observe_request(&endpoint, response.status(), elapsed);
    response
}

/// HTTP server for the dashboard API.
pub struct ApiServer {
    /// Fully wired router.
    router: Router,
    /// Listen address, e.g. `0.0.0.0:5000`.
    bind_address: String,
}

impl ApiServer {
    /// Create a new API server.
    pub fn new(router: Router, bind_address: String) -> Self {
        Self {
            router,
            bind_address,
        }
    }

    /// Serve until the shutdown signal fires.
    #[instrument(skip(self, shutdown_rx), fields(address = %self.bind_address))]
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.bind_address).await?;
        info!(address = %self.bind_address, "API server started");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        info!("API server stopped");
        Ok(())
    }
}

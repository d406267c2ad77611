//! Transaction Dashboard - Entry Point
//!
//! Wires the SQLite store, the remote dataset source and the use cases
//! behind the HTTP API. Runs until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config (path from `DASHBOARD_CONFIG`) + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Open the SQLite store
//! 4. Create the HTTP dataset source
//! 5. Build loader, query and aggregation engines
//! 6. Optionally initialize the dataset before serving
//! 7. Spawn the Prometheus metrics server
//! 8. Serve the API until SIGINT → graceful shutdown

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use transaction_dashboard::adapters::http::{router, ApiServer, AppState};
use transaction_dashboard::adapters::metrics::MetricsRegistry;
use transaction_dashboard::adapters::source::HttpDatasetSource;
use transaction_dashboard::adapters::store::SqliteStore;
use transaction_dashboard::config;
use transaction_dashboard::ports::{DatasetSource, TransactionStore};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config_path = config::loader::config_path();
    let config = config::loader::load_config(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.app.log_level)),
        )
        .json()
        .init();

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path,
        "Starting transaction dashboard"
    );

    // ── 3. Shutdown signal channel ──────────────────────────
    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);

    // ── 4. Open the record store ────────────────────────────
    let store: Arc<dyn TransactionStore> = Arc::new(
        SqliteStore::open(&config.store.path, config.store.options())
            .context("Failed to open transaction store")?,
    );

    // ── 5. Create the dataset source ────────────────────────
    let source: Arc<dyn DatasetSource> = Arc::new(
        HttpDatasetSource::new(config.dataset.source_config())
            .context("Failed to create dataset source")?,
    );

    // ── 6. Build use cases ──────────────────────────────────
    let metrics = Arc::new(MetricsRegistry::new().context("Failed to register metrics")?);
    let state = AppState::new(store, source, Arc::clone(&metrics));

    // ── 7. Optional startup initialization ──────────────────
    if config.dataset.initialize_on_startup {
        match state.loader.initialize().await {
            Ok(outcome) => {
                let label = if outcome.created { "created" } else { "skipped" };
                metrics.observe_initialization(label, Some(outcome.count));
                info!(count = outcome.count, "{}", outcome.message());
            }
            Err(e) => {
                metrics.observe_initialization("failed", None);
                warn!(error = %e, "Startup initialization failed; /api/initialize can retry");
            }
        }
    }

    // ── 8. Spawn metrics server ─────────────────────────────
    let metrics_handle = if config.metrics.enabled {
        let metrics_shutdown = shutdown_tx.subscribe();
        let bind = config.metrics.bind_address.clone();
        let registry = Arc::clone(&metrics);
        Some(tokio::spawn(async move {
            if let Err(e) = registry.serve(bind, metrics_shutdown).await {
                error!(error = %e, "Metrics server failed");
            }
        }))
    } else {
        None
    };

    // ── 9. Spawn API server ─────────────────────────────────
    let app = router(state, config.server.cors_permissive);
    let api_shutdown = shutdown_tx.subscribe();
    let server = ApiServer::new(app, config.server.bind_address.clone());
    let mut api_handle = tokio::spawn(server.run(api_shutdown));

    info!(address = %config.server.bind_address, "Dashboard is serving");

    // ── 10. Wait for SIGINT or an API server exit ───────────
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("SIGINT received, initiating graceful shutdown");
        }
        result = &mut api_handle => {
            match result {
                Ok(Ok(())) => warn!("API server exited unexpectedly"),
                Ok(Err(e)) => error!(error = %e, "API server failed"),
                Err(e) => error!(error = %e, "API server task panicked"),
            }
        }
    }

    // ── Graceful shutdown ───────────────────────────────────
    let _ = shutdown_tx.send(());
    info!("Shutdown signal broadcast to all tasks");

    let _ = tokio::time::timeout(std::time::Duration::from_secs(10), async {
        if !api_handle.is_finished() {
            let _ = (&mut api_handle).await;
        }
        if let Some(handle) = metrics_handle {
            let _ = handle.await;
        }
    })
    .await;

    info!("Shutdown complete");
    Ok(())
}

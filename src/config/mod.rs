//! Configuration Module - TOML-based Service Configuration
//!
//! Loads and validates configuration from `config.toml`. Every field has
//! a default, so a partial file (or no file at all) yields a runnable
//! service listening on `0.0.0.0:5000`.

pub mod loader;

use std::time::Duration;

use serde::Deserialize;

use crate::adapters::source::{HttpSourceConfig, DEFAULT_DATASET_URL};
use crate::adapters::store::StoreOptions;

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// Service identity and logging.
  pub app: AppSection,
  /// API listener.
  pub server: ServerConfig,
  /// SQLite record store.
  pub store: StoreConfig,
  /// Remote dataset.
  pub dataset: DatasetConfig,
  /// Metrics and monitoring.
  pub metrics: MetricsConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSection {
  /// Human-readable service name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
  pub log_level: String,
}

/// API listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  /// API bind address.
  pub bind_address: String,
  /// Allow cross-origin GET requests from any origin.
  pub cors_permissive: bool,
}

/// Record store configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
  /// SQLite database file.
  pub path: String,
  /// Upper bound on a single store operation (milliseconds).
  pub query_timeout_ms: u64,
  /// SQLite busy timeout (milliseconds).
  pub busy_timeout_ms: u64,
}

/// Dataset source configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
  /// URL of the JSON dataset.
  pub url: String,
  /// Whole-request timeout in seconds.
  pub timeout_seconds: u64,
  /// Run an initialization before serving requests.
  pub initialize_on_startup: bool,
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
  /// Enable Prometheus metrics export.
  pub enabled: bool,
  /// Metrics server bind address.
  pub bind_address: String,
}

impl StoreConfig {
  /// Timeouts for the SQLite adapter.
  pub fn options(&self) -> StoreOptions {
    StoreOptions {
      query_timeout: Duration::from_millis(self.query_timeout_ms),
      busy_timeout: Duration::from_millis(self.busy_timeout_ms),
    }
  }
}

impl DatasetConfig {
  /// Settings for the HTTP dataset source.
  pub fn source_config(&self) -> HttpSourceConfig {
    HttpSourceConfig {
      url: self.url.clone(),
      timeout: Duration::from_secs(self.timeout_seconds),
    }
  }
}

impl Default for AppSection {
  fn default() -> Self {
    Self {
      name: default_name(),
      log_level: default_log_level(),
    }
  }
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind_address: default_server_addr(),
      cors_permissive: true,
    }
  }
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self {
      path: default_store_path(),
      query_timeout_ms: default_query_timeout(),
      busy_timeout_ms: default_busy_timeout(),
    }
  }
}

impl Default for DatasetConfig {
  fn default() -> Self {
    Self {
      url: DEFAULT_DATASET_URL.to_string(),
      timeout_seconds: default_timeout(),
      initialize_on_startup: true,
    }
  }
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      bind_address: default_metrics_addr(),
    }
  }
}

// Default value functions

fn default_name() -> String {
  "transaction-dashboard".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_server_addr() -> String {
  "0.0.0.0:5000".to_string()
}

fn default_store_path() -> String {
  "data/transactions.db".to_string()
}

fn default_query_timeout() -> u64 {
  5_000
}

fn default_busy_timeout() -> u64 {
  2_000
}

fn default_timeout() -> u64 {
  30
}

fn default_metrics_addr() -> String {
  "0.0.0.0:9090".to_string()
}

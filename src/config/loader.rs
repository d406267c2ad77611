//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::AppConfig;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "DASHBOARD_CONFIG";

/// Config file used when `DASHBOARD_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Resolve the config path from the environment.
pub fn config_path() -> String {
  std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

/// Load and validate configuration from a TOML file.
///
/// A missing file is not an error: defaults are used and a warning is
/// logged. An unreadable or malformed file is.
///
/// # Errors
/// Returns detailed error if:
/// - File exists but can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let config = if path.exists() {
    let content = std::fs::read_to_string(path)
      .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
      .with_context(|| format!("Failed to parse {}", path.display()))?
  } else {
    warn!(path = %path.display(), "Config file not found, using defaults");
    AppConfig::default()
  };

  validate_config(&config)?;

  info!(
    bind = %config.server.bind_address,
    store = %config.store.path,
    dataset = %config.dataset.url,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
  // Listeners
  config
    .server
    .bind_address
    .parse::<SocketAddr>()
    .with_context(|| format!("Invalid server bind_address: {}", config.server.bind_address))?;
  if config.metrics.enabled {
    config
      .metrics
      .bind_address
      .parse::<SocketAddr>()
      .with_context(|| format!("Invalid metrics bind_address: {}", config.metrics.bind_address))?;
  }

  // Store
  anyhow::ensure!(!config.store.path.is_empty(), "Store path must not be empty");
  anyhow::ensure!(
    config.store.query_timeout_ms > 0,
    "store.query_timeout_ms must be positive"
  );

  // Dataset
  anyhow::ensure!(!config.dataset.url.is_empty(), "Dataset URL must not be empty");
  anyhow::ensure!(
    config.dataset.url.starts_with("http://") || config.dataset.url.starts_with("https://"),
    "Dataset URL must be http(s), got {}",
    config.dataset.url
  );
  anyhow::ensure!(
    config.dataset.timeout_seconds > 0,
    "dataset.timeout_seconds must be positive"
  );

  Ok(())
}

//! HTTP Dataset Source - Static JSON Dataset over reqwest
//!
//! Fetches the product dataset (a single JSON array) from a fixed URL.
//! No retries: a failed fetch is reported and the caller may call
//! `/api/initialize` again.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, instrument, warn};

use crate::domain::transaction::RawTransaction;
use crate::ports::source::{DatasetSource, SourceError};

/// Published location of the product-transaction dataset.
pub const DEFAULT_DATASET_URL: &str =
  "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// Configuration for the HTTP dataset source.
#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
  /// Dataset URL.
  pub url: String,
  /// Whole-request timeout.
  pub timeout: Duration,
}

impl Default for HttpSourceConfig {
  fn default() -> Self {
    Self {
      url: DEFAULT_DATASET_URL.to_string(),
      timeout: Duration::from_secs(30),
    }
  }
}

/// Dataset source backed by a plain HTTP GET.
pub struct HttpDatasetSource {
  /// Underlying HTTP client.
  http: Client,
  /// Source configuration.
  config: HttpSourceConfig,
}

impl HttpDatasetSource {
  /// Create a new HTTP dataset source.
  pub fn new(config: HttpSourceConfig) -> Result<Self, SourceError> {
    let http = Client::builder()
      .timeout(config.timeout)
      .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| SourceError::Unavailable(format!("Failed to build HTTP client: {e}")))?;

    Ok(Self { http, config })
  }

  /// Dataset URL this source reads from.
  pub fn url(&self) -> &str {
    &self.config.url
  }
}

#[async_trait]
impl DatasetSource for HttpDatasetSource {
  #[instrument(skip(self), fields(url = %self.config.url))]
  async fn fetch(&self) -> Result<Vec<RawTransaction>, SourceError> {
    let response = self.http.get(&self.config.url).send().await.map_err(|e| {
      warn!(error = %e, "Dataset request failed");
      if e.is_timeout() {
        SourceError::Unavailable(format!(
          "request timed out after {}s",
          self.config.timeout.as_secs()
        ))
      } else {
        SourceError::Unavailable(e.to_string())
      }
    })?;

    let status = response.status();
    if !status.is_success() {
      warn!(status = %status, "Dataset source returned an error status");
      return Err(SourceError::Unavailable(format!("HTTP {status}")));
    }

    let items: Vec<RawTransaction> = response
      .json()
      .await
      .map_err(|e| SourceError::Decode(e.to_string()))?;

    info!(items = items.len(), "Dataset downloaded");
    Ok(items)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::StatusCode;
  use axum::routing::get;
  use axum::Router;

  const BODY: &str = r#"[
    {"id": 1, "title": "Backpack", "price": 109.95, "description": "Fits 15 laptops",
     "category": "men's clothing", "image": "https://example.test/1.jpg",
     "sold": false, "dateOfSale": "2021-11-27T20:29:54+05:30"},
    {"id": 2, "title": "T-Shirt", "price": 22.3, "description": "Slim fit",
     "category": "men's clothing", "image": "https://example.test/2.jpg",
     "sold": true, "dateOfSale": "2021-10-27T20:29:54+05:30"}
  ]"#;

  async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/dataset.json")
  }

  fn source(url: String) -> HttpDatasetSource {
    HttpDatasetSource::new(HttpSourceConfig {
      url,
      timeout: Duration::from_secs(5),
    })
    .unwrap()
  }

  #[tokio::test]
  async fn test_fetch_decodes_items() {
    let url = serve(Router::new().route("/dataset.json", get(|| async { BODY }))).await;
    let items = source(url).fetch().await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].title, "T-Shirt");
  }

  #[tokio::test]
  async fn test_error_status_is_unavailable() {
    let url = serve(Router::new().route(
      "/dataset.json",
      get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
    ))
    .await;
    let err = source(url).fetch().await.unwrap_err();
    assert!(matches!(err, SourceError::Unavailable(_)));
  }

  #[tokio::test]
  async fn test_malformed_body_is_decode_error() {
    let url = serve(Router::new().route("/dataset.json", get(|| async { "{\"not\": \"a list\"}" }))).await;
    let err = source(url).fetch().await.unwrap_err();
    assert!(matches!(err, SourceError::Decode(_)));
  }

  #[tokio::test]
  async fn test_unreachable_host_is_unavailable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let err = source(format!("http://{addr}/dataset.json")).fetch().await.unwrap_err();
    assert!(matches!(err, SourceError::Unavailable(_)));
  }
}

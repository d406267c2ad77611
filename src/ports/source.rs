//! Dataset Source Port - Remote Dataset Interface
//!
//! The dataset is a single static JSON array published by a third
//! party. The loader only needs "give me all items"; transport details
//! stay in the adapter.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::transaction::RawTransaction;

/// Failures fetching the remote dataset.
#[derive(Debug, Error)]
pub enum SourceError {
  /// Transport failure, timeout or non-success status.
  #[error("dataset source unavailable: {0}")]
  Unavailable(String),
  /// The response body was not the expected JSON array.
  #[error("dataset source returned an undecodable body: {0}")]
  Decode(String),
}

/// Trait for dataset providers.
#[async_trait]
pub trait DatasetSource: Send + Sync + 'static {
  /// Fetch every item of the dataset.
  async fn fetch(&self) -> Result<Vec<RawTransaction>, SourceError>;
}

//! Dataset Loader Use Case - One-time Store Population
//!
//! Populates the record store from the remote dataset exactly once.
//!
//! Initialization flow:
//! 1. Take the single-flight guard (concurrent calls queue here)
//! 2. If the store already holds records, stop (no fetch, no writes)
//! 3. Fetch the dataset and coerce every item to a `Transaction`
//! 4. Insert the whole batch atomically, only if the store is still empty

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::domain::transaction::{RecordError, Transaction};
use crate::ports::source::{DatasetSource, SourceError};
use crate::ports::store::{StoreError, TransactionStore};

/// Failures while initializing the store.
#[derive(Debug, Error)]
pub enum LoaderError {
  /// The remote dataset could not be fetched.
  #[error("failed to initialize database: {0}")]
  SourceUnavailable(#[from] SourceError),
  /// A dataset item could not be coerced into a record.
  #[error("failed to initialize database: {0}")]
  InvalidRecord(#[from] RecordError),
  /// The batch insert failed.
  #[error("failed to initialize database: {0}")]
  LoadFailure(StoreError),
  /// The emptiness check could not reach the store.
  #[error("failed to initialize database: {0}")]
  Store(StoreError),
}

/// Result of an initialization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitOutcome {
  /// Whether this call inserted the dataset.
  pub created: bool,
  /// Records inserted by this call, or already present when skipped.
  pub count: u64,
}

impl InitOutcome {
  /// Human-readable status for API responses.
  pub fn message(&self) -> String {
    if self.created {
      format!("Database initialized with {} records", self.count)
    } else {
      "Database already initialized".to_string()
    }
  }
}

/// Loads the remote dataset into the record store.
pub struct DatasetLoader {
  store: Arc<dyn TransactionStore>,
  source: Arc<dyn DatasetSource>,
  /// Serializes the check-fetch-insert sequence.
  single_flight: Mutex<()>,
}

impl DatasetLoader {
  /// Create a loader over a store and a dataset source.
  pub fn new(store: Arc<dyn TransactionStore>, source: Arc<dyn DatasetSource>) -> Self {
    Self {
      store,
      source,
      single_flight: Mutex::new(()),
    }
  }

  /// Populate the store unless it already holds records.
  ///
  /// Safe to call repeatedly and concurrently: at most one batch is
  /// ever inserted. A failed call leaves the store empty and may be
  /// retried.
  ///
  /// # Errors
  /// `SourceUnavailable` when the fetch fails, `InvalidRecord` when an
  /// item cannot be coerced, `LoadFailure` when the insert fails and
  /// `Store` when the store cannot be queried at all.
  #[instrument(skip(self))]
  pub async fn initialize(&self) -> Result<InitOutcome, LoaderError> {
    let _guard = self.single_flight.lock().await;

    let existing = self.store.count_all().await.map_err(LoaderError::Store)?;
    if existing > 0 {
      info!(count = existing, "Store already populated, skipping dataset load");
      return Ok(InitOutcome {
        created: false,
        count: existing,
      });
    }

    let raw = self.source.fetch().await?;
    info!(items = raw.len(), "Dataset fetched");

    let records = raw
      .into_iter()
      .map(Transaction::try_from)
      .collect::<Result<Vec<_>, _>>()?;

    match self
      .store
      .insert_if_empty(&records)
      .await
      .map_err(LoaderError::LoadFailure)?
    {
      Some(inserted) => {
        info!(count = inserted, "Dataset loaded into store");
        Ok(InitOutcome {
          created: true,
          count: inserted,
        })
      }
      None => {
        warn!("Store was populated by another writer during load");
        let count = self.store.count_all().await.map_err(LoaderError::Store)?;
        Ok(InitOutcome {
          created: false,
          count,
        })
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_messages() {
    let created = InitOutcome {
      created: true,
      count: 60,
    };
    let skipped = InitOutcome {
      created: false,
      count: 60,
    };
    assert_eq!(created.message(), "Database initialized with 60 records");
    assert_eq!(skipped.message(), "Database already initialized");
  }
}

//! Record Store Port - Transaction Persistence Interface
//!
//! Defines the trait the use cases need from the record store. The
//! store is write-once (bulk insert by the dataset loader) and read-only
//! for every serving path. Adapters translate `TransactionFilter` into
//! their own query language and must agree with
//! `TransactionFilter::matches`.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::query::TransactionFilter;
use crate::domain::stats::{CategoryCount, SaleStatistics};
use crate::domain::transaction::Transaction;

/// Failures surfaced by a record store.
#[derive(Debug, Error)]
pub enum StoreError {
  /// The store could not be reached (connection, lock, timeout).
  #[error("record store unavailable: {0}")]
  Unavailable(String),
  /// A read or aggregation failed.
  #[error("record store query failed: {0}")]
  Query(String),
  /// A write failed; the batch was not committed.
  #[error("record store write failed: {0}")]
  Write(String),
}

/// Trait for record store providers.
///
/// All reads take the same filter type, so listing, counting and
/// aggregation always agree on which records a month contains.
#[async_trait]
pub trait TransactionStore: Send + Sync + 'static {
  /// Total number of stored records, unfiltered.
  async fn count_all(&self) -> Result<u64, StoreError>;

  /// Insert a batch atomically, but only if the store is still empty.
  ///
  /// Returns `Some(inserted)` when the batch was written and `None`
  /// when another writer populated the store first.
  async fn insert_if_empty(&self, records: &[Transaction]) -> Result<Option<u64>, StoreError>;

  /// Matching records ordered by id, then insertion order.
  async fn find(
    &self,
    filter: &TransactionFilter,
    skip: u64,
    limit: u32,
  ) -> Result<Vec<Transaction>, StoreError>;

  /// Number of matching records.
  async fn count(&self, filter: &TransactionFilter) -> Result<u64, StoreError>;

  /// Sale totals over the matching records (all zero when none match).
  async fn summarize(&self, filter: &TransactionFilter) -> Result<SaleStatistics, StoreError>;

  /// Matching record counts grouped by category.
  async fn count_by_category(
    &self,
    filter: &TransactionFilter,
  ) -> Result<Vec<CategoryCount>, StoreError>;

  /// Check if the store answers queries.
  async fn is_healthy(&self) -> bool;
}

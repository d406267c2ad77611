//! Aggregation Engine - Statistics and Chart Data per Month
//!
//! Three independent read-only views over the month-filtered records:
//! - Statistics: sale total, sold and unsold counts
//! - Bar chart: record count per fixed price bucket
//! - Pie chart: record count per category
//!
//! Fan-out is structured: every sub-query is awaited, and the first
//! error fails the whole call.

use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::{debug, instrument};

use crate::domain::buckets::PRICE_BUCKETS;
use crate::domain::month::MonthFilter;
use crate::domain::query::TransactionFilter;
use crate::domain::stats::{BucketCount, CategoryCount, CombinedData, SaleStatistics};
use crate::ports::store::{StoreError, TransactionStore};

/// Computes dashboard aggregates.
pub struct AggregationEngine {
  store: Arc<dyn TransactionStore>,
}

impl AggregationEngine {
  /// Create an aggregation engine over a record store.
  pub fn new(store: Arc<dyn TransactionStore>) -> Self {
    Self { store }
  }

  /// Sale totals for the month; all zero when nothing matches.
  #[instrument(skip(self, month), fields(month = %month))]
  pub async fn statistics(&self, month: MonthFilter) -> Result<SaleStatistics, StoreError> {
    self.store.summarize(&TransactionFilter::for_month(month)).await
  }

  /// Record count per price bucket, in bucket declaration order.
  ///
  /// Each bucket is counted by its own store query; the ten queries
  /// run concurrently.
  #[instrument(skip(self, month), fields(month = %month))]
  pub async fn bar_chart(&self, month: MonthFilter) -> Result<Vec<BucketCount>, StoreError> {
    let base = TransactionFilter::for_month(month);

    let counts = try_join_all(PRICE_BUCKETS.iter().map(|bucket| {
      let filter = base.clone().with_price(bucket.range());
      let store = Arc::clone(&self.store);
      async move {
        let count = store.count(&filter).await?;
        Ok::<_, StoreError>(BucketCount {
          range: bucket.label(),
          count,
        })
      }
    }))
    .await?;

    debug!(buckets = counts.len(), "Computed bar chart");
    Ok(counts)
  }

  /// Record count per category.
  #[instrument(skip(self, month), fields(month = %month))]
  pub async fn pie_chart(&self, month: MonthFilter) -> Result<Vec<CategoryCount>, StoreError> {
    self
      .store
      .count_by_category(&TransactionFilter::for_month(month))
      .await
  }

  /// Statistics, bar chart and pie chart computed concurrently.
  ///
  /// No partial results: any failing view fails the call.
  #[instrument(skip(self, month), fields(month = %month))]
  pub async fn combined(&self, month: MonthFilter) -> Result<CombinedData, StoreError> {
    let (statistics, bar_chart, pie_chart) = tokio::try_join!(
      self.statistics(month),
      self.bar_chart(month),
      self.pie_chart(month),
    )?;

    Ok(CombinedData {
      statistics,
      bar_chart,
      pie_chart,
    })
  }
}

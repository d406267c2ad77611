//! Query Engine - Filtered, Paginated Transaction Listing

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::query::{ListQuery, Page};
use crate::domain::transaction::Transaction;
use crate::ports::store::{StoreError, TransactionStore};

/// Serves the transaction table.
pub struct QueryEngine {
  store: Arc<dyn TransactionStore>,
}

impl QueryEngine {
  /// Create a query engine over a record store.
  pub fn new(store: Arc<dyn TransactionStore>) -> Self {
    Self { store }
  }

  /// One page of month- and search-filtered records, with the
  /// pre-pagination total.
  ///
  /// The page read and the count run concurrently; either failing
  /// fails the call. A page past the end is empty but still reports
  /// the correct total.
  #[instrument(skip(self, query), fields(month = %query.month, page = query.page, per_page = query.per_page))]
  pub async fn list_transactions(&self, query: &ListQuery) -> Result<Page<Transaction>, StoreError> {
    let filter = query.filter();

    let (items, total) = tokio::try_join!(
      self.store.find(&filter, query.skip(), query.per_page),
      self.store.count(&filter),
    )?;

    debug!(returned = items.len(), total, "Listed transactions");
    Ok(Page::new(items, query.page, query.per_page, total))
  }
}

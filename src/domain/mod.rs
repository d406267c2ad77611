//! Domain layer - Records, filters and aggregate views.
//!
//! Pure types and predicates with no I/O (hexagonal architecture inner
//! ring). Store adapters translate these filters into their own query
//! language; the predicates here define what a match is.

pub mod buckets;
pub mod month;
pub mod query;
pub mod stats;
pub mod transaction;

// Re-export core types for convenience
pub use buckets::{bucket_for, PriceBucket, PRICE_BUCKETS};
pub use month::{month_index_of, MonthFilter};
pub use query::{ListQuery, Page, PriceRange, QueryError, SearchTerm, TransactionFilter};
pub use stats::{BucketCount, CategoryCount, CombinedData, SaleStatistics};
pub use transaction::{RawTransaction, RecordError, Transaction};

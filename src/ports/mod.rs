//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `TransactionStore`: record persistence, filtered reads and aggregations
//! - `DatasetSource`: the remote product dataset

pub mod source;
pub mod store;

pub use source::{DatasetSource, SourceError};
pub use store::{StoreError, TransactionStore};

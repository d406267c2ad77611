//! Record Store Adapters
//!
//! Implements the `TransactionStore` port on SQLite (bundled via
//! rusqlite). File-backed for the service, in-memory for tests.

pub mod sqlite;

pub use sqlite::{SqliteStore, StoreOptions};

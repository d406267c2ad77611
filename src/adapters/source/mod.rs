//! Dataset Source Adapters
//!
//! Implements the `DatasetSource` port over HTTP (reqwest, rustls).

pub mod http;

pub use http::{HttpDatasetSource, HttpSourceConfig, DEFAULT_DATASET_URL};

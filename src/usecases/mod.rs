//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain types with port interfaces to implement the
//! dashboard's operations. Each use case is stateless apart from the
//! shared store handle.
//!
//! Use cases:
//! - `DatasetLoader`: one-time, single-flight store population
//! - `QueryEngine`: filtered, paginated listing
//! - `AggregationEngine`: statistics, bar chart, pie chart, combined

pub mod aggregation;
pub mod dataset_loader;
pub mod query_engine;

pub use aggregation::AggregationEngine;
pub use dataset_loader::{DatasetLoader, InitOutcome, LoaderError};
pub use query_engine::QueryEngine;

//! Metrics Adapters
//!
//! Prometheus metrics export on a dedicated listener via axum 0.7.
//! Request metrics are fed by the API router's middleware.

pub mod prometheus;

pub use self::prometheus::MetricsRegistry;

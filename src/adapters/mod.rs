//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (SQLite, HTTP client) and exposes the use
//! cases over HTTP.
//!
//! Adapter categories:
//! - `http`: axum API router, handlers and health probes
//! - `metrics`: Prometheus metrics export
//! - `source`: remote dataset download over reqwest
//! - `store`: SQLite record store via rusqlite

pub mod http;
pub mod metrics;
pub mod source;
pub mod store;

//! API error responses.
//!
//! The dashboard contract reports every failure the same way: HTTP 500
//! with `{"error": "<message>"}`.

use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::domain::query::QueryError;
use crate::ports::store::StoreError;
use crate::usecases::dataset_loader::LoaderError;

/// Any failure surfaced by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The query string could not be decoded (e.g. a repeated parameter).
    #[error(transparent)]
    Rejection(#[from] QueryRejection),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Loader(#[from] LoaderError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        error!(error = %message, "Request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": message })),
        )
            .into_response()
    }
}

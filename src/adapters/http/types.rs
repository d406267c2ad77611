//! HTTP Request/Response Types
//!
//! Query-string parameters and JSON bodies of the dashboard API.
//! Field names follow the frontend's camelCase contract.

use serde::{Deserialize, Serialize};

use crate::domain::query::Page;
use crate::domain::transaction::Transaction;

/// `?month=` for the aggregate endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthParams {
    pub month: Option<String>,
}

/// Query string of `/api/transactions`.
///
/// Everything arrives as text and is validated by `ListQuery::parse`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub month: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

/// Body of `/api/initialize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResponse {
    pub message: String,
}

/// Body of `/api/transactions`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
    pub current_page: u32,
    pub total_pages: u64,
    pub total: u64,
}

impl From<Page<Transaction>> for TransactionsResponse {
    fn from(page: Page<Transaction>) -> Self {
        Self {
            transactions: page.items,
            current_page: page.page,
            total_pages: page.total_pages,
            total: page.total,
        }
    }
}

//! API Handlers - One per Dashboard Endpoint
//!
//! Each handler parses its query string into validated domain types,
//! calls a single use case and returns JSON. Failures become
//! [`ApiError`] responses.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use tracing::{info, instrument};

use super::error::ApiError;
use super::types::{InitializeResponse, ListParams, MonthParams, TransactionsResponse};
use super::AppState;
use crate::domain::month::MonthFilter;
use crate::domain::query::ListQuery;
use crate::domain::stats::{BucketCount, CategoryCount, CombinedData, SaleStatistics};

/// `GET /api/initialize`
#[instrument(skip(state))]
pub async fn initialize(State(state): State<AppState>) -> Result<Json<InitializeResponse>, ApiError> {
    match state.loader.initialize().await {
        Ok(outcome) => {
            let label = if outcome.created { "created" } else { "skipped" };
            state.metrics.observe_initialization(label, Some(outcome.count));
            info!(created = outcome.created, count = outcome.count, "Initialization finished");
            Ok(Json(InitializeResponse {
                message: outcome.message(),
            }))
        }
        Err(e) => {
            state.metrics.observe_initialization("failed", None);
            Err(e.into())
        }
    }
}

/// `GET /api/transactions?month=&search=&page=&perPage=`
#[instrument(skip(state, params))]
pub async fn list_transactions(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<TransactionsResponse>, ApiError> {
    let Query(params) = params?;
    let query = ListQuery::parse(
        params.month.as_deref(),
        params.search.as_deref(),
        params.page.as_deref(),
        params.per_page.as_deref(),
    )?;
    let page = state.query.list_transactions(&query).await?;
    Ok(Json(page.into()))
}

fn month_of(params: Result<Query<MonthParams>, QueryRejection>) -> Result<MonthFilter, ApiError> {
    let Query(params) = params?;
    Ok(MonthFilter::parse(params.month.as_deref()))
}

/// `GET /api/statistics?month=`
pub async fn statistics(
    State(state): State<AppState>,
    params: Result<Query<MonthParams>, QueryRejection>,
) -> Result<Json<SaleStatistics>, ApiError> {
    let month = month_of(params)?;
    Ok(Json(state.aggregation.statistics(month).await?))
}

/// `GET /api/bar-chart?month=`
pub async fn bar_chart(
    State(state): State<AppState>,
    params: Result<Query<MonthParams>, QueryRejection>,
) -> Result<Json<Vec<BucketCount>>, ApiError> {
    let month = month_of(params)?;
    Ok(Json(state.aggregation.bar_chart(month).await?))
}

/// `GET /api/pie-chart?month=`
pub async fn pie_chart(
    State(state): State<AppState>,
    params: Result<Query<MonthParams>, QueryRejection>,
) -> Result<Json<Vec<CategoryCount>>, ApiError> {
    let month = month_of(params)?;
    Ok(Json(state.aggregation.pie_chart(month).await?))
}

/// `GET /api/combined-data?month=`
pub async fn combined_data(
    State(state): State<AppState>,
    params: Result<Query<MonthParams>, QueryRejection>,
) -> Result<Json<CombinedData>, ApiError> {
    let month = month_of(params)?;
    Ok(Json(state.aggregation.combined(month).await?))
}

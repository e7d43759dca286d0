use axum::extract::{Query, State};
use axum::Json;
use vantage_core::providers::finance::{FinanceProvider, StockSnapshot, TickerSuggestion};
use vantage_core::CoreError;

use crate::dto::{SearchQuery, StockQuery};
use crate::error::AppError;
use crate::state::AppState;

/// Provider failures get the finance widget's wording; validation and
/// empty results keep their own message.
fn finance_error(e: CoreError) -> AppError {
    match e {
        CoreError::Http { .. } | CoreError::Transport(_) | CoreError::Decode(_) => {
            tracing::error!("Finance provider failure: {e}");
            AppError::Upstream(FinanceProvider::describe_failure(&e))
        }
        e => e.into(),
    }
}

pub async fn stock_data(
    State(state): State<AppState>,
    Query(query): Query<StockQuery>,
) -> Result<Json<StockSnapshot>, AppError> {
    let symbol = query.symbol.unwrap_or_default();
    let today = chrono::Local::now().date_naive();
    let snapshot = state
        .finance
        .snapshot(&symbol, today)
        .await
        .map_err(finance_error)?;
    Ok(Json(snapshot))
}

pub async fn stock_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<TickerSuggestion>>, AppError> {
    let q = query
        .q
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing search query".to_string()))?;
    let suggestions = state
        .finance
        .search_tickers(&q)
        .await
        .map_err(finance_error)?;
    Ok(Json(suggestions))
}

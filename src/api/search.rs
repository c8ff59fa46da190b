//! Search state endpoints.
//!
//! The server owns a single search session; these handlers read its latest
//! snapshot and feed it new query text.

use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::validation::{validate_limit, validate_query_text};
use super::{ApiError, ApiResponse, AppState, SetQueryRequest, TrendingParams};
use crate::models::TrendingEntry;
use crate::services::SearchState;

/// Returns the latest published search state.
///
/// # Endpoint
/// `GET /api/state`
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<ApiResponse<SearchState>> {
    Json(ApiResponse::success(state.search().snapshot()))
}

/// Replaces the query text.
///
/// # Endpoint
/// `PUT /api/query`
///
/// The fetch happens once the text has stayed unchanged for the debounce
/// delay, so the returned snapshot usually still shows the previous results.
/// The controller applies the new text asynchronously, so even `query` in the
/// response may still hold the previous text; follow `/api/events` or poll
/// `/api/state` to observe it.
pub async fn set_query(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetQueryRequest>,
) -> Result<Json<ApiResponse<SearchState>>, ApiError> {
    let query = validate_query_text(&request.query)?;

    if !state.search().set_query(query) {
        return Err(ApiError::unavailable("Search controller has stopped"));
    }

    Ok(Json(ApiResponse::success(state.search().snapshot())))
}

/// Reads trending searches straight from the store.
///
/// # Endpoint
/// `GET /api/trending?limit=N`
pub async fn get_trending(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrendingParams>,
) -> Result<Json<ApiResponse<Vec<TrendingEntry>>>, ApiError> {
    let limit = validate_limit(params.limit.unwrap_or(state.config().trending.top_limit))?;
    let entries = state.trending().top_entries(limit).await?;
    Ok(Json(ApiResponse::success(entries)))
}

//! Conversation history endpoint.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use oa_advisor::HistorySummary;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub user_id: Option<String>,
}

/// GET /api/v1/history: summary of recorded conversations.
pub async fn summary(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<HistorySummary>> {
    let history = state.history.read().await;
    history
        .summary(query.user_id.as_deref())
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No conversation history found".into()))
}

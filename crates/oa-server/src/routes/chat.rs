//! Conversational endpoints.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use oa_advisor::{ChatReply, Explanation};
use oa_protocol::FarmData;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request body for a chat turn.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub farm_data: Option<FarmData>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// POST /api/v1/chat: answer a message and record it in history.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatReply> {
    let reply = state
        .advisor
        .chat(&req.message, req.farm_data.as_ref(), req.user_id.as_deref())
        .await;

    {
        let mut history = state.history.write().await;
        history.record(
            &req.message,
            reply.domain(),
            &reply.final_response,
            req.user_id.as_deref(),
        );
    }

    Json(reply)
}

#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    pub recommendation: String,
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

/// POST /api/v1/explain: detailed explanation of one recommendation.
pub async fn explain(
    State(state): State<AppState>,
    Json(req): Json<ExplainRequest>,
) -> ApiResult<Json<Explanation>> {
    if req.recommendation.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "recommendation must not be empty".into(),
        ));
    }
    let explanation = state
        .advisor
        .explain_recommendation(&req.recommendation, req.context.as_ref())
        .await;
    Ok(Json(explanation))
}

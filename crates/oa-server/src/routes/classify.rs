//! Query classification endpoint.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use oa_classifier::followup_questions;
use oa_protocol::{Classification, FarmData};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub query: String,
    /// Optional farm details; logged only.
    #[serde(default)]
    pub context: Option<FarmData>,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub classification: Classification,
    pub followup_questions: Vec<String>,
}

/// POST /api/v1/classify: route a query to domain, intent and strategy.
pub async fn classify(
    State(state): State<AppState>,
    Json(req): Json<ClassifyRequest>,
) -> Json<ClassifyResponse> {
    let classification = state.advisor.classify(&req.query, req.context.as_ref());
    let followup_questions = followup_questions(classification.domain);
    Json(ClassifyResponse {
        classification,
        followup_questions,
    })
}

//! Pest-risk prediction endpoint.

use axum::Json;
use axum::extract::State;

use oa_protocol::{FarmData, PredictionOutcome};

use crate::error::ApiResult;
use crate::state::AppState;

/// POST /api/v1/predict: pest risk from farm data; 422 when fields are missing.
pub async fn predict(
    State(state): State<AppState>,
    Json(farm_data): Json<FarmData>,
) -> ApiResult<Json<PredictionOutcome>> {
    let outcome = state.advisor.predict(&farm_data)?;
    tracing::info!(
        level = %outcome.risk_level(),
        fallback = outcome.is_fallback(),
        "prediction served"
    );
    Ok(Json(outcome))
}

//! Farm data template endpoint.

use axum::Json;

use oa_protocol::FarmData;

/// GET /api/v1/farm-data/template: example of the fields callers can send.
pub async fn template() -> Json<FarmData> {
    Json(FarmData::template())
}

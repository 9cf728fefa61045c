//! E2E tests for rejected requests and empty state.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::TestHarness;

#[tokio::test]
async fn e2e_health_reports_version() {
    let h = TestHarness::new();

    let (status, json) = h.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn e2e_unknown_route_is_404() {
    let h = TestHarness::new();

    let (status, _) = h.get("/api/v1/forecast").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn e2e_malformed_json_is_400() {
    let h = TestHarness::new();

    let (status, _) = h
        .post_raw("/api/v1/chat", "application/json", "{\"message\": ")
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(h.history_len().await, 0);
}

#[tokio::test]
async fn e2e_missing_content_type_is_415() {
    let h = TestHarness::new();

    let (status, _) = h
        .post_raw("/api/v1/classify", "text/plain", "{\"query\": \"spray?\"}")
        .await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn e2e_chat_without_message_is_422() {
    let h = TestHarness::new();

    let (status, _) = h.post("/api/v1/chat", json!({"user_id": "farmer-1"})).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(h.history_len().await, 0);
}

#[tokio::test]
async fn e2e_unknown_season_is_rejected() {
    let h = TestHarness::new();
    let mut body = helpers::hot_summer();
    body["season"] = json!("monsoon");

    let (status, _) = h.post("/api/v1/predict", body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn e2e_empty_predict_body_lists_every_field_missing() {
    let h = TestHarness::new();

    let (status, json) = h.post("/api/v1/predict", json!({})).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["provided"], json!([]));
    assert_eq!(json["missing"], json["required"]);
}

#[tokio::test]
async fn e2e_blank_recommendation_is_400() {
    let h = TestHarness::new();

    let (status, json) = h
        .post("/api/v1/explain", json!({"recommendation": ""}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert_eq!(json["error"], "recommendation must not be empty");
}

#[tokio::test]
async fn e2e_history_before_any_chat_is_404() {
    let h = TestHarness::new();

    let (status, json) = h.get("/api/v1/history").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}

/// A broken lexicon override stops startup; missing data files do not.
#[tokio::test]
async fn e2e_bad_lexicon_override_is_fatal() {
    let mut config = helpers::knowledge_config();
    config.knowledge.lexicon_path = Some(helpers::data_path("no_such_lexicon.toml"));
    assert!(oa_advisor::AdvisorService::from_config(&config).is_err());

    let mut config = oa_advisor::AdvisorConfig::default();
    config.knowledge.pest_knowledge_path = Some(helpers::data_path("no_such_kb.json"));
    config.llm.enabled = false;
    assert!(oa_advisor::AdvisorService::from_config(&config).is_ok());
}

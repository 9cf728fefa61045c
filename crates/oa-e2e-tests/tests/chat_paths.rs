//! E2E tests for the chat pipeline: classification, pest risk, expert
//! advice, the hosted language model and conversation history together.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{bearer_token, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use helpers::{TestHarness, completion, hot_summer};

// ── Language model ─────────────────────────────────────────────

/// Spray question with full farm data: the model reply is combined with
/// the risk analysis and expert advice, and the model sees the prediction.
#[tokio::test]
async fn e2e_chat_with_model_combines_all_sections() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(bearer_token("test-key"))
        .and(body_partial_json(json!({"model": "meta-llama/Llama-2-7b-chat-hf"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("Spray only after scouting confirms pests.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let h = TestHarness::with_llm(&server);
    let (status, json) = h
        .chat("Is it time to spray for pests?", Some(hot_summer()), Some("farmer-1"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["classification"]["domain"], "pest_management");
    let conversation_id: uuid::Uuid = json["conversation_id"].as_str().unwrap().parse().unwrap();
    assert_eq!(conversation_id.get_version_num(), 7);
    assert_eq!(json["user_id"], "farmer-1");
    assert_eq!(json["reply"]["source"], "model");
    assert_eq!(json["reply"]["model"], "meta-llama/Llama-2-7b-chat-hf");
    assert_eq!(json["pest_risk"]["predicted"]["assessment"]["risk_level"], "very_high");

    let text = json["final_response"].as_str().unwrap();
    assert!(text.starts_with("Spray only after scouting confirms pests."));
    assert!(text.contains("**Current Pest Risk Analysis:**\nRisk Level: Very High\nConfidence: 70%"));
    assert!(text.contains(
        "**Immediate Recommendations:**\n- Increase monitoring frequency to twice weekly"
    ));
    assert!(text.contains("**Expert Advice:**"));

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let system = body["messages"][0]["content"].as_str().unwrap();
    let user = body["messages"][1]["content"].as_str().unwrap();
    assert!(system.contains(
        "Current predictions: Based on current conditions: Pest risk is currently very_high."
    ));
    assert!(user.starts_with("Is it time to spray for pests?"));
    assert!(user.contains("My farm details:"));
}

#[tokio::test]
async fn e2e_model_outage_uses_canned_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let h = TestHarness::with_llm(&server);
    let (status, json) = h.chat("When should I harvest?", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reply"]["source"], "fallback");
    assert!(json["reply"].get("model").is_none());
    assert!(json["final_response"].as_str().unwrap().contains("**Expert Advice:**"));
    assert_eq!(h.history_len().await, 1);
}

#[tokio::test]
async fn e2e_explain_with_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("Traps show when moths start flying.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let h = TestHarness::with_llm(&server);
    let (status, json) = h
        .post(
            "/api/v1/explain",
            json!({
                "recommendation": "Check pheromone traps daily",
                "context": {"season": "summer"}
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "model");
    assert_eq!(json["explanation"], "Traps show when moths start flying.");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let user = body["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("Check pheromone traps daily"));
    assert!(user.contains("Context:"));
}

// ── Pest risk and expert advice ────────────────────────────────

/// Named pest in the question pulls treatments from the knowledge base.
#[tokio::test]
async fn e2e_named_pest_gets_knowledge_base_treatments() {
    let h = TestHarness::with_knowledge();

    let (status, json) = h
        .chat("How do I get rid of stink bugs on my trees?", None, None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["classification"]["domain"], "pest_management");
    assert_eq!(json["domain_advice"]["named_pest"], "stink_bugs");
    assert_eq!(json["domain_advice"]["used_fallback"], false);
    let advice = json["domain_advice"]["advice"].as_str().unwrap();
    assert!(advice.contains("Recommended treatments for stink bugs:"));
    assert!(advice.contains("Kaolin clay particle film on developing nuts"));
    assert!(advice.contains("Trap cropping with sunflower or sorghum borders"));
    assert!(!advice.contains("Encourage assassin bugs and parasitic flies"));
}

/// No farm data means no pest-risk section at all.
#[tokio::test]
async fn e2e_spray_question_without_farm_data_skips_prediction() {
    let h = TestHarness::new();

    let (status, json) = h.chat("Is it time to spray for pests?", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json.get("pest_risk").is_none());
    let text = json["final_response"].as_str().unwrap();
    assert!(!text.contains("Pest Risk Analysis"));
}

#[tokio::test]
async fn e2e_spray_question_with_partial_farm_data_lists_missing_fields() {
    let h = TestHarness::new();

    let (status, json) = h
        .chat(
            "Is it time to spray for pests?",
            Some(json!({"season": "summer", "humidity": 85.0})),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["pest_risk"]["unavailable"]["missing"],
        json!(["soil_ph", "temperature", "rainfall", "tree_age"])
    );
    let text = json["final_response"].as_str().unwrap();
    assert!(text.contains(
        "**Pest Risk Analysis Unavailable:**\nMissing farm data: soil_ph, temperature, rainfall, tree_age"
    ));
}

/// Farm data alone does not trigger a prediction for a non-pest question.
#[tokio::test]
async fn e2e_fertilizer_question_ignores_farm_data_for_risk() {
    let h = TestHarness::new();

    let (status, json) = h
        .chat(
            "What fertilizer should I use for my 5 year old trees?",
            Some(hot_summer()),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["classification"]["domain"], "fertilization");
    assert!(json.get("pest_risk").is_none());
    assert!(json["domain_advice"]["advice"].as_str().unwrap().contains("**"));
}

// ── History ────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_history_is_kept_per_user() {
    let h = TestHarness::new();

    h.chat("When should I harvest?", None, Some("alice")).await;
    h.chat("Is it time to spray for pests?", None, Some("alice")).await;
    h.chat("When should I harvest?", None, Some("bob")).await;

    let (status, alice) = h.get("/api/v1/history?user_id=alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(alice["total_conversations"], 2);
    assert_eq!(alice["most_discussed_topics"]["harvesting"], 1);
    assert_eq!(alice["most_discussed_topics"]["pest_management"], 1);
    assert_eq!(alice["recent_conversations"][1]["user_id"], "alice");
    assert!(
        alice["recent_conversations"][0]["response_summary"]
            .as_str()
            .unwrap()
            .ends_with("...")
    );

    let (status, all) = h.get("/api/v1/history").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["total_conversations"], 3);
    let first: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(all["first_conversation"].clone()).unwrap();
    let last: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(all["last_conversation"].clone()).unwrap();
    assert!(first <= last);
    assert_eq!(all["most_discussed_topics"]["harvesting"], 2);

    let (status, json) = h.get("/api/v1/history?user_id=carol").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "No conversation history found");
}

#[tokio::test]
async fn e2e_history_evicts_oldest_at_capacity() {
    let h = TestHarness::with_service(oa_advisor::AdvisorService::default(), 3);

    for i in 0..5 {
        let (status, _) = h.chat(&format!("When should I harvest block {i}?"), None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(h.history_len().await, 3);
    let (status, json) = h.get("/api/v1/history").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_conversations"], 3);
    assert_eq!(
        json["recent_conversations"][0]["user_input"],
        "When should I harvest block 2?"
    );
}

#[tokio::test]
async fn e2e_concurrent_chats_are_all_recorded() {
    let h = TestHarness::new();

    let mut handles = Vec::new();
    for i in 0..8 {
        let router = h.router.clone();
        handles.push(tokio::spawn(async move {
            use axum::body::Body;
            use axum::http::Request;
            use tower::ServiceExt;

            let body = json!({"message": format!("When should I harvest row {i}?")});
            let response = router
                .oneshot(
                    Request::post("/api/v1/chat")
                        .header("content-type", "application/json")
                        .body(Body::from(serde_json::to_vec(&body).unwrap()))
                        .unwrap(),
                )
                .await
                .unwrap();
            response.status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    assert_eq!(h.history_len().await, 8);
}

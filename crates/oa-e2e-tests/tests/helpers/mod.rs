//! Shared test harness for E2E integration tests.
//!
//! Builds the real advisory pipeline behind the Axum router and drives it
//! through `tower::oneshot`, so every request crosses the server, advisor,
//! risk and classifier crates.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use wiremock::MockServer;

use oa_advisor::{AdvisorConfig, AdvisorService, LlmConfig};
use oa_server::routes::build_router;
use oa_server::state::AppState;

/// End-to-end harness around one router and its shared state.
pub struct TestHarness {
    /// Application state (service + in-memory history).
    pub state: AppState,
    /// Axum router for HTTP requests via `tower::oneshot`.
    pub router: Router,
}

impl TestHarness {
    /// Built-in lexicon, rules-only predictor, no knowledge base, no language model.
    pub fn new() -> Self {
        Self::from_state(AppState::default())
    }

    /// Harness over an explicit service and history capacity.
    pub fn with_service(service: AdvisorService, history_capacity: usize) -> Self {
        Self::from_state(AppState::new(service, history_capacity))
    }

    /// Harness built the way the server binary builds itself.
    pub fn from_config(config: &AdvisorConfig) -> Self {
        let service = AdvisorService::from_config(config).unwrap();
        Self::with_service(service, config.history.capacity)
    }

    /// Sample knowledge base loaded, language model disabled.
    pub fn with_knowledge() -> Self {
        Self::from_config(&knowledge_config())
    }

    /// Sample knowledge base and model bundle loaded, language model disabled.
    pub fn with_model(trust_model_above: f64) -> Self {
        let mut config = knowledge_config();
        config.knowledge.model_bundle_path = Some(data_path("pest_model.json"));
        config.trust_model_above = trust_model_above;
        Self::from_config(&config)
    }

    /// Sample knowledge base loaded, language model pointed at `server`.
    pub fn with_llm(server: &MockServer) -> Self {
        let mut config = knowledge_config();
        config.llm = llm_config(server);
        Self::from_config(&config)
    }

    fn from_state(state: AppState) -> Self {
        let router = build_router(state.clone());
        Self { state, router }
    }

    /// POST a JSON body. Returns (HTTP status code, response JSON body).
    pub async fn post(&self, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        self.send(request).await
    }

    /// GET a path. Returns (HTTP status code, response JSON body).
    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    /// POST a raw body with the given content type.
    pub async fn post_raw(
        &self,
        uri: &str,
        content_type: &str,
        body: &'static str,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::post(uri)
            .header("content-type", content_type)
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// POST /api/v1/chat.
    pub async fn chat(
        &self,
        message: &str,
        farm_data: Option<serde_json::Value>,
        user_id: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let mut body = serde_json::json!({ "message": message });
        if let Some(farm_data) = farm_data {
            body["farm_data"] = farm_data;
        }
        if let Some(user_id) = user_id {
            body["user_id"] = serde_json::json!(user_id);
        }
        self.post("/api/v1/chat", body).await
    }

    /// Entries currently held in the in-memory history.
    pub async fn history_len(&self) -> usize {
        self.state.history.read().await.len()
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, json)
    }
}

/// Absolute path of a file in the workspace `data/` directory.
pub fn data_path(file: &str) -> String {
    format!("{}/../../data/{file}", env!("CARGO_MANIFEST_DIR"))
}

/// Config with the sample knowledge base and no language model.
pub fn knowledge_config() -> AdvisorConfig {
    let mut config = AdvisorConfig::default();
    config.knowledge.pest_knowledge_path = Some(data_path("pest_management.json"));
    config.llm.enabled = false;
    config
}

/// Language-model config aimed at a wiremock server.
pub fn llm_config(server: &MockServer) -> LlmConfig {
    LlmConfig {
        api_url: format!("{}/v1/chat/completions", server.uri()),
        api_key: Some("test-key".into()),
        timeout_secs: 2,
        ..LlmConfig::default()
    }
}

/// Chat-completions response body carrying `content`.
pub fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "cmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

/// Hot, humid summer reading on young trees; the rules score it very high.
pub fn hot_summer() -> serde_json::Value {
    serde_json::json!({
        "soil_ph": 6.2,
        "temperature": 30.0,
        "humidity": 85.0,
        "rainfall": 40.0,
        "season": "summer",
        "tree_age": 2
    })
}

/// Mild winter reading on mature trees.
pub fn mild_winter() -> serde_json::Value {
    serde_json::json!({
        "soil_ph": 6.0,
        "temperature": 15.0,
        "humidity": 60.0,
        "rainfall": 100.0,
        "season": "winter",
        "tree_age": 10
    })
}

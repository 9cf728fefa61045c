//! E2E tests for the shipped sample data and configuration files.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{TestHarness, data_path};
use oa_protocol::{PestKind, RiskLevel, Season};
use oa_risk::{ModelBundle, PestKnowledgeBase, RiskModel};

fn workspace_path(relative: &str) -> String {
    format!("{}/../../{relative}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn e2e_knowledge_base_covers_every_modelled_pest() {
    let kb = PestKnowledgeBase::from_file(&data_path("pest_management.json")).unwrap();

    for pest in PestKind::ALL {
        let profile = kb.pest(pest).unwrap_or_else(|| panic!("{} missing", pest.key()));
        assert!(!profile.description.is_empty());
        assert!(profile.organic_treatments.len() >= 3, "{} has too few treatments", pest.key());
        assert!(!profile.timing.is_empty());
    }
}

#[test]
fn e2e_model_bundle_splits_on_humidity() {
    let bundle = ModelBundle::from_file(&data_path("pest_model.json")).unwrap();
    let mut reading = oa_protocol::EnvironmentalReading {
        soil_ph: 6.2,
        temperature: 24.0,
        humidity: 75.0,
        rainfall: 120.0,
        season: Season::Spring,
        tree_age: 5,
    };

    let at_threshold = bundle.predict(&reading).unwrap();
    assert_eq!(at_threshold.risk_level, RiskLevel::Low);
    assert!((at_threshold.probability - 0.9).abs() < 1e-9);

    reading.humidity = 75.1;
    let humid = bundle.predict(&reading).unwrap();
    assert_eq!(humid.risk_level, RiskLevel::VeryHigh);
}

#[test]
fn e2e_server_config_parses() {
    let config = oa_server::config::ServerConfig::from_file(&workspace_path("config/advisor.toml"))
        .unwrap();

    assert_eq!(config.addr(), "0.0.0.0:3000");
    assert_eq!(config.advisor.history.capacity, 50);
    assert_eq!(
        config.advisor.knowledge.model_bundle_path.as_deref(),
        Some("data/pest_model.json")
    );
    assert_eq!(
        config.advisor.knowledge.lexicon_path.as_deref(),
        Some("config/lexicon.toml")
    );
}

/// The lexicon override adds cultivars the built-in list lacks.
#[tokio::test]
async fn e2e_lexicon_override_extends_varieties() {
    let builtin = TestHarness::new();
    let (_, json) = builtin
        .post("/api/v1/classify", json!({"query": "Should I plant hinde this spring?"}))
        .await;
    assert!(json["classification"]["parameters"].get("variety").is_none());

    let lexicon = oa_classifier::Lexicon::from_file(&workspace_path("config/lexicon.toml")).unwrap();
    let service = oa_advisor::AdvisorService::new(
        oa_classifier::QueryClassifier::new(std::sync::Arc::new(lexicon)),
        oa_risk::HybridPredictor::new(),
        oa_advisor::DomainAdvisor::new(),
    );
    let h = TestHarness::with_service(service, 10);

    let (status, json) = h
        .post("/api/v1/classify", json!({"query": "Should I plant hinde this spring?"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["classification"]["domain"], "planting");
    assert_eq!(json["classification"]["parameters"]["variety"], "hinde");
    assert_eq!(json["classification"]["parameters"]["season"], "spring");
}

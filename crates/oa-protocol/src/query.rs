use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reading::Season;

/// Farming topic a query is routed to.
///
/// Declaration order is the domain-scoring tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Planting,
    PestManagement,
    Fertilization,
    Harvesting,
    Certification,
    General,
}

impl Domain {
    pub const ALL: [Domain; 6] = [
        Self::Planting,
        Self::PestManagement,
        Self::Fertilization,
        Self::Harvesting,
        Self::Certification,
        Self::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planting => "planting",
            Self::PestManagement => "pest_management",
            Self::Fertilization => "fertilization",
            Self::Harvesting => "harvesting",
            Self::Certification => "certification",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pragmatic purpose of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    PredictionRequest,
    AdviceRequest,
    InformationRequest,
    ProblemSolving,
    ComparisonRequest,
    GeneralInquiry,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PredictionRequest => "prediction_request",
            Self::AdviceRequest => "advice_request",
            Self::InformationRequest => "information_request",
            Self::ProblemSolving => "problem_solving",
            Self::ComparisonRequest => "comparison_request",
            Self::GeneralInquiry => "general_inquiry",
        }
    }

    /// Intents that name a clear ask (prediction, advice or information).
    pub fn is_clear(&self) -> bool {
        matches!(
            self,
            Self::PredictionRequest | Self::AdviceRequest | Self::InformationRequest
        )
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of model-backed prediction a query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionType {
    PestRisk,
    FertilizerNeed,
    HarvestTiming,
    YieldPrediction,
}

impl PredictionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PestRisk => "pest_risk",
            Self::FertilizerNeed => "fertilizer_need",
            Self::HarvestTiming => "harvest_timing",
            Self::YieldPrediction => "yield_prediction",
        }
    }
}

/// How the orchestrator should build the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryMethod {
    #[default]
    Conversational,
    MlPrediction,
    KnowledgeBase,
    Hybrid,
}

/// Response strategy derived from domain, intent and prediction needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseStrategy {
    pub primary_method: PrimaryMethod,
    pub use_ml_predictions: bool,
    pub use_knowledge_base: bool,
    pub requires_farm_data: bool,
}

impl Default for ResponseStrategy {
    fn default() -> Self {
        Self {
            primary_method: PrimaryMethod::Conversational,
            use_ml_predictions: false,
            use_knowledge_base: true,
            requires_farm_data: false,
        }
    }
}

/// Coarse tree age when the query gives no number of years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeAgeCategory {
    Young,
    Mature,
    Old,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    High,
}

/// Entities extracted from the query text.
///
/// Absent entities are omitted from the serialized mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParameters {
    /// Every numeric substring, in order of appearance.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub numbers: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,
    /// Tree age in years ("5 year old trees").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_age_category: Option<TreeAgeCategory>,
    /// Named cultivar, lowercase as matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variety: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Urgency>,
}

impl QueryParameters {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Whether a classification was scored or is the fixed fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationOrigin {
    #[default]
    Scored,
    Fallback,
}

/// Result of classifying one query. Immutable once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub domain: Domain,
    pub intent: Intent,
    pub prediction_needs: BTreeSet<PredictionType>,
    pub response_strategy: ResponseStrategy,
    pub parameters: QueryParameters,
    /// Classification confidence (0.0 - 1.0).
    pub confidence: f64,
    pub classified_at: DateTime<Utc>,
    #[serde(default)]
    pub origin: ClassificationOrigin,
}

impl Classification {
    /// Fixed classification returned when scoring fails.
    pub fn fallback() -> Self {
        Self {
            domain: Domain::General,
            intent: Intent::GeneralInquiry,
            prediction_needs: BTreeSet::new(),
            response_strategy: ResponseStrategy::default(),
            parameters: QueryParameters::default(),
            confidence: 0.3,
            classified_at: Utc::now(),
            origin: ClassificationOrigin::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == ClassificationOrigin::Fallback
    }

    pub fn needs(&self, prediction: PredictionType) -> bool {
        self.prediction_needs.contains(&prediction)
    }
}

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Five-point pest pressure scale, ordered from least to most severe.
///
/// `#[derive(Ord)]` follows declaration order,
/// so VeryLow < Low < Medium < High < VeryHigh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 5] = [
        Self::VeryLow,
        Self::Low,
        Self::Medium,
        Self::High,
        Self::VeryHigh,
    ];

    /// Map an un-normalized rule score to a level (first match, descending).
    pub fn from_raw_score(raw: u32) -> Self {
        match raw {
            6.. => Self::VeryHigh,
            4..=5 => Self::High,
            2..=3 => Self::Medium,
            1 => Self::Low,
            0 => Self::VeryLow,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryLow => "very_low",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        }
    }

    /// Look up a level by its snake_case label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_str() == label)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }

    /// High or very high.
    pub fn is_elevated(&self) -> bool {
        *self >= Self::High
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which source produced a risk assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentMethod {
    RuleBased,
    MachineLearning,
    Combined,
}

/// Overall pest-risk verdict for one reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    /// Rule points over 8, or the model's class probability. Rule output
    /// reaches 1.125 when every rule fires.
    pub risk_score: f64,
    /// Confidence in the verdict (0.0 - 1.0).
    pub confidence: f64,
    #[serde(default)]
    pub contributing_factors: Vec<String>,
    pub method: AssessmentMethod,
}

/// The pests that get their own hand-coded risk tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PestKind {
    MacadamiaNutBorer,
    StinkBugs,
    ScaleInsects,
}

impl PestKind {
    pub const ALL: [PestKind; 3] = [Self::MacadamiaNutBorer, Self::StinkBugs, Self::ScaleInsects];

    /// Key used by the pest knowledge base.
    pub fn key(&self) -> &'static str {
        match self {
            Self::MacadamiaNutBorer => "macadamia_nut_borer",
            Self::StinkBugs => "stink_bugs",
            Self::ScaleInsects => "scale_insects",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::MacadamiaNutBorer => "macadamia nut borer",
            Self::StinkBugs => "stink bugs",
            Self::ScaleInsects => "scale insects",
        }
    }
}

/// Risk verdict for one named pest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PestRisk {
    pub risk_level: RiskLevel,
    /// Knowledge-base description, absent when no knowledge base is loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub peak_activity: String,
}

/// Full pest-risk prediction for one reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    pub assessment: RiskAssessment,
    pub per_pest: BTreeMap<PestKind, PestRisk>,
    pub recommendations: Vec<String>,
    pub monitoring_advice: Vec<String>,
    pub predicted_at: DateTime<Utc>,
}

/// Fixed low-confidence answer returned when prediction failed outright.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackReport {
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub confidence: f64,
    pub recommendations: Vec<String>,
    pub monitoring_advice: Vec<String>,
    /// Why the predictor fell back.
    pub reason: String,
    pub predicted_at: DateTime<Utc>,
}

impl FallbackReport {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            risk_level: RiskLevel::Medium,
            risk_score: 0.5,
            confidence: 0.3,
            recommendations: vec![
                "Regular monitoring recommended".into(),
                "Maintain good orchard sanitation".into(),
                "Consult local agricultural extension".into(),
            ],
            monitoring_advice: vec![
                "Weekly visual inspections".into(),
                "Check for common pest signs".into(),
                "Monitor weather conditions".into(),
            ],
            reason: reason.into(),
            predicted_at: Utc::now(),
        }
    }
}

/// Outcome of a pest-risk prediction: a genuine assessment (of any
/// confidence) or the failure fallback. Callers never have to guess which.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PredictionOutcome {
    Assessed(RiskReport),
    Fallback(FallbackReport),
}

impl PredictionOutcome {
    pub fn risk_level(&self) -> RiskLevel {
        match self {
            Self::Assessed(report) => report.assessment.risk_level,
            Self::Fallback(fallback) => fallback.risk_level,
        }
    }

    pub fn confidence(&self) -> f64 {
        match self {
            Self::Assessed(report) => report.assessment.confidence,
            Self::Fallback(fallback) => fallback.confidence,
        }
    }

    pub fn recommendations(&self) -> &[String] {
        match self {
            Self::Assessed(report) => &report.recommendations,
            Self::Fallback(fallback) => &fallback.recommendations,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    pub fn report(&self) -> Option<&RiskReport> {
        match self {
            Self::Assessed(report) => Some(report),
            Self::Fallback(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_ordering() {
        assert!(RiskLevel::VeryLow < RiskLevel::Low);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert_eq!(RiskLevel::Low.max(RiskLevel::High), RiskLevel::High);
    }

    #[test]
    fn threshold_table_is_monotone() {
        let levels: Vec<RiskLevel> = (0..=8).map(RiskLevel::from_raw_score).collect();
        assert!(levels.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(RiskLevel::from_raw_score(0), RiskLevel::VeryLow);
        assert_eq!(RiskLevel::from_raw_score(1), RiskLevel::Low);
        assert_eq!(RiskLevel::from_raw_score(3), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_raw_score(5), RiskLevel::High);
        assert_eq!(RiskLevel::from_raw_score(6), RiskLevel::VeryHigh);
        assert_eq!(RiskLevel::from_raw_score(8), RiskLevel::VeryHigh);
    }

    #[test]
    fn label_lookup() {
        assert_eq!(RiskLevel::from_label("very_high"), Some(RiskLevel::VeryHigh));
        assert_eq!(RiskLevel::from_label("extreme"), None);
    }

    #[test]
    fn elevated_levels() {
        assert!(RiskLevel::High.is_elevated());
        assert!(RiskLevel::VeryHigh.is_elevated());
        assert!(!RiskLevel::Medium.is_elevated());
    }

    #[test]
    fn fallback_outcome_is_tagged() {
        let outcome = PredictionOutcome::Fallback(FallbackReport::new("reading not finite"));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "fallback");
        assert_eq!(json["risk_level"], "medium");
        assert_eq!(json["reason"], "reading not finite");
        assert!(outcome.is_fallback());
        assert!((outcome.confidence() - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn assessed_outcome_serializes_pest_keys() {
        let mut per_pest = BTreeMap::new();
        per_pest.insert(
            PestKind::StinkBugs,
            PestRisk {
                risk_level: RiskLevel::High,
                description: None,
                peak_activity: "Spring".into(),
            },
        );
        let outcome = PredictionOutcome::Assessed(RiskReport {
            assessment: RiskAssessment {
                risk_level: RiskLevel::Low,
                risk_score: 0.125,
                confidence: 0.7,
                contributing_factors: vec![],
                method: AssessmentMethod::RuleBased,
            },
            per_pest,
            recommendations: vec![],
            monitoring_advice: vec![],
            predicted_at: Utc::now(),
        });
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "assessed");
        assert_eq!(json["assessment"]["method"], "rule_based");
        assert_eq!(json["per_pest"]["stink_bugs"]["risk_level"], "high");
        assert!(json["per_pest"]["stink_bugs"].get("description").is_none());
    }
}

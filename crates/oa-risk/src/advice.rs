//! Recommendation and monitoring text keyed on risk level and season.

use std::collections::BTreeMap;

use oa_protocol::{PestKind, PestRisk, RiskLevel, Season};

use crate::knowledge::PestKnowledgeBase;

const ELEVATED_RECOMMENDATIONS: &[&str] = &[
    "Increase monitoring frequency to twice weekly",
    "Consider preventive organic treatments",
    "Check pheromone traps daily",
    "Inspect trees for early pest signs",
];

const MEDIUM_RECOMMENDATIONS: &[&str] = &[
    "Maintain weekly monitoring schedule",
    "Prepare organic treatment materials",
    "Monitor beneficial insect populations",
];

const LOW_RECOMMENDATIONS: &[&str] = &[
    "Continue regular monitoring",
    "Maintain orchard sanitation",
    "Support beneficial insect habitat",
];

const BASE_MONITORING: &[&str] = &[
    "Visual inspection of leaves and branches",
    "Check for pest damage signs",
    "Monitor beneficial insect populations",
];

const ELEVATED_MONITORING: &[&str] = &[
    "Daily inspection of high-risk areas",
    "Document pest populations and damage",
    "Check pheromone trap catches",
];

fn seasonal_monitoring(season: Season) -> &'static [&'static str] {
    match season {
        Season::Spring => &[
            "Monitor for emerging pest populations",
            "Check flowering trees carefully",
        ],
        Season::Summer => &[
            "Intensive monitoring during peak pest season",
            "Focus on developing nuts",
        ],
        Season::Autumn => &[
            "Monitor harvest areas",
            "Check for late-season pest buildup",
        ],
        Season::Winter => &[
            "Reduced monitoring frequency",
            "Focus on orchard sanitation",
        ],
    }
}

fn owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

/// Level-based recommendations, plus the first organic treatment of every
/// pest at high risk or above when the knowledge base lists one.
pub fn recommendations(
    overall: RiskLevel,
    pests: &BTreeMap<PestKind, PestRisk>,
    knowledge: Option<&PestKnowledgeBase>,
) -> Vec<String> {
    let mut lines = match overall {
        level if level.is_elevated() => owned(ELEVATED_RECOMMENDATIONS),
        RiskLevel::Medium => owned(MEDIUM_RECOMMENDATIONS),
        _ => owned(LOW_RECOMMENDATIONS),
    };

    if let Some(kb) = knowledge {
        for (pest, risk) in pests {
            if !risk.risk_level.is_elevated() {
                continue;
            }
            if let Some(treatment) = kb.first_treatment(*pest) {
                lines.push(format!("For {}: {treatment}", pest.display_name()));
            }
        }
    }

    lines
}

/// Base checks, elevated-risk checks, then the season's focus.
pub fn monitoring_advice(season: Season, overall: RiskLevel) -> Vec<String> {
    let mut lines = owned(BASE_MONITORING);
    if overall.is_elevated() {
        lines.extend(owned(ELEVATED_MONITORING));
    }
    lines.extend(owned(seasonal_monitoring(season)));
    lines
}

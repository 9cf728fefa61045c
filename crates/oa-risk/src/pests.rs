//! Per-pest risk trees.
//!
//! Three fixed decision trees over temperature, humidity, rainfall and
//! season. No learned component.

use std::collections::BTreeMap;

use oa_protocol::{EnvironmentalReading, PestKind, PestRisk, RiskLevel};

use crate::knowledge::PestKnowledgeBase;

/// Risk level for one pest under the given conditions.
pub fn pest_level(pest: PestKind, reading: &EnvironmentalReading) -> RiskLevel {
    let warm_season = reading.season.is_warm();
    match pest {
        PestKind::MacadamiaNutBorer => {
            if reading.temperature > 24.0 && reading.humidity > 65.0 {
                if warm_season {
                    RiskLevel::High
                } else {
                    RiskLevel::Medium
                }
            } else {
                RiskLevel::Low
            }
        }
        PestKind::StinkBugs => {
            if reading.temperature > 22.0 && warm_season {
                if reading.humidity > 70.0 {
                    RiskLevel::High
                } else {
                    RiskLevel::Medium
                }
            } else {
                RiskLevel::Low
            }
        }
        PestKind::ScaleInsects => {
            if reading.humidity > 75.0 || (reading.temperature > 26.0 && reading.rainfall < 80.0) {
                if reading.humidity > 85.0 {
                    RiskLevel::High
                } else {
                    RiskLevel::Medium
                }
            } else {
                RiskLevel::Low
            }
        }
    }
}

/// When each pest is most active.
pub fn peak_activity(pest: PestKind) -> &'static str {
    match pest {
        PestKind::MacadamiaNutBorer => {
            "Warm, humid conditions during flowering and nut development"
        }
        PestKind::StinkBugs => "Spring and early summer, especially warm days",
        PestKind::ScaleInsects => "Year-round, especially in humid or stressed conditions",
    }
}

/// Run every pest tree. Descriptions come from the knowledge base when loaded.
pub fn analyze(
    reading: &EnvironmentalReading,
    knowledge: Option<&PestKnowledgeBase>,
) -> BTreeMap<PestKind, PestRisk> {
    PestKind::ALL
        .into_iter()
        .map(|pest| {
            let risk = PestRisk {
                risk_level: pest_level(pest, reading),
                description: knowledge
                    .and_then(|kb| kb.description(pest))
                    .map(str::to_string),
                peak_activity: peak_activity(pest).to_string(),
            };
            (pest, risk)
        })
        .collect()
}

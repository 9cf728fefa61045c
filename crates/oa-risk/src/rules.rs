//! Rule-based pest risk scorer.
//!
//! Additive points over environmental thresholds. Pure and deterministic:
//! out-of-range values are accepted and land in the nearest bucket.

use oa_protocol::{AssessmentMethod, EnvironmentalReading, RiskAssessment, RiskLevel, Season};

/// Normalization divisor for the raw score.
pub const MAX_RAW_SCORE: f64 = 8.0;

/// Fixed confidence of rule-based output.
pub const RULE_CONFIDENCE: f64 = 0.7;

/// Raw points plus the factor text of every rule that fired.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleScore {
    pub raw: u32,
    pub factors: Vec<String>,
}

impl RuleScore {
    fn add(&mut self, points: u32, factor: impl Into<String>) {
        self.raw += points;
        self.factors.push(factor.into());
    }
}

/// Apply the scoring table to a reading.
pub fn raw_score(reading: &EnvironmentalReading) -> RuleScore {
    let mut score = RuleScore {
        raw: 0,
        factors: Vec::new(),
    };

    // ── Temperature ─────────────────────────────────────────────
    if reading.temperature > 28.0 {
        score.add(2, "High temperature favors pest activity");
    } else if reading.temperature > 25.0 {
        score.add(1, "Moderate temperature increases pest risk");
    }

    // ── Humidity ────────────────────────────────────────────────
    if reading.humidity > 80.0 {
        score.add(2, "High humidity promotes pest development");
    } else if reading.humidity > 70.0 {
        score.add(1, "Elevated humidity increases pest pressure");
    }

    // ── Rainfall ────────────────────────────────────────────────
    if reading.rainfall < 50.0 {
        score.add(1, "Low rainfall may stress trees, increasing susceptibility");
    } else if reading.rainfall > 200.0 {
        score.add(1, "Excessive rainfall creates favorable pest conditions");
    }

    // ── Season ──────────────────────────────────────────────────
    match reading.season {
        Season::Summer => score.add(2, "Summer season peak pest activity period"),
        Season::Spring | Season::Autumn => score.add(
            1,
            format!("{} season moderate pest activity", reading.season.title()),
        ),
        Season::Winter => {}
    }

    // ── Tree and soil ───────────────────────────────────────────
    if reading.tree_age < 3 {
        score.add(1, "Young trees more vulnerable to pests");
    }
    if reading.soil_ph < 5.5 || reading.soil_ph > 7.0 {
        score.add(1, "Suboptimal soil pH may weaken tree defenses");
    }

    score
}

/// Score a reading into a rule-based assessment.
pub fn score(reading: &EnvironmentalReading) -> RiskAssessment {
    let RuleScore { raw, factors } = raw_score(reading);
    RiskAssessment {
        risk_level: RiskLevel::from_raw_score(raw),
        // not clamped: every rule firing at once totals 9, i.e. 1.125
        risk_score: f64::from(raw) / MAX_RAW_SCORE,
        confidence: RULE_CONFIDENCE,
        contributing_factors: factors,
        method: AssessmentMethod::RuleBased,
    }
}

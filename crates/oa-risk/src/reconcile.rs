//! Rule/model reconciliation as a decision table.
//!
//! | model output            | result               |
//! |-------------------------|----------------------|
//! | absent                  | rule output          |
//! | confidence > threshold  | model output         |
//! | otherwise               | blend of the two     |

use oa_protocol::{AssessmentMethod, RiskAssessment};

/// Which source the final assessment is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    RuleOnly,
    Model,
    Blend,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconcilePolicy {
    /// Model output is taken as-is above this confidence.
    pub trust_model_above: f64,
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        Self {
            trust_model_above: 0.8,
        }
    }
}

impl ReconcilePolicy {
    pub fn decide(&self, model: Option<&RiskAssessment>) -> Reconciliation {
        match model {
            None => Reconciliation::RuleOnly,
            Some(m) if m.confidence > self.trust_model_above => Reconciliation::Model,
            Some(_) => Reconciliation::Blend,
        }
    }

    pub fn reconcile(&self, rule: RiskAssessment, model: Option<RiskAssessment>) -> RiskAssessment {
        let decision = self.decide(model.as_ref());
        match (decision, model) {
            (Reconciliation::Model, Some(model)) => model,
            (Reconciliation::Blend, Some(model)) => blend(&rule, &model),
            _ => rule,
        }
    }
}

/// Average score and confidence, keep the more severe level and the rule factors.
pub fn blend(rule: &RiskAssessment, model: &RiskAssessment) -> RiskAssessment {
    RiskAssessment {
        risk_level: rule.risk_level.max(model.risk_level),
        risk_score: (rule.risk_score + model.risk_score) / 2.0,
        confidence: (rule.confidence + model.confidence) / 2.0,
        contributing_factors: rule.contributing_factors.clone(),
        method: AssessmentMethod::Combined,
    }
}

//! Hybrid pest-risk predictor.

use std::sync::Arc;

use chrono::Utc;

use oa_protocol::{
    EnvironmentalReading, FallbackReport, FarmData, MissingDataError, PredictionOutcome,
    RiskAssessment, RiskReport,
};

use crate::advice;
use crate::error::{RiskError, RiskResult};
use crate::knowledge::PestKnowledgeBase;
use crate::model::RiskModel;
use crate::pests;
use crate::reconcile::ReconcilePolicy;
use crate::rules;

/// Rules plus an optional trained model and knowledge base, all read-only.
#[derive(Debug, Clone, Default)]
pub struct HybridPredictor {
    model: Option<Arc<dyn RiskModel>>,
    knowledge: Option<Arc<PestKnowledgeBase>>,
    policy: ReconcilePolicy,
}

impl HybridPredictor {
    /// Rule-only predictor with no knowledge base.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: Arc<dyn RiskModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_knowledge(mut self, knowledge: Arc<PestKnowledgeBase>) -> Self {
        self.knowledge = Some(knowledge);
        self
    }

    pub fn with_policy(mut self, policy: ReconcilePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn knowledge(&self) -> Option<&PestKnowledgeBase> {
        self.knowledge.as_deref()
    }

    /// Predict pest risk. Never fails: an unusable reading yields the
    /// tagged fallback outcome.
    pub fn predict(&self, reading: &EnvironmentalReading) -> PredictionOutcome {
        match self.try_predict(reading) {
            Ok(report) => {
                tracing::debug!(
                    level = %report.assessment.risk_level,
                    method = ?report.assessment.method,
                    confidence = report.assessment.confidence,
                    "pest risk predicted"
                );
                PredictionOutcome::Assessed(report)
            }
            Err(e) => {
                tracing::error!(error = %e, "pest risk prediction failed, using fallback");
                PredictionOutcome::Fallback(FallbackReport::new(e.to_string()))
            }
        }
    }

    /// Convert caller farm data to a reading first; absent fields are rejected.
    pub fn predict_from_farm_data(
        &self,
        data: &FarmData,
    ) -> Result<PredictionOutcome, MissingDataError> {
        let reading = data.reading()?;
        Ok(self.predict(&reading))
    }

    pub fn try_predict(&self, reading: &EnvironmentalReading) -> RiskResult<RiskReport> {
        if !reading.is_finite() {
            return Err(RiskError::InvalidReading(format!(
                "non-finite value in {reading:?}"
            )));
        }

        let rule = rules::score(reading);
        let model = self.model_assessment(reading);
        let assessment = self.policy.reconcile(rule, model);

        let knowledge = self.knowledge();
        let per_pest = pests::analyze(reading, knowledge);
        let recommendations = advice::recommendations(assessment.risk_level, &per_pest, knowledge);
        let monitoring_advice = advice::monitoring_advice(reading.season, assessment.risk_level);

        Ok(RiskReport {
            assessment,
            per_pest,
            recommendations,
            monitoring_advice,
            predicted_at: Utc::now(),
        })
    }

    /// Model verdict, or `None` when there is no model or it failed.
    fn model_assessment(&self, reading: &EnvironmentalReading) -> Option<RiskAssessment> {
        let model = self.model.as_ref()?;
        match model.predict(reading) {
            Ok(prediction) => Some(prediction.assessment()),
            Err(e) => {
                tracing::warn!(model = model.name(), error = %e, "model prediction failed, using rules only");
                None
            }
        }
    }
}

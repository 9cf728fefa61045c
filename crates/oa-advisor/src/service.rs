//! Advisory service: classify, predict, advise, reply.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use oa_classifier::{Lexicon, QueryClassifier, followup_questions};
use oa_protocol::{
    Classification, Domain, FarmData, MissingDataError, PredictionOutcome, PredictionType,
};
use oa_risk::{HybridPredictor, ModelBundle, PestKnowledgeBase, ReconcilePolicy};

use crate::advisor::{AdviceContext, DomainAdvice, DomainAdvisor};
use crate::config::AdvisorConfig;
use crate::llm::{ChatCompletionsClient, TextGenerator};
use crate::prompts;

/// Recommendations quoted in the combined reply.
const TOP_RECOMMENDATIONS: usize = 3;

/// Where the conversational text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Model,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationalReply {
    pub text: String,
    pub source: ReplySource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Pest-risk part of a chat reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PestRiskSection {
    Predicted(PredictionOutcome),
    /// Farm data was supplied but lacked required fields.
    Unavailable(MissingDataError),
}

impl PestRiskSection {
    pub fn outcome(&self) -> Option<&PredictionOutcome> {
        match self {
            Self::Predicted(outcome) => Some(outcome),
            Self::Unavailable(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub conversation_id: Uuid,
    pub user_query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub classification: Classification,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pest_risk: Option<PestRiskSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_advice: Option<DomainAdvice>,
    pub reply: ConversationalReply,
    /// Markdown combining the reply, risk summary and expert advice.
    pub final_response: String,
    pub followup_questions: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl ChatReply {
    pub fn domain(&self) -> Domain {
        self.classification.domain
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub recommendation: String,
    pub explanation: String,
    pub source: ReplySource,
    pub timestamp: DateTime<Utc>,
}

/// Stateless orchestrator over read-only components.
#[derive(Clone)]
pub struct AdvisorService {
    classifier: QueryClassifier,
    predictor: HybridPredictor,
    advisor: DomainAdvisor,
    llm: Option<Arc<dyn TextGenerator>>,
}

impl Default for AdvisorService {
    fn default() -> Self {
        Self::new(
            QueryClassifier::default(),
            HybridPredictor::new(),
            DomainAdvisor::new(),
        )
    }
}

impl AdvisorService {
    /// Service without a language model; replies use canned text.
    pub fn new(
        classifier: QueryClassifier,
        predictor: HybridPredictor,
        advisor: DomainAdvisor,
    ) -> Self {
        Self {
            classifier,
            predictor,
            advisor,
            llm: None,
        }
    }

    pub fn with_llm(mut self, llm: Arc<dyn TextGenerator>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Build every component from config. A bad lexicon override is fatal;
    /// a missing or unreadable knowledge base or model bundle is not.
    pub fn from_config(config: &AdvisorConfig) -> anyhow::Result<Self> {
        let lexicon = match &config.knowledge.lexicon_path {
            Some(path) => Lexicon::from_file(path)?,
            None => Lexicon::builtin(),
        };
        let classifier = QueryClassifier::new(Arc::new(lexicon));

        let knowledge = config
            .knowledge
            .pest_knowledge_path
            .as_deref()
            .and_then(|path| match PestKnowledgeBase::from_file(path) {
                Ok(kb) => Some(Arc::new(kb)),
                Err(e) => {
                    tracing::warn!(path, error = %e, "pest knowledge base unavailable");
                    None
                }
            });

        let mut predictor = HybridPredictor::new().with_policy(ReconcilePolicy {
            trust_model_above: config.trust_model_above,
        });
        let mut advisor = DomainAdvisor::new();
        if let Some(kb) = &knowledge {
            predictor = predictor.with_knowledge(Arc::clone(kb));
            advisor = advisor.with_knowledge(Arc::clone(kb));
        }

        if let Some(path) = config.knowledge.model_bundle_path.as_deref() {
            match ModelBundle::from_file(path) {
                Ok(bundle) => predictor = predictor.with_model(Arc::new(bundle)),
                Err(e) => {
                    tracing::warn!(path, error = %e, "risk model unavailable, using rules only");
                }
            }
        }

        let mut service = Self::new(classifier, predictor, advisor);
        if config.llm.enabled {
            service = service.with_llm(Arc::new(ChatCompletionsClient::new(config.llm.clone())));
        } else {
            tracing::info!("language model disabled");
        }

        tracing::info!(
            model = service.predictor.has_model(),
            knowledge = knowledge.is_some(),
            llm = service.llm.is_some(),
            "advisor service ready"
        );
        Ok(service)
    }

    pub fn classifier(&self) -> &QueryClassifier {
        &self.classifier
    }

    pub fn predictor(&self) -> &HybridPredictor {
        &self.predictor
    }

    pub fn classify(&self, query: &str, context: Option<&FarmData>) -> Classification {
        self.classifier.classify(query, context)
    }

    pub fn predict(&self, farm_data: &FarmData) -> Result<PredictionOutcome, MissingDataError> {
        self.predictor.predict_from_farm_data(farm_data)
    }

    /// Answer one message end to end. Never fails: every stage has a fallback.
    pub async fn chat(
        &self,
        message: &str,
        farm_data: Option<&FarmData>,
        user_id: Option<&str>,
    ) -> ChatReply {
        let classification = self.classifier.classify(message, farm_data);
        let domain = classification.domain;

        let pest_risk = self.pest_risk(&classification, farm_data);

        let query = message.to_lowercase();
        let domain_advice = self.advisor.advise(
            domain,
            &AdviceContext {
                query: &query,
                parameters: &classification.parameters,
                farm_data,
            },
        );

        let prediction = pest_risk.as_ref().and_then(PestRiskSection::outcome);
        let reply = self
            .conversational_reply(domain, message, farm_data, prediction)
            .await;

        let final_response = combine(&reply.text, pest_risk.as_ref(), domain_advice.as_ref());

        tracing::info!(
            %domain,
            intent = %classification.intent,
            prediction = pest_risk.is_some(),
            advice = domain_advice.is_some(),
            reply_source = ?reply.source,
            "chat answered"
        );

        ChatReply {
            conversation_id: Uuid::now_v7(),
            user_query: message.to_string(),
            user_id: user_id.map(str::to_string),
            followup_questions: followup_questions(domain),
            classification,
            pest_risk,
            domain_advice,
            reply,
            final_response,
            timestamp: Utc::now(),
        }
    }

    /// Explain a recommendation, with canned text when the model is unavailable.
    pub async fn explain_recommendation(
        &self,
        recommendation: &str,
        context: Option<&serde_json::Value>,
    ) -> Explanation {
        let generated = match &self.llm {
            Some(llm) => {
                llm.generate(
                    prompts::EXPLAIN_SYSTEM_PROMPT,
                    &prompts::explain_message(recommendation, context),
                )
                .await
            }
            None => None,
        };

        let (explanation, source) = match generated {
            Some(text) => (text, ReplySource::Model),
            None => (
                prompts::fallback_explanation(recommendation),
                ReplySource::Fallback,
            ),
        };

        Explanation {
            recommendation: recommendation.to_string(),
            explanation,
            source,
            timestamp: Utc::now(),
        }
    }

    /// Pest risk runs only when the query asks for it and farm data is present.
    fn pest_risk(
        &self,
        classification: &Classification,
        farm_data: Option<&FarmData>,
    ) -> Option<PestRiskSection> {
        if !classification.response_strategy.use_ml_predictions
            || !classification.needs(PredictionType::PestRisk)
        {
            return None;
        }
        let data = farm_data?;
        match self.predictor.predict_from_farm_data(data) {
            Ok(outcome) => Some(PestRiskSection::Predicted(outcome)),
            Err(missing) => {
                tracing::info!(missing = ?missing.missing, "farm data incomplete for pest risk");
                Some(PestRiskSection::Unavailable(missing))
            }
        }
    }

    async fn conversational_reply(
        &self,
        domain: Domain,
        message: &str,
        farm_data: Option<&FarmData>,
        prediction: Option<&PredictionOutcome>,
    ) -> ConversationalReply {
        if let Some(llm) = &self.llm {
            let system = prompts::system_prompt(domain, prediction);
            let user = prompts::user_message(message, farm_data);
            if let Some(text) = llm.generate(&system, &user).await {
                return ConversationalReply {
                    text,
                    source: ReplySource::Model,
                    model: Some(llm.model_name().to_string()),
                };
            }
            tracing::warn!(%domain, "language model unavailable, using canned reply");
        }
        ConversationalReply {
            text: prompts::fallback_reply(domain).to_string(),
            source: ReplySource::Fallback,
            model: None,
        }
    }
}

/// Reply text, pest-risk summary, then expert advice.
fn combine(
    reply: &str,
    pest_risk: Option<&PestRiskSection>,
    advice: Option<&DomainAdvice>,
) -> String {
    let mut parts = vec![reply.to_string()];

    match pest_risk {
        Some(PestRiskSection::Predicted(outcome)) => {
            let mut risk = format!(
                "**Current Pest Risk Analysis:**\nRisk Level: {}\nConfidence: {:.0}%",
                outcome.risk_level().title(),
                outcome.confidence() * 100.0
            );
            if let PredictionOutcome::Fallback(fallback) = outcome {
                risk.push_str(&format!("\nDefault estimate: {}", fallback.reason));
            }
            parts.push(risk);

            let recommendations = outcome.recommendations();
            if !recommendations.is_empty() {
                let mut recs = String::from("**Immediate Recommendations:**");
                for rec in recommendations.iter().take(TOP_RECOMMENDATIONS) {
                    recs.push_str("\n- ");
                    recs.push_str(rec);
                }
                parts.push(recs);
            }
        }
        Some(PestRiskSection::Unavailable(missing)) => {
            parts.push(format!(
                "**Pest Risk Analysis Unavailable:**\nMissing farm data: {}",
                missing.missing.join(", ")
            ));
        }
        None => {}
    }

    if let Some(advice) = advice {
        parts.push(format!("**Expert Advice:**\n{}", advice.advice));
    }

    parts.join("\n\n")
}

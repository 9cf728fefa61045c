//! Query classifier: scores a free-text question against the lexicon.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;

use oa_protocol::{
    Classification, ClassificationOrigin, Domain, FarmData, Intent, PredictionType,
    PrimaryMethod, ResponseStrategy,
};

use crate::error::ClassifierResult;
use crate::lexicon::Lexicon;
use crate::params::extract_parameters;

/// Keyword/pattern classifier over a shared, read-only lexicon.
#[derive(Debug, Clone)]
pub struct QueryClassifier {
    lexicon: Arc<Lexicon>,
}

impl QueryClassifier {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Classify a query. Never fails: internal errors yield the fixed
    /// fallback classification.
    pub fn classify(&self, query: &str, context: Option<&FarmData>) -> Classification {
        settle(self.try_classify(query, context))
    }

    /// Classify a query, surfacing internal errors instead of falling back.
    pub fn try_classify(
        &self,
        query: &str,
        context: Option<&FarmData>,
    ) -> ClassifierResult<Classification> {
        let lower = query.to_lowercase();
        if let Some(data) = context {
            tracing::trace!(provided = ?data.provided_fields(), "classifying with farm context");
        }

        let domain = self.classify_domain(&lower);
        let intent = self.classify_intent(&lower);
        let prediction_needs = self.prediction_needs(&lower);
        let response_strategy = response_strategy(intent, &prediction_needs);
        let parameters = extract_parameters(&lower, &self.lexicon)?;
        let confidence = confidence(domain, intent, &prediction_needs);

        Ok(Classification {
            domain,
            intent,
            prediction_needs,
            response_strategy,
            parameters,
            confidence,
            classified_at: Utc::now(),
            origin: ClassificationOrigin::Scored,
        })
    }

    /// Keyword score for every lexicon domain, in declaration order.
    pub fn domain_scores(&self, query: &str) -> Vec<(Domain, u32)> {
        let whole = query.trim();
        self.lexicon
            .domains()
            .iter()
            .map(|(domain, keywords)| {
                let score: u32 = keywords
                    .iter()
                    .filter(|keyword| query.contains(keyword.as_str()))
                    .map(|keyword| keyword_weight(keyword, whole))
                    .sum();
                (*domain, score)
            })
            .collect()
    }

    fn classify_domain(&self, query: &str) -> Domain {
        let mut best = (Domain::General, 0);
        for (domain, score) in self.domain_scores(query) {
            if score > best.1 {
                best = (domain, score);
            }
        }
        best.0
    }

    fn classify_intent(&self, query: &str) -> Intent {
        for (intent, patterns) in self.lexicon.intents() {
            if patterns.iter().any(|re| re.is_match(query)) {
                return *intent;
            }
        }

        if query.contains('?') {
            Intent::InformationRequest
        } else if matches_any(query, self.lexicon.help_words()) {
            Intent::AdviceRequest
        } else {
            Intent::GeneralInquiry
        }
    }

    fn prediction_needs(&self, query: &str) -> BTreeSet<PredictionType> {
        let mut needs: BTreeSet<PredictionType> = self
            .lexicon
            .prediction_triggers()
            .iter()
            .filter(|(_, phrases)| matches_any(query, phrases))
            .map(|(prediction, _)| *prediction)
            .collect();

        // "should I spray", "is it time to harvest": only the first action group counts
        if matches_any(query, self.lexicon.implicit_prompts())
            && let Some((prediction, _)) = self
                .lexicon
                .implicit_actions()
                .iter()
                .find(|(_, actions)| matches_any(query, actions))
        {
            needs.insert(*prediction);
        }

        needs
    }
}

impl Default for QueryClassifier {
    fn default() -> Self {
        Self::new(Arc::new(Lexicon::builtin()))
    }
}

fn matches_any(text: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| text.contains(n.as_str()))
}

/// Whole-query match 3, multi-word phrase 2, single word 1.
fn keyword_weight(keyword: &str, whole_query: &str) -> u32 {
    if keyword == whole_query {
        3
    } else if keyword.contains(char::is_whitespace) {
        2
    } else {
        1
    }
}

/// Unwrap a classification attempt, logging and replacing errors with
/// the fixed fallback.
fn settle(result: ClassifierResult<Classification>) -> Classification {
    match result {
        Ok(classification) => {
            tracing::debug!(
                domain = %classification.domain,
                intent = %classification.intent,
                needs = classification.prediction_needs.len(),
                confidence = classification.confidence,
                "query classified"
            );
            classification
        }
        Err(e) => {
            tracing::error!(error = %e, "query classification failed, using fallback");
            Classification::fallback()
        }
    }
}

/// Derive the reply strategy from intent and prediction needs.
pub fn response_strategy(
    intent: Intent,
    prediction_needs: &BTreeSet<PredictionType>,
) -> ResponseStrategy {
    let mut strategy = ResponseStrategy {
        use_ml_predictions: !prediction_needs.is_empty(),
        ..Default::default()
    };

    if !prediction_needs.is_empty() {
        strategy.primary_method = PrimaryMethod::MlPrediction;
        strategy.requires_farm_data = true;
    }

    match intent {
        Intent::ProblemSolving => {
            strategy.primary_method = PrimaryMethod::Hybrid;
            strategy.use_ml_predictions = true;
            strategy.use_knowledge_base = true;
        }
        Intent::ComparisonRequest => {
            strategy.primary_method = PrimaryMethod::KnowledgeBase;
        }
        _ => {}
    }

    strategy
}

/// 0.5 base, +0.2 specific domain, +0.2 clear intent, +0.1 prediction needs.
pub fn confidence(
    domain: Domain,
    intent: Intent,
    prediction_needs: &BTreeSet<PredictionType>,
) -> f64 {
    let mut confidence: f64 = 0.5;
    if domain != Domain::General {
        confidence += 0.2;
    }
    if intent.is_clear() {
        confidence += 0.2;
    }
    if !prediction_needs.is_empty() {
        confidence += 0.1;
    }
    confidence.min(1.0)
}

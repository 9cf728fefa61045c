//! Domain/intent lexicon: the keyword, pattern and trigger tables the
//! classifier scores against.
//!
//! `LexiconConfig` is plain serde data with a built-in default and can be
//! overridden from a TOML file. `Lexicon` is the compiled, immutable form:
//! keywords lowercased, intent patterns compiled case-insensitively.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use oa_protocol::{Domain, Intent, PredictionType};

use crate::error::{ClassifierError, ClassifierResult};

/// Keywords that vote for one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainKeywords {
    pub domain: Domain,
    pub keywords: Vec<String>,
}

/// Regex patterns that identify one intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentPatterns {
    pub intent: Intent,
    pub patterns: Vec<String>,
}

/// Phrases that signal a prediction type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPhrases {
    pub prediction: PredictionType,
    pub phrases: Vec<String>,
}

/// Serializable lexicon tables. Missing sections fall back to the built-in set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconConfig {
    /// Declaration order is the domain tie-break order.
    pub domains: Vec<DomainKeywords>,
    /// Declaration order is the intent scan order.
    pub intents: Vec<IntentPatterns>,
    pub prediction_triggers: Vec<PredictionPhrases>,
    /// Words that make an unmatched query an advice request.
    pub help_words: Vec<String>,
    /// Decision phrases ("should i") that arm the implicit triggers.
    pub implicit_prompts: Vec<String>,
    /// Action words checked in order once an implicit prompt is present.
    pub implicit_actions: Vec<PredictionPhrases>,
    pub varieties: Vec<String>,
    pub urgency_words: Vec<String>,
}

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn domain(domain: Domain, keywords: &[&str]) -> DomainKeywords {
    DomainKeywords {
        domain,
        keywords: words(keywords),
    }
}

fn intent(intent: Intent, patterns: &[&str]) -> IntentPatterns {
    IntentPatterns {
        intent,
        patterns: words(patterns),
    }
}

fn phrases(prediction: PredictionType, phrases: &[&str]) -> PredictionPhrases {
    PredictionPhrases {
        prediction,
        phrases: words(phrases),
    }
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            domains: vec![
                domain(
                    Domain::Planting,
                    &[
                        "plant",
                        "planting",
                        "seed",
                        "seedling",
                        "transplant",
                        "spacing",
                        "site selection",
                        "soil preparation",
                        "variety",
                        "cultivar",
                        "establishment",
                        "when to plant",
                        "how to plant",
                        "planting time",
                    ],
                ),
                domain(
                    Domain::PestManagement,
                    &[
                        "pest",
                        "insect",
                        "bug",
                        "borer",
                        "scale",
                        "stink bug",
                        "aphid",
                        "damage",
                        "infestation",
                        "spray",
                        "treatment",
                        "control",
                        "organic pesticide",
                        "beneficial insects",
                        "ipm",
                        "monitoring",
                    ],
                ),
                domain(
                    Domain::Fertilization,
                    &[
                        "fertilizer",
                        "fertilize",
                        "nutrition",
                        "nutrient",
                        "compost",
                        "organic matter",
                        "nitrogen",
                        "phosphorus",
                        "potassium",
                        "soil test",
                        "ph level",
                        "amendment",
                        "feeding",
                        "foliar",
                    ],
                ),
                domain(
                    Domain::Harvesting,
                    &[
                        "harvest",
                        "harvesting",
                        "picking",
                        "collection",
                        "maturity",
                        "ripe",
                        "ready",
                        "timing",
                        "when to harvest",
                        "nut drop",
                        "processing",
                        "drying",
                        "storage",
                        "quality",
                    ],
                ),
                domain(
                    Domain::Certification,
                    &[
                        "organic",
                        "certification",
                        "certified",
                        "standards",
                        "inspection",
                        "transition",
                        "approved inputs",
                        "record keeping",
                        "compliance",
                        "certifier",
                        "omri",
                        "usda organic",
                    ],
                ),
                domain(
                    Domain::General,
                    &[
                        "macadamia",
                        "tree",
                        "orchard",
                        "farm",
                        "farming",
                        "growing",
                        "care",
                        "maintenance",
                        "pruning",
                        "irrigation",
                        "water",
                    ],
                ),
            ],
            intents: vec![
                intent(
                    Intent::PredictionRequest,
                    &[
                        r"predict",
                        r"forecast",
                        r"estimate",
                        r"expect",
                        r"likely",
                        r"what will",
                        r"how much",
                        r"when will",
                        r"is it time",
                        r"ready for",
                        r"risk of",
                    ],
                ),
                intent(
                    Intent::AdviceRequest,
                    &[
                        r"how to",
                        r"how do i",
                        r"what should",
                        r"should i",
                        r"recommend",
                        r"best way",
                        r"advice",
                        r"suggest",
                        r"help me",
                        r"guide",
                        r"tips",
                    ],
                ),
                intent(
                    Intent::InformationRequest,
                    &[
                        r"what is",
                        r"what are",
                        r"tell me about",
                        r"explain",
                        r"describe",
                        r"information",
                        r"learn about",
                        r"understand",
                    ],
                ),
                intent(
                    Intent::ProblemSolving,
                    &[
                        r"problem",
                        r"issue",
                        r"trouble",
                        r"wrong",
                        r"help",
                        r"fix",
                        r"solve",
                        r"disease",
                        r"dying",
                        r"yellowing",
                    ],
                ),
                intent(
                    Intent::ComparisonRequest,
                    &[
                        r"compare",
                        r"difference",
                        r"better",
                        r"versus",
                        r"\bvs\b",
                        r"which",
                        r"choose",
                        r"select",
                        r"prefer",
                    ],
                ),
            ],
            prediction_triggers: vec![
                phrases(
                    PredictionType::PestRisk,
                    &[
                        "pest risk",
                        "insect damage",
                        "spray schedule",
                        "pest forecast",
                        "bug problem",
                        "infestation risk",
                        "pest pressure",
                    ],
                ),
                phrases(
                    PredictionType::FertilizerNeed,
                    &[
                        "fertilizer need",
                        "nutrient requirement",
                        "feeding schedule",
                        "fertilize now",
                        "nutrition status",
                        "soil fertility",
                    ],
                ),
                phrases(
                    PredictionType::HarvestTiming,
                    &[
                        "harvest time",
                        "ready to harvest",
                        "harvest schedule",
                        "maturity",
                        "when to pick",
                        "harvest forecast",
                    ],
                ),
                phrases(
                    PredictionType::YieldPrediction,
                    &[
                        "yield estimate",
                        "production forecast",
                        "expected harvest",
                        "crop yield",
                        "how much yield",
                        "production estimate",
                    ],
                ),
            ],
            help_words: words(&["help", "how", "what", "when", "where", "why"]),
            implicit_prompts: words(&["should i", "is it time", "when to"]),
            implicit_actions: vec![
                phrases(PredictionType::PestRisk, &["spray", "treat"]),
                phrases(PredictionType::FertilizerNeed, &["fertilize", "feed"]),
                phrases(PredictionType::HarvestTiming, &["harvest", "pick"]),
            ],
            varieties: words(&["beaumont", "a4", "a16", "a38", "own venture", "daddow"]),
            urgency_words: words(&["urgent", "emergency", "immediate", "asap", "quickly"]),
        }
    }
}

/// Compiled, immutable lexicon.
#[derive(Debug, Clone)]
pub struct Lexicon {
    domains: Vec<(Domain, Vec<String>)>,
    intents: Vec<(Intent, Vec<Regex>)>,
    prediction_triggers: Vec<(PredictionType, Vec<String>)>,
    help_words: Vec<String>,
    implicit_prompts: Vec<String>,
    implicit_actions: Vec<(PredictionType, Vec<String>)>,
    varieties: Vec<String>,
    urgency_words: Vec<String>,
}

impl Lexicon {
    /// The built-in farming lexicon.
    pub fn builtin() -> Self {
        Self::from_config(LexiconConfig::default()).expect("built-in lexicon is valid")
    }

    /// Validate and compile a lexicon configuration.
    pub fn from_config(config: LexiconConfig) -> ClassifierResult<Self> {
        let mut seen = HashSet::new();
        for entry in &config.domains {
            if !seen.insert(entry.domain) {
                return Err(ClassifierError::Config(format!(
                    "domain {} declared more than once",
                    entry.domain
                )));
            }
        }

        let domains = config
            .domains
            .into_iter()
            .map(|entry| {
                let context = format!("domain {}", entry.domain);
                Ok((entry.domain, normalize(entry.keywords, &context)?))
            })
            .collect::<ClassifierResult<Vec<_>>>()?;

        let intents = config
            .intents
            .into_iter()
            .map(|entry| {
                let compiled = entry
                    .patterns
                    .iter()
                    .map(|pattern| compile_pattern(entry.intent, pattern))
                    .collect::<ClassifierResult<Vec<_>>>()?;
                Ok((entry.intent, compiled))
            })
            .collect::<ClassifierResult<Vec<_>>>()?;

        Ok(Self {
            domains,
            intents,
            prediction_triggers: normalize_phrases(config.prediction_triggers)?,
            help_words: normalize(config.help_words, "help_words")?,
            implicit_prompts: normalize(config.implicit_prompts, "implicit_prompts")?,
            implicit_actions: normalize_phrases(config.implicit_actions)?,
            varieties: normalize(config.varieties, "varieties")?,
            urgency_words: normalize(config.urgency_words, "urgency_words")?,
        })
    }

    /// Parse a TOML lexicon; omitted sections keep their built-in values.
    pub fn from_toml_str(contents: &str) -> ClassifierResult<Self> {
        let config: LexiconConfig =
            toml::from_str(contents).map_err(|e| ClassifierError::Config(e.to_string()))?;
        Self::from_config(config)
    }

    /// Load a TOML lexicon from disk.
    pub fn from_file(path: &str) -> ClassifierResult<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ClassifierError::Io(format!("{path}: {e}")))?;
        Self::from_toml_str(&contents)
    }

    pub fn domains(&self) -> &[(Domain, Vec<String>)] {
        &self.domains
    }

    pub fn intents(&self) -> &[(Intent, Vec<Regex>)] {
        &self.intents
    }

    pub fn prediction_triggers(&self) -> &[(PredictionType, Vec<String>)] {
        &self.prediction_triggers
    }

    pub fn help_words(&self) -> &[String] {
        &self.help_words
    }

    pub fn implicit_prompts(&self) -> &[String] {
        &self.implicit_prompts
    }

    pub fn implicit_actions(&self) -> &[(PredictionType, Vec<String>)] {
        &self.implicit_actions
    }

    pub fn varieties(&self) -> &[String] {
        &self.varieties
    }

    pub fn urgency_words(&self) -> &[String] {
        &self.urgency_words
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Lowercase and trim every entry; an empty entry would match every query.
fn normalize(items: Vec<String>, context: &str) -> ClassifierResult<Vec<String>> {
    items
        .into_iter()
        .map(|item| {
            let item = item.trim().to_lowercase();
            if item.is_empty() {
                Err(ClassifierError::Config(format!("empty entry in {context}")))
            } else {
                Ok(item)
            }
        })
        .collect()
}

fn normalize_phrases(
    entries: Vec<PredictionPhrases>,
) -> ClassifierResult<Vec<(PredictionType, Vec<String>)>> {
    entries
        .into_iter()
        .map(|entry| {
            let context = format!("phrases for {}", entry.prediction.as_str());
            Ok((entry.prediction, normalize(entry.phrases, &context)?))
        })
        .collect()
}

fn compile_pattern(intent: Intent, pattern: &str) -> ClassifierResult<Regex> {
    let invalid = |message: String| ClassifierError::InvalidPattern {
        intent: intent.to_string(),
        pattern: pattern.to_string(),
        message,
    };
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| invalid(e.to_string()))?;
    if regex.is_match("") {
        return Err(invalid("pattern matches the empty string".into()));
    }
    Ok(regex)
}

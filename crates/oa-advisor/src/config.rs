//! Advisor configuration, loadable from TOML.

use serde::Deserialize;

use crate::history::DEFAULT_CAPACITY;
use crate::llm::LlmConfig;

/// Top-level configuration for the advisor service.
#[derive(Debug, Clone, Deserialize)]
pub struct AdvisorConfig {
    /// Data files loaded once at startup.
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    /// Hosted language-model settings.
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    /// Model confidence above which its verdict replaces the rules.
    #[serde(default = "default_trust_model_above")]
    pub trust_model_above: f64,
}

fn default_trust_model_above() -> f64 {
    0.8
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            knowledge: KnowledgeConfig::default(),
            llm: LlmConfig::default(),
            history: HistoryConfig::default(),
            trust_model_above: default_trust_model_above(),
        }
    }
}

/// Paths to optional data files. Any of them may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KnowledgeConfig {
    /// Pest knowledge base (JSON).
    #[serde(default)]
    pub pest_knowledge_path: Option<String>,
    /// Trained risk-model bundle (JSON).
    #[serde(default)]
    pub model_bundle_path: Option<String>,
    /// Classifier lexicon override (TOML).
    #[serde(default)]
    pub lexicon_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Entries kept before the oldest is evicted.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

impl AdvisorConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(contents)?;
        Ok(config)
    }
}

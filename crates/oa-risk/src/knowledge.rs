//! Pest knowledge base loaded from JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use oa_protocol::PestKind;

use crate::error::{RiskError, RiskResult};

/// Reference text for one pest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PestProfile {
    pub description: String,
    pub symptoms: Vec<String>,
    pub organic_treatments: Vec<String>,
    pub prevention: Vec<String>,
    pub timing: String,
}

/// `{"common_pests": {"<pest_key>": {...}}}`. Unknown top-level sections are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PestKnowledgeBase {
    #[serde(default)]
    pub common_pests: BTreeMap<String, PestProfile>,
}

impl PestKnowledgeBase {
    pub fn from_json_str(contents: &str) -> RiskResult<Self> {
        serde_json::from_str(contents).map_err(|e| RiskError::KnowledgeBase(e.to_string()))
    }

    pub fn from_file(path: &str) -> RiskResult<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| RiskError::Io(format!("{path}: {e}")))?;
        let kb = Self::from_json_str(&contents)?;
        tracing::info!(path, pests = kb.common_pests.len(), "pest knowledge base loaded");
        Ok(kb)
    }

    /// Profile by knowledge-base key, e.g. `"stink_bugs"`.
    pub fn profile(&self, key: &str) -> Option<&PestProfile> {
        self.common_pests.get(key)
    }

    pub fn pest(&self, kind: PestKind) -> Option<&PestProfile> {
        self.profile(kind.key())
    }

    /// Non-empty description for a pest.
    pub fn description(&self, kind: PestKind) -> Option<&str> {
        self.pest(kind)
            .map(|p| p.description.as_str())
            .filter(|d| !d.is_empty())
    }

    /// First listed organic treatment for a pest.
    pub fn first_treatment(&self, kind: PestKind) -> Option<&str> {
        self.pest(kind)
            .and_then(|p| p.organic_treatments.first())
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.common_pests.is_empty()
    }
}

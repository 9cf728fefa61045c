//! Trained risk models.
//!
//! `RiskModel` is the seam the predictor calls; `ModelBundle` is the
//! shipped implementation, a random-forest classifier exported to JSON
//! together with its season/label encodings and feature scaler:
//!
//! ```json
//! {
//!   "season_classes": ["spring", "summer", "autumn", "winter"],
//!   "label_classes": ["very_low", "low", "medium", "high", "very_high"],
//!   "scaler": { "mean": [6.2, 24.0, 70.0, 120.0, 1.5, 8.0], "scale": [0.5, 4.0, 10.0, 60.0, 1.1, 5.0] },
//!   "forest": { "trees": [ { "nodes": [
//!     { "split": { "feature": 1, "threshold": 0.3, "left": 1, "right": 2 } },
//!     { "leaf": { "value": [10, 30, 5, 0, 0] } },
//!     { "leaf": { "value": [0, 0, 5, 20, 15] } }
//!   ] } ] }
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use oa_protocol::{AssessmentMethod, EnvironmentalReading, RiskAssessment, RiskLevel, Season};

use crate::error::{RiskError, RiskResult};

/// Feature order: soil_ph, temperature, humidity, rainfall, season code, tree_age.
pub const FEATURE_COUNT: usize = 6;

/// A statistical classifier over environmental readings.
pub trait RiskModel: Send + Sync + fmt::Debug {
    /// Predict a risk level and its class probability.
    fn predict(&self, reading: &EnvironmentalReading) -> RiskResult<ModelPrediction>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// Most probable class and its probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPrediction {
    pub risk_level: RiskLevel,
    pub probability: f64,
}

impl ModelPrediction {
    /// Model output as an assessment: score and confidence are both the
    /// winning class probability.
    pub fn assessment(&self) -> RiskAssessment {
        RiskAssessment {
            risk_level: self.risk_level,
            risk_score: self.probability,
            confidence: self.probability,
            contributing_factors: Vec::new(),
            method: AssessmentMethod::MachineLearning,
        }
    }
}

fn default_season_classes() -> Vec<Season> {
    vec![Season::Spring, Season::Summer, Season::Autumn, Season::Winter]
}

fn default_label_classes() -> Vec<RiskLevel> {
    RiskLevel::ALL.to_vec()
}

/// Standardization parameters: `(x - mean) / scale` per feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// Go to `left` when `features[feature] <= threshold`, else `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Per-class sample counts (or weights) at this leaf.
    Leaf { value: Vec<f64> },
}

/// One decision tree; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forest {
    pub trees: Vec<DecisionTree>,
}

/// Random-forest risk classifier with its encoders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    /// Season encoding: a season's code is its index here.
    #[serde(default = "default_season_classes")]
    pub season_classes: Vec<Season>,
    /// Class index to risk level.
    #[serde(default = "default_label_classes")]
    pub label_classes: Vec<RiskLevel>,
    #[serde(default)]
    pub scaler: Option<FeatureScaler>,
    pub forest: Forest,
}

impl ModelBundle {
    /// Parse and validate a JSON bundle.
    pub fn from_json_str(contents: &str) -> RiskResult<Self> {
        let bundle: Self =
            serde_json::from_str(contents).map_err(|e| RiskError::Parse(e.to_string()))?;
        bundle.validate()?;
        Ok(bundle)
    }

    /// Load a JSON bundle from disk.
    pub fn from_file(path: &str) -> RiskResult<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| RiskError::Io(format!("{path}: {e}")))?;
        let bundle = Self::from_json_str(&contents)?;
        tracing::info!(
            path,
            trees = bundle.forest.trees.len(),
            classes = bundle.label_classes.len(),
            "risk model bundle loaded"
        );
        Ok(bundle)
    }

    /// Structural checks; a validated bundle never indexes out of bounds.
    pub fn validate(&self) -> RiskResult<()> {
        let classes = self.label_classes.len();
        if classes == 0 {
            return Err(RiskError::Model("label_classes is empty".into()));
        }
        if self.season_classes.is_empty() {
            return Err(RiskError::Model("season_classes is empty".into()));
        }
        if self.forest.trees.is_empty() {
            return Err(RiskError::Model("forest has no trees".into()));
        }

        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != FEATURE_COUNT || scaler.scale.len() != FEATURE_COUNT {
                return Err(RiskError::Model(format!(
                    "scaler must have {FEATURE_COUNT} mean and scale entries"
                )));
            }
            if scaler.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
                return Err(RiskError::Model("scaler has a zero or non-finite scale".into()));
            }
        }

        for (t, tree) in self.forest.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(RiskError::Model(format!("tree {t} has no nodes")));
            }
            for (n, node) in tree.nodes.iter().enumerate() {
                match node {
                    TreeNode::Split {
                        feature,
                        left,
                        right,
                        ..
                    } => {
                        if *feature >= FEATURE_COUNT {
                            return Err(RiskError::Model(format!(
                                "tree {t} node {n}: feature {feature} out of range"
                            )));
                        }
                        if *left >= tree.nodes.len() || *right >= tree.nodes.len() {
                            return Err(RiskError::Model(format!(
                                "tree {t} node {n}: child index out of range"
                            )));
                        }
                    }
                    TreeNode::Leaf { value } => {
                        if value.len() != classes {
                            return Err(RiskError::Model(format!(
                                "tree {t} node {n}: leaf has {} values, expected {classes}",
                                value.len()
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Encode a reading into the (optionally scaled) feature vector.
    pub fn encode(&self, reading: &EnvironmentalReading) -> RiskResult<[f64; FEATURE_COUNT]> {
        let season_code = self
            .season_classes
            .iter()
            .position(|s| *s == reading.season)
            .ok_or_else(|| {
                RiskError::Model(format!("season {} not in model encoding", reading.season))
            })?;

        let mut features = [
            reading.soil_ph,
            reading.temperature,
            reading.humidity,
            reading.rainfall,
            season_code as f64,
            f64::from(reading.tree_age),
        ];

        if let Some(scaler) = &self.scaler {
            for (i, x) in features.iter_mut().enumerate() {
                *x = (*x - scaler.mean[i]) / scaler.scale[i];
            }
        }
        Ok(features)
    }

    /// Mean of per-tree normalized leaf distributions.
    pub fn predict_proba(&self, features: &[f64; FEATURE_COUNT]) -> RiskResult<Vec<f64>> {
        let mut totals = vec![0.0; self.label_classes.len()];
        for (t, tree) in self.forest.trees.iter().enumerate() {
            let leaf = walk(tree, features).map_err(|e| RiskError::Model(format!("tree {t}: {e}")))?;
            let sum: f64 = leaf.iter().sum();
            if sum <= 0.0 || !sum.is_finite() {
                return Err(RiskError::Model(format!("tree {t}: empty leaf distribution")));
            }
            for (total, v) in totals.iter_mut().zip(leaf) {
                *total += v / sum;
            }
        }
        let n = self.forest.trees.len() as f64;
        Ok(totals.into_iter().map(|p| p / n).collect())
    }
}

/// Follow splits from the root to a leaf. The step bound rejects cycles.
fn walk<'a>(tree: &'a DecisionTree, features: &[f64; FEATURE_COUNT]) -> Result<&'a [f64], String> {
    let mut index = 0;
    for _ in 0..tree.nodes.len() {
        match tree.nodes.get(index) {
            Some(TreeNode::Leaf { value }) => return Ok(value.as_slice()),
            Some(TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            }) => {
                let x = features
                    .get(*feature)
                    .ok_or_else(|| format!("feature {feature} out of range"))?;
                index = if *x <= *threshold { *left } else { *right };
            }
            None => return Err(format!("node {index} does not exist")),
        }
    }
    Err("no leaf reached (cycle in tree)".into())
}

impl RiskModel for ModelBundle {
    fn predict(&self, reading: &EnvironmentalReading) -> RiskResult<ModelPrediction> {
        let features = self.encode(reading)?;
        let proba = self.predict_proba(&features)?;

        // first maximum wins, like argmax
        let (class, probability) = proba
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((i, p)),
            })
            .ok_or_else(|| RiskError::Model("no class probabilities".into()))?;

        let risk_level = *self
            .label_classes
            .get(class)
            .ok_or_else(|| RiskError::Model(format!("class {class} has no label")))?;

        Ok(ModelPrediction {
            risk_level,
            probability,
        })
    }

    fn name(&self) -> &str {
        "random_forest"
    }
}

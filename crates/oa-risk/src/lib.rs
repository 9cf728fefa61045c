//! Pest-risk prediction for macadamia orchards.
//!
//! A deterministic rule scorer is always evaluated. When a trained model
//! bundle is loaded its verdict is reconciled with the rules through a
//! small decision table (`ReconcilePolicy`). Per-pest trees, recommendations
//! and monitoring advice are layered on top by `HybridPredictor`.

pub mod advice;
pub mod error;
pub mod knowledge;
pub mod model;
pub mod pests;
pub mod predictor;
pub mod reconcile;
pub mod rules;

pub use error::{RiskError, RiskResult};
pub use knowledge::{PestKnowledgeBase, PestProfile};
pub use model::{ModelBundle, ModelPrediction, RiskModel};
pub use predictor::HybridPredictor;
pub use reconcile::{ReconcilePolicy, Reconciliation};

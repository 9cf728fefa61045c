//! Risk predictor error types.

use thiserror::Error;

/// Errors from loading or evaluating risk models and knowledge data.
#[derive(Debug, Error)]
pub enum RiskError {
    #[error("model error: {0}")]
    Model(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid reading: {0}")]
    InvalidReading(String),

    #[error("knowledge base error: {0}")]
    KnowledgeBase(String),
}

pub type RiskResult<T> = Result<T, RiskError>;

//! Classifier error types.

use thiserror::Error;

/// Errors raised while building a lexicon or scoring a query.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("invalid pattern {pattern:?} for intent {intent}: {message}")]
    InvalidPattern {
        intent: String,
        pattern: String,
        message: String,
    },

    #[error("invalid lexicon: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("parameter extraction failed: {0}")]
    Extraction(String),
}

/// Convenience alias for classifier results.
pub type ClassifierResult<T> = Result<T, ClassifierError>;

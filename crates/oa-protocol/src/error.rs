//! Errors shared across the advisor crates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Required environmental fields were absent from the caller's farm data.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("insufficient farm data: missing {}", missing.join(", "))]
pub struct MissingDataError {
    pub required: Vec<String>,
    pub provided: Vec<String>,
    pub missing: Vec<String>,
}

impl MissingDataError {
    pub fn new(required: Vec<String>, provided: Vec<String>) -> Self {
        let missing = required
            .iter()
            .filter(|field| !provided.contains(field))
            .cloned()
            .collect();
        Self {
            required,
            provided,
            missing,
        }
    }
}

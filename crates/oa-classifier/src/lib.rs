//! Query classification for Orchard Advisor.
//!
//! Routes a free-text farming question to a domain, an intent, the
//! predictions it needs and a response strategy, using a keyword/regex
//! `Lexicon` that is built once and shared read-only.

pub mod classifier;
pub mod error;
pub mod followup;
pub mod lexicon;
pub mod params;

// Re-export key types for convenience
pub use classifier::QueryClassifier;
pub use error::{ClassifierError, ClassifierResult};
pub use followup::followup_questions;
pub use lexicon::{Lexicon, LexiconConfig};

//! Shared application state for the Axum server.

use std::sync::Arc;

use tokio::sync::RwLock;

use oa_advisor::{AdvisorService, ConversationHistory};

/// Shared application state, wrapped in `Arc` for Axum handler sharing.
#[derive(Clone)]
pub struct AppState {
    /// Stateless advisory pipeline.
    pub advisor: Arc<AdvisorService>,
    /// Conversation log; never held across an await.
    pub history: Arc<RwLock<ConversationHistory>>,
}

impl AppState {
    pub fn new(advisor: AdvisorService, history_capacity: usize) -> Self {
        Self {
            advisor: Arc::new(advisor),
            history: Arc::new(RwLock::new(ConversationHistory::new(history_capacity))),
        }
    }
}

impl Default for AppState {
    /// Built-in lexicon, rules-only predictor, no language model.
    fn default() -> Self {
        Self {
            advisor: Arc::new(AdvisorService::default()),
            history: Arc::new(RwLock::new(ConversationHistory::default())),
        }
    }
}

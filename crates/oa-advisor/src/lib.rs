//! Orchard Advisor orchestration library.
//!
//! Glues the query classifier, the hybrid pest-risk predictor, the
//! template-driven domain advisor and an optional chat-completions model
//! into a single `AdvisorService`. Conversation history is a bounded ring
//! buffer owned by the caller.

pub mod advisor;
pub mod config;
pub mod history;
pub mod llm;
pub mod prompts;
pub mod service;
pub mod templates;

pub use advisor::{AdviceContext, DomainAdvice, DomainAdvisor};
pub use config::AdvisorConfig;
pub use history::{ConversationHistory, HistoryEntry, HistorySummary};
pub use llm::{ChatCompletionsClient, LlmConfig, TextGenerator};
pub use service::{AdvisorService, ChatReply, Explanation, ReplySource};

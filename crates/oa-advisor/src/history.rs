//! Bounded conversation history.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use oa_protocol::Domain;

/// Characters of the final reply kept in an entry.
const SUMMARY_CHARS: usize = 200;

/// Entries returned in `recent_conversations`.
const RECENT_ENTRIES: usize = 5;

pub const DEFAULT_CAPACITY: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub user_input: String,
    pub domain: Domain,
    pub response_summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub total_conversations: usize,
    pub most_discussed_topics: BTreeMap<Domain, usize>,
    pub recent_conversations: Vec<HistoryEntry>,
    pub first_conversation: DateTime<Utc>,
    pub last_conversation: DateTime<Utc>,
}

/// Ring buffer of the most recent exchanges; oldest entries are evicted.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    capacity: usize,
    entries: VecDeque<HistoryEntry>,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ConversationHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Append an exchange, evicting the oldest entry when full.
    pub fn record(
        &mut self,
        user_input: &str,
        domain: Domain,
        final_response: &str,
        user_id: Option<&str>,
    ) -> &HistoryEntry {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            user_id: user_id.map(str::to_string),
            user_input: user_input.to_string(),
            domain,
            response_summary: summarize(final_response),
        });
        tracing::debug!(entries = self.entries.len(), %domain, "conversation recorded");
        &self.entries[self.entries.len() - 1]
    }

    /// Summary over all entries, or only those of `user_id`.
    /// `None` when there is nothing to summarize.
    pub fn summary(&self, user_id: Option<&str>) -> Option<HistorySummary> {
        let selected: Vec<&HistoryEntry> = self
            .entries
            .iter()
            .filter(|e| user_id.is_none() || e.user_id.as_deref() == user_id)
            .collect();

        let first = selected.first()?;
        let last = selected.last()?;

        let mut topics = BTreeMap::new();
        for entry in &selected {
            *topics.entry(entry.domain).or_insert(0) += 1;
        }

        let recent = selected
            .iter()
            .skip(selected.len().saturating_sub(RECENT_ENTRIES))
            .map(|e| (*e).clone())
            .collect();

        Some(HistorySummary {
            total_conversations: selected.len(),
            most_discussed_topics: topics,
            recent_conversations: recent,
            first_conversation: first.timestamp,
            last_conversation: last.timestamp,
        })
    }
}

/// First 200 characters of a reply followed by `...`.
fn summarize(response: &str) -> String {
    let mut summary: String = response.chars().take(SUMMARY_CHARS).collect();
    summary.push_str("...");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_truncates_summary_by_chars() {
        let mut history = ConversationHistory::default();
        let long = "é".repeat(300);
        let entry = history.record("q", Domain::Harvesting, &long, None);
        assert_eq!(entry.response_summary.chars().count(), 203);
        assert!(entry.response_summary.ends_with("..."));

        let short = history.record("q", Domain::Harvesting, "short", Some("farmer-1"));
        assert_eq!(short.response_summary, "short...");
        assert_eq!(short.user_id.as_deref(), Some("farmer-1"));
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut history = ConversationHistory::new(3);
        for i in 0..5 {
            history.record(&format!("q{i}"), Domain::General, "r", None);
        }
        assert_eq!(history.len(), 3);
        let inputs: Vec<&str> = history.entries().map(|e| e.user_input.as_str()).collect();
        assert_eq!(inputs, vec!["q2", "q3", "q4"]);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut history = ConversationHistory::new(0);
        history.record("a", Domain::General, "r", None);
        history.record("b", Domain::General, "r", None);
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn empty_history_has_no_summary() {
        assert!(ConversationHistory::default().summary(None).is_none());
    }

    #[test]
    fn summary_counts_topics_and_keeps_last_five() {
        let mut history = ConversationHistory::default();
        for i in 0..7 {
            let domain = if i % 2 == 0 {
                Domain::PestManagement
            } else {
                Domain::Fertilization
            };
            history.record(&format!("q{i}"), domain, "r", None);
        }
        let summary = history.summary(None).unwrap();
        assert_eq!(summary.total_conversations, 7);
        assert_eq!(summary.most_discussed_topics[&Domain::PestManagement], 4);
        assert_eq!(summary.most_discussed_topics[&Domain::Fertilization], 3);
        assert_eq!(summary.recent_conversations.len(), 5);
        assert_eq!(summary.recent_conversations[0].user_input, "q2");
        assert!(summary.first_conversation <= summary.last_conversation);
    }

    #[test]
    fn summary_filters_by_user() {
        let mut history = ConversationHistory::default();
        history.record("a", Domain::Planting, "r", Some("alice"));
        history.record("b", Domain::Harvesting, "r", Some("bob"));
        history.record("c", Domain::Planting, "r", Some("alice"));

        let alice = history.summary(Some("alice")).unwrap();
        assert_eq!(alice.total_conversations, 2);
        assert_eq!(alice.most_discussed_topics.len(), 1);
        assert!(history.summary(Some("carol")).is_none());
        assert_eq!(history.summary(None).unwrap().total_conversations, 3);
    }

    #[test]
    fn summary_serializes_domain_keys() {
        let mut history = ConversationHistory::default();
        history.record("a", Domain::PestManagement, "r", None);
        let json = serde_json::to_value(history.summary(None).unwrap()).unwrap();
        assert_eq!(json["most_discussed_topics"]["pest_management"], 1);
    }
}

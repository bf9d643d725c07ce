//! Intent Matching
//!
//! Maps user input to a knowledge base topic with a deterministic keyword
//! scan:
//!
//! 1. Lowercase the input (no stemming or tokenization)
//! 2. Walk topics in knowledge base order
//! 3. A topic matches if any of its triggers is a substring of the input
//! 4. The first matching topic wins
//!
//! Overlapping triggers across topics are resolved purely by declaration
//! order. Cost is O(topics x triggers) per call.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use legalmind_text_processing::{IntentMatcher, KnowledgeBase, Topic};
//!
//! let kb = KnowledgeBase::new(
//!     "Hello",
//!     vec![Topic::new("bail", ["bail"], ["Bail is the rule, jail the exception."])],
//!     vec!["Could you rephrase?".to_string()],
//! )
//! .unwrap();
//! let matcher = IntentMatcher::new(Arc::new(kb));
//!
//! assert_eq!(matcher.detect("How do I get BAIL?"), Some("bail"));
//! assert_eq!(matcher.detect("   "), None);
//! ```

use std::sync::Arc;

use crate::knowledge::{KnowledgeBase, Topic};

/// A successful match with the trigger that selected it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentMatch<'a> {
    pub topic: &'a Topic,
    pub trigger: &'a str,
}

impl<'a> IntentMatch<'a> {
    pub fn key(&self) -> &'a str {
        self.topic.key()
    }
}

/// First-match keyword intent matcher over a shared knowledge base
#[derive(Debug, Clone)]
pub struct IntentMatcher {
    knowledge_base: Arc<KnowledgeBase>,
}

impl IntentMatcher {
    pub fn new(knowledge_base: Arc<KnowledgeBase>) -> Self {
        Self { knowledge_base }
    }

    pub fn knowledge_base(&self) -> &Arc<KnowledgeBase> {
        &self.knowledge_base
    }

    /// Normalize input for matching
    pub fn normalize(input: &str) -> String {
        input.to_lowercase()
    }

    /// Key of the first topic whose trigger occurs in `input`
    pub fn detect(&self, input: &str) -> Option<&str> {
        self.classify(input).map(|m| m.key())
    }

    /// Like [`detect`](Self::detect), also reporting the matched trigger
    pub fn classify(&self, input: &str) -> Option<IntentMatch<'_>> {
        if input.trim().is_empty() {
            return None;
        }

        let normalized = Self::normalize(input);
        let result = self.knowledge_base.topics().iter().find_map(|topic| {
            topic
                .matching_trigger(&normalized)
                .map(|trigger| IntentMatch { topic, trigger })
        });

        match &result {
            Some(m) => tracing::debug!(topic = m.key(), trigger = m.trigger, "Intent matched"),
            None => tracing::debug!("No intent matched"),
        }

        result
    }

    /// Every topic with a matching trigger, in priority order
    ///
    /// Diagnostic only: selection always uses the first entry.
    pub fn detect_all(&self, input: &str) -> Vec<&str> {
        if input.trim().is_empty() {
            return Vec::new();
        }

        let normalized = Self::normalize(input);
        self.knowledge_base
            .topics()
            .iter()
            .filter(|topic| topic.matching_trigger(&normalized).is_some())
            .map(Topic::key)
            .collect()
    }
}

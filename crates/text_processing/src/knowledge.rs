//! Knowledge Base
//!
//! Immutable rule table behind the chatbot: topics (trigger keywords plus
//! candidate responses) in priority order and a list of generic fallback
//! responses. Built once at startup and shared read-only across sessions.
//!
//! Construction validates every invariant and fails fast:
//! - at least one fallback response, none blank
//! - unique, non-empty topic keys
//! - every topic has at least one trigger and one response
//! - triggers are non-blank and lowercase, responses are non-blank

use std::collections::HashMap;
use std::path::Path;

use legalmind_config::{ConfigError, KnowledgeBaseConfig, TopicDefinition};
use thiserror::Error;

/// Knowledge base construction errors. All of them are fatal at startup.
#[derive(Error, Debug)]
pub enum KnowledgeBaseError {
    #[error("Knowledge base has no fallback responses")]
    NoFallbackResponses,

    #[error("Fallback response {index} is blank")]
    BlankFallbackResponse { index: usize },

    #[error("Greeting is blank")]
    BlankGreeting,

    #[error("Topic at position {index} has an empty key")]
    EmptyTopicKey { index: usize },

    #[error("Duplicate topic key: {0}")]
    DuplicateTopic(String),

    #[error("Topic '{0}' has no triggers")]
    NoTriggers(String),

    #[error("Topic '{0}' has a blank trigger")]
    BlankTrigger(String),

    #[error("Topic '{topic}' has trigger '{trigger}' that is not lowercase")]
    TriggerNotLowercase { topic: String, trigger: String },

    #[error("Topic '{0}' has no responses")]
    NoResponses(String),

    #[error("Topic '{topic}' has a blank response at position {index}")]
    BlankResponse { topic: String, index: usize },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// A chatbot intent category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    key: String,
    description: String,
    triggers: Vec<String>,
    responses: Vec<String>,
}

impl Topic {
    /// Create a topic. Duplicate triggers are collapsed, keeping first
    /// occurrence order. Invariants are checked when the topic is added to a
    /// [`KnowledgeBase`].
    pub fn new<K, T, R>(key: K, triggers: T, responses: R) -> Self
    where
        K: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for trigger in triggers.into_iter().map(Into::into) {
            if !unique.contains(&trigger) {
                unique.push(trigger);
            }
        }

        Self {
            key: key.into(),
            description: String::new(),
            triggers: unique,
            responses: responses.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Trigger keywords, all lowercase
    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }

    /// Candidate responses, never empty
    pub fn responses(&self) -> &[String] {
        &self.responses
    }

    /// First trigger contained in already-lowercased input
    pub fn matching_trigger(&self, normalized: &str) -> Option<&str> {
        self.triggers
            .iter()
            .find(|t| normalized.contains(t.as_str()))
            .map(String::as_str)
    }

    fn validate(&self, index: usize) -> Result<(), KnowledgeBaseError> {
        if self.key.trim().is_empty() {
            return Err(KnowledgeBaseError::EmptyTopicKey { index });
        }

        if self.triggers.is_empty() {
            return Err(KnowledgeBaseError::NoTriggers(self.key.clone()));
        }

        for trigger in &self.triggers {
            if trigger.trim().is_empty() {
                return Err(KnowledgeBaseError::BlankTrigger(self.key.clone()));
            }
            if trigger.to_lowercase() != *trigger {
                return Err(KnowledgeBaseError::TriggerNotLowercase {
                    topic: self.key.clone(),
                    trigger: trigger.clone(),
                });
            }
        }

        if self.responses.is_empty() {
            return Err(KnowledgeBaseError::NoResponses(self.key.clone()));
        }

        if let Some(index) = self.responses.iter().position(|r| r.trim().is_empty()) {
            return Err(KnowledgeBaseError::BlankResponse {
                topic: self.key.clone(),
                index,
            });
        }

        Ok(())
    }
}

impl From<&TopicDefinition> for Topic {
    fn from(def: &TopicDefinition) -> Self {
        Topic::new(def.key.clone(), def.triggers.iter().cloned(), def.responses.iter().cloned())
            .with_description(def.description.clone())
    }
}

/// Validated, immutable knowledge base
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    greeting: String,
    topics: Vec<Topic>,
    index: HashMap<String, usize>,
    fallback_responses: Vec<String>,
}

impl KnowledgeBase {
    /// Build a knowledge base, validating all invariants
    pub fn new(
        greeting: impl Into<String>,
        topics: Vec<Topic>,
        fallback_responses: Vec<String>,
    ) -> Result<Self, KnowledgeBaseError> {
        let greeting = greeting.into();
        if greeting.trim().is_empty() {
            return Err(KnowledgeBaseError::BlankGreeting);
        }

        if fallback_responses.is_empty() {
            return Err(KnowledgeBaseError::NoFallbackResponses);
        }
        if let Some(index) = fallback_responses.iter().position(|r| r.trim().is_empty()) {
            return Err(KnowledgeBaseError::BlankFallbackResponse { index });
        }

        let mut index = HashMap::with_capacity(topics.len());
        for (i, topic) in topics.iter().enumerate() {
            topic.validate(i)?;
            if index.insert(topic.key.clone(), i).is_some() {
                return Err(KnowledgeBaseError::DuplicateTopic(topic.key.clone()));
            }
        }

        tracing::debug!(
            topics = topics.len(),
            fallbacks = fallback_responses.len(),
            "Built knowledge base"
        );

        Ok(Self {
            greeting,
            topics,
            index,
            fallback_responses,
        })
    }

    /// Build from a parsed knowledge base config
    pub fn from_config(config: &KnowledgeBaseConfig) -> Result<Self, KnowledgeBaseError> {
        Self::new(
            config.greeting.trim(),
            config.topics.iter().map(Topic::from).collect(),
            config.fallback_responses.clone(),
        )
    }

    /// Load and validate a knowledge base YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, KnowledgeBaseError> {
        Self::from_config(&KnowledgeBaseConfig::load(path)?)
    }

    /// The knowledge base bundled with the crate
    pub fn bundled() -> Result<Self, KnowledgeBaseError> {
        Self::from_config(&KnowledgeBaseConfig::bundled()?)
    }

    /// Look up a topic by key
    pub fn lookup(&self, key: &str) -> Option<&Topic> {
        self.index.get(key).map(|&i| &self.topics[i])
    }

    /// Topics in priority order
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Generic replies for unmatched input, never empty
    pub fn fallback_responses(&self) -> &[String] {
        &self.fallback_responses
    }

    /// Canonical session greeting
    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback() -> Vec<String> {
        vec!["Could you be more specific?".to_string()]
    }

    #[test]
    fn test_lookup() {
        let kb = KnowledgeBase::new(
            "Hello",
            vec![
                Topic::new("taxation", ["gst", "income tax"], ["GST is an indirect tax."]),
                Topic::new("bail", ["bail"], ["Bail is the rule."]),
            ],
            fallback(),
        )
        .unwrap();

        assert_eq!(kb.len(), 2);
        assert_eq!(kb.lookup("bail").unwrap().responses(), ["Bail is the rule."]);
        assert!(kb.lookup("cyber").is_none());
        assert_eq!(kb.topics()[0].key(), "taxation");
    }

    #[test]
    fn test_duplicate_triggers_collapsed() {
        let topic = Topic::new("t", ["gst", "gst", "tax"], ["r"]);
        assert_eq!(topic.triggers(), ["gst", "tax"]);
    }

    #[test]
    fn test_empty_fallback_rejected() {
        let result = KnowledgeBase::new("Hello", vec![], vec![]);
        assert!(matches!(result, Err(KnowledgeBaseError::NoFallbackResponses)));
    }

    #[test]
    fn test_blank_fallback_rejected() {
        let result = KnowledgeBase::new("Hello", vec![], vec!["ok".to_string(), "  ".to_string()]);
        assert!(matches!(
            result,
            Err(KnowledgeBaseError::BlankFallbackResponse { index: 1 })
        ));
    }

    #[test]
    fn test_topic_without_triggers_rejected() {
        let topic = Topic::new("empty", Vec::<String>::new(), ["response"]);
        let result = KnowledgeBase::new("Hello", vec![topic], fallback());
        assert!(matches!(result, Err(KnowledgeBaseError::NoTriggers(k)) if k == "empty"));
    }

    #[test]
    fn test_topic_without_responses_rejected() {
        let topic = Topic::new("mute", ["quiet"], Vec::<String>::new());
        let result = KnowledgeBase::new("Hello", vec![topic], fallback());
        assert!(matches!(result, Err(KnowledgeBaseError::NoResponses(k)) if k == "mute"));
    }

    #[test]
    fn test_uppercase_trigger_rejected() {
        let topic = Topic::new("tax", ["GST"], ["response"]);
        let result = KnowledgeBase::new("Hello", vec![topic], fallback());
        assert!(matches!(
            result,
            Err(KnowledgeBaseError::TriggerNotLowercase { trigger, .. }) if trigger == "GST"
        ));
    }

    #[test]
    fn test_blank_trigger_rejected() {
        let topic = Topic::new("tax", ["gst", " "], ["response"]);
        let result = KnowledgeBase::new("Hello", vec![topic], fallback());
        assert!(matches!(result, Err(KnowledgeBaseError::BlankTrigger(_))));
    }

    #[test]
    fn test_duplicate_topic_rejected() {
        let result = KnowledgeBase::new(
            "Hello",
            vec![
                Topic::new("tax", ["gst"], ["a"]),
                Topic::new("tax", ["income tax"], ["b"]),
            ],
            fallback(),
        );
        assert!(matches!(result, Err(KnowledgeBaseError::DuplicateTopic(k)) if k == "tax"));
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = KnowledgeBase::new("Hello", vec![Topic::new("", ["x"], ["y"])], fallback());
        assert!(matches!(result, Err(KnowledgeBaseError::EmptyTopicKey { index: 0 })));
    }

    #[test]
    fn test_blank_greeting_rejected() {
        let result = KnowledgeBase::new("   ", vec![], fallback());
        assert!(matches!(result, Err(KnowledgeBaseError::BlankGreeting)));
    }

    #[test]
    fn test_bundled_knowledge_base_is_valid() {
        let kb = KnowledgeBase::bundled().unwrap();
        assert!(kb.lookup("taxation").is_some());
        assert!(kb.lookup("constitution").is_some());
        assert_eq!(kb.fallback_responses().len(), 5);
        assert!(kb.greeting().starts_with("Hello! I'm LegalMind AI"));
        for topic in kb.topics() {
            assert!(!topic.responses().is_empty());
            assert!(topic.triggers().iter().all(|t| t.to_lowercase() == *t));
        }
    }

    #[test]
    fn test_matching_trigger() {
        let topic = Topic::new("tax", ["gst", "income tax"], ["r"]);
        assert_eq!(topic.matching_trigger("what is income tax"), Some("income tax"));
        assert_eq!(topic.matching_trigger("nothing here"), None);
    }
}

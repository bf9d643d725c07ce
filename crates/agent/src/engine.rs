//! Response engine: intent matching plus response selection

use std::sync::Arc;
use std::time::Duration;

use legalmind_config::{KnowledgeBaseConfig, ThinkingDelayConfig};
use legalmind_text_processing::{IntentMatcher, KnowledgeBase};
use serde::{Deserialize, Serialize};

use crate::response::ResponseSelector;
use crate::AgentError;

/// Assistant reply for one user message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Matched topic, `None` when a fallback response was used
    pub topic: Option<String>,
    pub text: String,
}

/// Stateless reply producer shared by all sessions
#[derive(Debug)]
pub struct ResponseEngine {
    matcher: IntentMatcher,
    selector: ResponseSelector,
}

impl ResponseEngine {
    pub fn new(knowledge_base: Arc<KnowledgeBase>) -> Self {
        Self::with_selector(knowledge_base, ResponseSelector::new())
    }

    pub fn with_selector(knowledge_base: Arc<KnowledgeBase>, selector: ResponseSelector) -> Self {
        Self {
            matcher: IntentMatcher::new(knowledge_base),
            selector,
        }
    }

    /// Engine over a knowledge base config (path, or bundled when `None`)
    pub fn from_path(path: Option<&str>) -> Result<Self, AgentError> {
        let config = KnowledgeBaseConfig::load_or_bundled(path)?;
        let knowledge_base = KnowledgeBase::from_config(&config)?;
        Ok(Self::new(Arc::new(knowledge_base)))
    }

    pub fn knowledge_base(&self) -> &Arc<KnowledgeBase> {
        self.matcher.knowledge_base()
    }

    pub fn greeting(&self) -> &str {
        self.knowledge_base().greeting()
    }

    /// Detect the topic of `text` and pick a reply
    pub fn respond(&self, text: &str) -> Reply {
        let topic = self.matcher.detect(text);
        let reply = self.selector.select(topic, self.knowledge_base());
        Reply {
            topic: topic.map(str::to_string),
            text: reply.to_string(),
        }
    }

    pub fn thinking_delay(&self, config: &ThinkingDelayConfig) -> Duration {
        self.selector.thinking_delay(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ResponseEngine {
        let kb = Arc::new(KnowledgeBase::bundled().unwrap());
        ResponseEngine::with_selector(kb, ResponseSelector::seeded(9))
    }

    #[test]
    fn test_topic_reply() {
        let engine = engine();
        let reply = engine.respond("Tell me about GST");
        assert_eq!(reply.topic.as_deref(), Some("taxation"));

        let responses = engine.knowledge_base().lookup("taxation").unwrap().responses();
        assert!(responses.contains(&reply.text));
    }

    #[test]
    fn test_fallback_reply() {
        let engine = engine();
        let reply = engine.respond("asdkjasdkj nonsense");
        assert!(reply.topic.is_none());
        assert!(engine.knowledge_base().fallback_responses().contains(&reply.text));
    }

    #[test]
    fn test_from_path_bundled() {
        let engine = ResponseEngine::from_path(None).unwrap();
        assert!(engine.greeting().starts_with("Hello! I'm LegalMind AI"));
    }

    #[test]
    fn test_from_missing_path() {
        let result = ResponseEngine::from_path(Some("/nonexistent/kb.yaml"));
        assert!(matches!(result, Err(AgentError::Config(_))));
    }
}

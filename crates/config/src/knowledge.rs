//! Knowledge Base Configuration
//!
//! Raw, unvalidated topic definitions for the chatbot as read from YAML.
//! Invariant checks happen when the runtime knowledge base is built from
//! this config (see `legalmind_text_processing::KnowledgeBase`).

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

/// Knowledge base shipped with the crate
pub const BUNDLED_KNOWLEDGE_BASE: &str = include_str!("../data/knowledge_base.yaml");

/// Knowledge base document loaded from knowledge_base.yaml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeBaseConfig {
    /// Canonical greeting shown at session start and after a reset
    #[serde(default = "default_greeting")]
    pub greeting: String,
    /// Generic replies used when no topic matches
    #[serde(default)]
    pub fallback_responses: Vec<String>,
    /// Topics in priority order
    #[serde(default)]
    pub topics: Vec<TopicDefinition>,
}

fn default_greeting() -> String {
    "Hello! I'm LegalMind AI, your legal assistant. Ask me anything!".to_string()
}

/// Single topic definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicDefinition {
    /// Topic identifier
    pub key: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Lowercase substrings that select this topic
    #[serde(default)]
    pub triggers: Vec<String>,
    /// Candidate replies
    #[serde(default)]
    pub responses: Vec<String>,
}

impl KnowledgeBaseConfig {
    /// Parse a knowledge base from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileNotFound(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_yaml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            topics = config.topics.len(),
            "Loaded knowledge base config"
        );
        Ok(config)
    }

    /// The knowledge base bundled with the crate
    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_yaml_str(BUNDLED_KNOWLEDGE_BASE)
    }

    /// Load from `path`, or the bundled knowledge base when no path is given
    pub fn load_or_bundled(path: Option<&str>) -> Result<Self, ConfigError> {
        match path.map(str::trim).filter(|p| !p.is_empty()) {
            Some(p) => Self::load(p),
            None => Self::bundled(),
        }
    }

    /// Get a topic definition by key
    pub fn get_topic(&self, key: &str) -> Option<&TopicDefinition> {
        self.topics.iter().find(|t| t.key == key)
    }

    /// All topic keys in priority order
    pub fn topic_keys(&self) -> Vec<&str> {
        self.topics.iter().map(|t| t.key.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_knowledge_base_deserialization() {
        let yaml = r#"
greeting: "Hi there"
fallback_responses:
  - "Could you rephrase?"
topics:
  - key: taxation
    description: "Tax law"
    triggers: ["gst", "income tax"]
    responses:
      - "GST was introduced in 2017."
"#;
        let config = KnowledgeBaseConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.greeting, "Hi there");
        assert_eq!(config.fallback_responses.len(), 1);
        assert_eq!(config.topic_keys(), vec!["taxation"]);
        assert_eq!(config.get_topic("taxation").unwrap().triggers.len(), 2);
        assert!(config.get_topic("labor").is_none());
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let config = KnowledgeBaseConfig::from_yaml_str("topics: []").unwrap();
        assert!(config.fallback_responses.is_empty());
        assert!(!config.greeting.is_empty());
    }

    #[test]
    fn test_bundled_knowledge_base_parses() {
        let config = KnowledgeBaseConfig::bundled().unwrap();
        assert_eq!(config.fallback_responses.len(), 5);
        assert_eq!(config.topics.first().map(|t| t.key.as_str()), Some("constitution"));
        assert!(config.get_topic("taxation").is_some());
        assert!(config.get_topic("thanks").is_some());
    }

    #[test]
    fn test_bundled_file_ships_with_crate() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/knowledge_base.yaml");
        let on_disk = KnowledgeBaseConfig::load(path).unwrap();
        let bundled = KnowledgeBaseConfig::bundled().unwrap();
        assert_eq!(on_disk.topic_keys(), bundled.topic_keys());
        assert_eq!(on_disk.greeting, bundled.greeting);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "fallback_responses: [\"fallback\"]\ntopics:\n  - key: bail\n    triggers: [bail]\n    responses: [\"Bail is the rule.\"]"
        )
        .unwrap();

        let config = KnowledgeBaseConfig::load(file.path()).unwrap();
        assert_eq!(config.topic_keys(), vec!["bail"]);
    }

    #[test]
    fn test_load_missing_file() {
        let result = KnowledgeBaseConfig::load("/nonexistent/knowledge_base.yaml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_or_bundled_with_blank_path() {
        let config = KnowledgeBaseConfig::load_or_bundled(Some("  ")).unwrap();
        assert!(config.get_topic("constitution").is_some());
    }
}

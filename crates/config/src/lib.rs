//! Configuration management for the legal assistant
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default`, `config/{env}`)
//! - Environment variables (LEGALMIND_ prefix, `__` separator)
//!
//! The chatbot knowledge base is a separate YAML document, see
//! [`KnowledgeBaseConfig`]. A copy is bundled into the binary so the
//! assistant works without any files on disk.

pub mod knowledge;
pub mod settings;

pub use knowledge::{KnowledgeBaseConfig, TopicDefinition, BUNDLED_KNOWLEDGE_BASE};
pub use settings::{
    load_settings, load_settings_from, ChatConfig, ObservabilityConfig, RateLimitConfig,
    RuntimeEnvironment, Settings, ThinkingDelayConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Chat session behaviour
    #[serde(default)]
    pub chat: ChatConfig,

    /// Path to the knowledge base YAML. `None` or blank uses the bundled one.
    #[serde(default)]
    pub knowledge_base_path: Option<String>,

    /// Per-user rate limiting applied by the host
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Chat session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Label for assistant messages in transcripts
    #[serde(default = "default_assistant_label")]
    pub assistant_label: String,

    /// Label for user messages in transcripts
    #[serde(default = "default_user_label")]
    pub user_label: String,

    /// First line of the shareable conversation text
    #[serde(default = "default_share_header")]
    pub share_header: String,

    /// Simulated "thinking" delay before each reply
    #[serde(default)]
    pub thinking_delay: ThinkingDelayConfig,
}

fn default_assistant_label() -> String {
    "LegalMind AI".to_string()
}

fn default_user_label() -> String {
    "You".to_string()
}

fn default_share_header() -> String {
    "LegalMind AI Legal Consultation".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            assistant_label: default_assistant_label(),
            user_label: default_user_label(),
            share_header: default_share_header(),
            thinking_delay: ThinkingDelayConfig::default(),
        }
    }
}

/// Window the thinking delay is drawn from, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThinkingDelayConfig {
    #[serde(default = "default_min_delay_ms")]
    pub min_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_ms: u64,
}

fn default_min_delay_ms() -> u64 {
    1500
}

fn default_max_delay_ms() -> u64 {
    3000
}

impl Default for ThinkingDelayConfig {
    fn default() -> Self {
        Self {
            min_ms: default_min_delay_ms(),
            max_ms: default_max_delay_ms(),
        }
    }
}

impl ThinkingDelayConfig {
    /// Fixed delay (min == max)
    pub fn fixed(ms: u64) -> Self {
        Self {
            min_ms: ms,
            max_ms: ms,
        }
    }

    /// No delay at all
    pub fn none() -> Self {
        Self::fixed(0)
    }

    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }
}

/// Sliding-window rate limit configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum requests per key within the window
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Maximum number of keys tracked before evicting the least recently seen
    #[serde(default = "default_max_tracked_keys")]
    pub max_tracked_keys: usize,
}

fn default_true() -> bool {
    true
}

fn default_max_requests() -> u32 {
    20
}

fn default_window_secs() -> u64 {
    60
}

fn default_max_tracked_keys() -> usize {
    1024
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            max_tracked_keys: default_max_tracked_keys(),
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_chat()?;
        self.validate_rate_limit()?;
        Ok(())
    }

    fn validate_chat(&self) -> Result<(), ConfigError> {
        let delay = &self.chat.thinking_delay;
        if delay.min_ms > delay.max_ms {
            return Err(ConfigError::InvalidValue {
                field: "chat.thinking_delay".to_string(),
                message: format!(
                    "min_ms ({}) must not exceed max_ms ({})",
                    delay.min_ms, delay.max_ms
                ),
            });
        }

        if delay.max_ms > 60_000 {
            return Err(ConfigError::InvalidValue {
                field: "chat.thinking_delay.max_ms".to_string(),
                message: "Thinking delay too high (maximum 60000ms)".to_string(),
            });
        }

        Ok(())
    }

    fn validate_rate_limit(&self) -> Result<(), ConfigError> {
        let rl = &self.rate_limit;
        if !rl.enabled {
            return Ok(());
        }

        if rl.max_requests == 0 {
            return Err(ConfigError::InvalidValue {
                field: "rate_limit.max_requests".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if rl.window_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "rate_limit.window_secs".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if rl.max_tracked_keys == 0 {
            return Err(ConfigError::InvalidValue {
                field: "rate_limit.max_tracked_keys".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

/// Load settings from `config/` relative to the working directory
///
/// Priority: env vars > config/{env} > config/default > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from("config", env)
}

/// Load settings from a specific config directory
pub fn load_settings_from<P: AsRef<Path>>(
    dir: P,
    env: Option<&str>,
) -> Result<Settings, ConfigError> {
    let dir = dir.as_ref();
    let mut builder = Config::builder();

    builder = builder.add_source(File::from(dir.join("default")).required(false));

    if let Some(env_name) = env {
        builder = builder.add_source(File::from(dir.join(env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("LEGALMIND")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

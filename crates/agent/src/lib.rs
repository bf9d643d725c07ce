//! Conversational Agent for the Legal Assistant
//!
//! Features:
//! - Response selection (seedable RNG over topic or fallback responses)
//! - Conversation sessions with a cancellable thinking delay
//! - Session events for rendering and persistence layers
//! - Sliding-window rate limiting for hosts

pub mod engine;
pub mod rate_limit;
pub mod response;
pub mod session;

pub use engine::{Reply, ResponseEngine};
pub use rate_limit::{RateLimitError, RateLimiter};
pub use response::ResponseSelector;
pub use session::{ConversationSession, SessionState, SubmitOutcome};

use legalmind_config::ConfigError;
use legalmind_text_processing::KnowledgeBaseError;
use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    /// A reply is still pending for this session
    #[error("Session is busy: a response is already pending")]
    Busy,

    #[error("Rate limited: {0}")]
    RateLimited(#[from] RateLimitError),

    #[error("Knowledge base error: {0}")]
    KnowledgeBase(#[from] KnowledgeBaseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AgentError {
    /// Errors the caller can recover from by retrying later
    pub fn is_transient(&self) -> bool {
        matches!(self, AgentError::Busy | AgentError::RateLimited(_))
    }
}

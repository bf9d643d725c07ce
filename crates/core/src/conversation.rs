//! Conversation types: messages, senders and session events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message identifier, unique and increasing within a session
pub type MessageId = u64;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// The person using the chat widget
    User,
    /// The assistant (canned responses and the greeting)
    Assistant,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single chat message. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message stamped with the current time
    pub fn new(id: MessageId, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id,
            sender,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    pub fn is_assistant(&self) -> bool {
        self.sender == Sender::Assistant
    }
}

/// Events emitted by a conversation session
///
/// Delivered to broadcast subscribers (rendering layer) and to registered
/// observers (persistence/analytics). Delivery is fire-and-forget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A message was appended to the history
    MessageAppended {
        session_id: String,
        message: Message,
        /// Topic the assistant reply was selected from (None for fallback,
        /// user messages and the greeting)
        topic: Option<String>,
    },
    /// The history was cleared back to the greeting
    Reset { session_id: String },
    /// A pending assistant reply was dropped because of a reset
    Cancelled { session_id: String },
}

impl SessionEvent {
    pub fn session_id(&self) -> &str {
        match self {
            SessionEvent::MessageAppended { session_id, .. }
            | SessionEvent::Reset { session_id }
            | SessionEvent::Cancelled { session_id } => session_id,
        }
    }

    /// Short event name for logging
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::MessageAppended { .. } => "message_appended",
            SessionEvent::Reset { .. } => "reset",
            SessionEvent::Cancelled { .. } => "cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_display() {
        assert_eq!(Sender::User.to_string(), "user");
        assert_eq!(Sender::Assistant.to_string(), "assistant");
    }

    #[test]
    fn test_message_roles() {
        let msg = Message::new(3, Sender::User, "hello");
        assert!(msg.is_user());
        assert!(!msg.is_assistant());
        assert_eq!(msg.id, 3);
    }

    #[test]
    fn test_event_serialization() {
        let event = SessionEvent::Reset {
            session_id: "abc".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"reset\""));
        assert_eq!(event.session_id(), "abc");
        assert_eq!(event.name(), "reset");
    }
}

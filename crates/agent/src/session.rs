//! Conversation session
//!
//! One chat thread between a user and the assistant. The session owns the
//! message history and a busy flag; a reply is produced after a randomized
//! "thinking" delay that a [`reset`](ConversationSession::reset) cancels.
//!
//! State machine:
//!
//! ```text
//! Idle --submit(text)--> AwaitingResponse --delay elapsed--> Idle
//!   ^                          |
//!   +--------reset()-----------+
//! ```
//!
//! The delay races a tokio timer against a `watch` channel carrying the
//! reset epoch. After the timer fires the epoch is checked again under the
//! session lock, so a reply computed before a reset is never appended after
//! it.

use std::sync::Arc;

use legalmind_config::ChatConfig;
use legalmind_core::{Message, MessageId, Sender, SessionEvent, SessionObserver};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};

use crate::engine::ResponseEngine;
use crate::AgentError;

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Ready for the next message
    Idle,
    /// A reply is pending (typing indicator shown)
    AwaitingResponse,
}

/// Result of [`ConversationSession::submit`]
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Blank input; nothing changed
    Ignored,
    /// The assistant replied with this message
    Replied(Message),
    /// A reset happened while the reply was pending; nothing was appended
    Cancelled,
}

impl SubmitOutcome {
    pub fn message(&self) -> Option<&Message> {
        match self {
            SubmitOutcome::Replied(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct SessionInner {
    messages: Vec<Message>,
    next_id: MessageId,
    state: SessionState,
    /// Bumped on every reset
    epoch: u64,
}

impl SessionInner {
    fn new(greeting: &str) -> Self {
        let mut inner = Self {
            messages: Vec::new(),
            next_id: 1,
            state: SessionState::Idle,
            epoch: 0,
        };
        inner.append(Sender::Assistant, greeting);
        inner
    }

    fn append(&mut self, sender: Sender, text: &str) -> Message {
        let message = Message::new(self.next_id, sender, text);
        self.next_id += 1;
        self.messages.push(message.clone());
        message
    }

    fn restart(&mut self, greeting: &str) {
        self.messages.clear();
        self.next_id = 1;
        self.state = SessionState::Idle;
        self.epoch += 1;
        self.append(Sender::Assistant, greeting);
    }
}

/// Returns the session to `Idle` if the submit future is dropped mid-delay
struct PendingReply<'a> {
    inner: &'a Mutex<SessionInner>,
    epoch: u64,
    armed: bool,
}

impl Drop for PendingReply<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.inner.lock();
        if inner.epoch == self.epoch && inner.state == SessionState::AwaitingResponse {
            inner.state = SessionState::Idle;
            tracing::debug!("Pending reply abandoned");
        }
    }
}

/// A single chat session
pub struct ConversationSession {
    id: String,
    config: ChatConfig,
    engine: Arc<ResponseEngine>,
    inner: Mutex<SessionInner>,
    epoch_tx: watch::Sender<u64>,
    event_tx: broadcast::Sender<SessionEvent>,
    observers: RwLock<Vec<Arc<dyn SessionObserver>>>,
}

impl ConversationSession {
    /// New session holding only the greeting
    pub fn new(engine: Arc<ResponseEngine>, config: ChatConfig) -> Self {
        let (epoch_tx, _) = watch::channel(0);
        let (event_tx, _) = broadcast::channel(100);
        let inner = SessionInner::new(engine.greeting());
        let id = uuid::Uuid::new_v4().to_string();

        tracing::info!(session_id = %id, "Created conversation session");

        Self {
            id,
            config,
            engine,
            inner: Mutex::new(inner),
            epoch_tx,
            event_tx,
            observers: RwLock::new(Vec::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    /// Whether the typing indicator should be shown
    pub fn is_typing(&self) -> bool {
        self.state() == SessionState::AwaitingResponse
    }

    /// Snapshot of the history in chronological order
    pub fn history(&self) -> Vec<Message> {
        self.inner.lock().messages.clone()
    }

    pub fn message_count(&self) -> usize {
        self.inner.lock().messages.len()
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    /// Register an observer for persistence or analytics
    pub fn add_observer(&self, observer: Arc<dyn SessionObserver>) {
        self.observers.write().push(observer);
    }

    /// Submit a user message and wait for the assistant reply
    ///
    /// Blank input is ignored. Fails with [`AgentError::Busy`] while a reply
    /// is pending. Resolves with [`SubmitOutcome::Cancelled`] when a reset
    /// happens during the thinking delay.
    pub async fn submit(&self, text: &str) -> Result<SubmitOutcome, AgentError> {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!(session_id = %self.id, "Ignoring blank message");
            return Ok(SubmitOutcome::Ignored);
        }

        // Subscribe under the lock so a reset after this point is observed
        let (user_message, epoch, mut epoch_rx) = {
            let mut inner = self.inner.lock();
            if inner.state == SessionState::AwaitingResponse {
                return Err(AgentError::Busy);
            }
            let message = inner.append(Sender::User, text);
            inner.state = SessionState::AwaitingResponse;
            (message, inner.epoch, self.epoch_tx.subscribe())
        };
        let mut pending = PendingReply {
            inner: &self.inner,
            epoch,
            armed: true,
        };

        self.emit(SessionEvent::MessageAppended {
            session_id: self.id.clone(),
            message: user_message,
            topic: None,
        });

        let reply = self.engine.respond(text);
        let delay = self.engine.thinking_delay(&self.config.thinking_delay);
        tracing::debug!(
            session_id = %self.id,
            topic = reply.topic.as_deref().unwrap_or("fallback"),
            delay_ms = delay.as_millis() as u64,
            "Reply pending"
        );

        let reset_during_delay = tokio::select! {
            _ = tokio::time::sleep(delay) => false,
            _ = epoch_rx.wait_for(|current| *current != epoch) => true,
        };

        let appended = {
            let mut inner = self.inner.lock();
            if reset_during_delay || inner.epoch != epoch {
                None
            } else {
                let message = inner.append(Sender::Assistant, &reply.text);
                inner.state = SessionState::Idle;
                Some(message)
            }
        };
        pending.armed = false;

        match appended {
            Some(message) => {
                self.emit(SessionEvent::MessageAppended {
                    session_id: self.id.clone(),
                    message: message.clone(),
                    topic: reply.topic,
                });
                Ok(SubmitOutcome::Replied(message))
            }
            None => {
                tracing::info!(session_id = %self.id, "Pending reply cancelled by reset");
                self.emit(SessionEvent::Cancelled {
                    session_id: self.id.clone(),
                });
                Ok(SubmitOutcome::Cancelled)
            }
        }
    }

    /// Clear the history back to the greeting and cancel any pending reply
    pub fn reset(&self) {
        {
            let mut inner = self.inner.lock();
            inner.restart(self.engine.greeting());
            self.epoch_tx.send_replace(inner.epoch);
        }

        tracing::info!(session_id = %self.id, "Session reset");
        self.emit(SessionEvent::Reset {
            session_id: self.id.clone(),
        });
    }

    /// `"{label}: {text}"` per message, separated by blank lines
    pub fn export_transcript(&self) -> String {
        self.inner
            .lock()
            .messages
            .iter()
            .map(|m| format!("{}: {}", self.label(m.sender), m.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Transcript prefixed with the consultation header
    pub fn share_text(&self) -> String {
        format!("{}\n\n{}", self.config.share_header, self.export_transcript())
    }

    fn label(&self, sender: Sender) -> &str {
        match sender {
            Sender::User => &self.config.user_label,
            Sender::Assistant => &self.config.assistant_label,
        }
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event.clone());

        for observer in self.observers.read().iter() {
            if let Err(e) = observer.on_event(&event) {
                tracing::warn!(
                    session_id = %self.id,
                    event = event.name(),
                    error = %e,
                    "Session observer failed"
                );
            }
        }
    }
}

impl std::fmt::Debug for ConversationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationSession")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("messages", &self.message_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use legalmind_config::ThinkingDelayConfig;
    use legalmind_text_processing::KnowledgeBase;
    use crate::response::ResponseSelector;

    fn session(delay: ThinkingDelayConfig) -> ConversationSession {
        let kb = Arc::new(KnowledgeBase::bundled().unwrap());
        let engine = Arc::new(ResponseEngine::with_selector(kb, ResponseSelector::seeded(1)));
        let config = ChatConfig {
            thinking_delay: delay,
            ..ChatConfig::default()
        };
        ConversationSession::new(engine, config)
    }

    #[test]
    fn test_new_session_has_greeting() {
        let session = session(ThinkingDelayConfig::none());
        let history = session.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, 1);
        assert!(history[0].is_assistant());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_submit_appends_pair() {
        let session = session(ThinkingDelayConfig::none());
        let outcome = session.submit("Tell me about GST").await.unwrap();

        let reply = outcome.message().unwrap();
        assert!(reply.is_assistant());
        assert_eq!(reply.id, 3);

        let history = session.history();
        assert_eq!(history.len(), 3);
        assert_eq!(history[1].text, "Tell me about GST");
        assert!(history[1].is_user());
        assert!(!session.is_typing());
    }

    #[tokio::test]
    async fn test_blank_submit_ignored() {
        let session = session(ThinkingDelayConfig::none());
        let before = session.history();
        assert_eq!(session.submit("").await.unwrap(), SubmitOutcome::Ignored);
        assert_eq!(session.submit("   \n").await.unwrap(), SubmitOutcome::Ignored);
        assert_eq!(session.history(), before);
    }

    #[tokio::test]
    async fn test_ids_increase() {
        let session = session(ThinkingDelayConfig::none());
        session.submit("hello").await.unwrap();
        session.submit("bail").await.unwrap();

        let ids: Vec<MessageId> = session.history().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_reset_restores_greeting() {
        let session = session(ThinkingDelayConfig::none());
        session.submit("Tell me about GST").await.unwrap();
        session.reset();

        let history = session.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, 1);
        assert_eq!(history[0].text, session.engine.greeting());

        // Counter restarts
        session.submit("bail").await.unwrap();
        assert_eq!(session.history()[1].id, 2);
    }

    #[tokio::test]
    async fn test_transcript_format() {
        let session = session(ThinkingDelayConfig::none());
        session.submit("Tell me about GST").await.unwrap();

        let transcript = session.export_transcript();
        let lines: Vec<&str> = transcript.split('\n').collect();
        assert_eq!(lines.len(), 2 * 3 - 1);
        assert!(lines[0].starts_with("LegalMind AI: Hello!"));
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "You: Tell me about GST");
        assert_eq!(transcript, session.export_transcript());
    }

    #[tokio::test]
    async fn test_share_text_header() {
        let session = session(ThinkingDelayConfig::none());
        let share = session.share_text();
        assert!(share.starts_with("LegalMind AI Legal Consultation\n\nLegalMind AI: "));
        assert!(share.ends_with(&session.export_transcript()));
    }

    #[tokio::test]
    async fn test_events_broadcast() {
        let session = session(ThinkingDelayConfig::none());
        let mut rx = session.subscribe();

        session.submit("Tell me about GST").await.unwrap();
        session.reset();

        let first = rx.recv().await.unwrap();
        assert!(matches!(first, SessionEvent::MessageAppended { topic: None, .. }));

        match rx.recv().await.unwrap() {
            SessionEvent::MessageAppended { topic, message, .. } => {
                assert_eq!(topic.as_deref(), Some("taxation"));
                assert!(message.is_assistant());
            }
            other => panic!("unexpected event: {:?}", other),
        }

        assert!(matches!(rx.recv().await.unwrap(), SessionEvent::Reset { .. }));
    }
}

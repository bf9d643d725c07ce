//! Admission of chat messages from the console

use legalmind_agent::{AgentError, ConversationSession, RateLimiter};

/// Decide whether a message from `user_id` may be submitted now
///
/// A busy session rejects before the limiter is consulted, so a rejected
/// message does not use up quota.
pub fn admit_message(
    session: &ConversationSession,
    limiter: &RateLimiter,
    user_id: &str,
) -> Result<(), AgentError> {
    if session.is_typing() {
        return Err(AgentError::Busy);
    }
    limiter.check(user_id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use legalmind_agent::{ResponseEngine, ResponseSelector, SubmitOutcome};
    use legalmind_config::{ChatConfig, RateLimitConfig, ThinkingDelayConfig};
    use legalmind_text_processing::KnowledgeBase;

    fn session(delay_ms: u64) -> Arc<ConversationSession> {
        let kb = Arc::new(KnowledgeBase::bundled().unwrap());
        let engine = Arc::new(ResponseEngine::with_selector(kb, ResponseSelector::seeded(3)));
        let config = ChatConfig {
            thinking_delay: ThinkingDelayConfig::fixed(delay_ms),
            ..ChatConfig::default()
        };
        Arc::new(ConversationSession::new(engine, config))
    }

    fn single_request_limiter() -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            enabled: true,
            max_requests: 1,
            window_secs: 60,
            ..RateLimitConfig::default()
        })
    }

    #[tokio::test]
    async fn test_busy_session_keeps_quota() {
        let session = session(200);
        let limiter = single_request_limiter();

        let pending = {
            let session = session.clone();
            tokio::spawn(async move { session.submit("hello").await })
        };
        tokio::time::timeout(Duration::from_secs(1), async {
            while !session.is_typing() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        assert!(matches!(
            admit_message(&session, &limiter, "alice"),
            Err(AgentError::Busy)
        ));

        let outcome = pending.await.unwrap().unwrap();
        assert!(matches!(outcome, SubmitOutcome::Replied(_)));

        assert!(admit_message(&session, &limiter, "alice").is_ok());
        assert!(matches!(
            admit_message(&session, &limiter, "alice"),
            Err(AgentError::RateLimited(_))
        ));
    }

    #[tokio::test]
    async fn test_idle_session_admitted() {
        let session = session(0);
        let limiter = single_request_limiter();
        assert!(admit_message(&session, &limiter, "bob").is_ok());
    }
}

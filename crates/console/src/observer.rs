//! Session observer that records events to the log

use legalmind_core::{Result, SessionEvent, SessionObserver};

/// Logs every session event as a structured JSON payload
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

impl SessionObserver for LoggingObserver {
    fn on_event(&self, event: &SessionEvent) -> Result<()> {
        let payload = serde_json::to_string(event)?;
        tracing::debug!(
            session_id = event.session_id(),
            event = event.name(),
            payload = %payload,
            "Session event"
        );
        Ok(())
    }
}

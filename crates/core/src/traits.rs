//! Collaborator traits
//!
//! The assistant core performs no I/O itself. Document text and event
//! recording are provided by the host through these traits.

use async_trait::async_trait;

use crate::{Result, SessionEvent};

/// Supplies raw document text for analysis (file upload + text extraction)
#[async_trait]
pub trait DocumentTextProvider: Send + Sync {
    /// Name of the document, for logging and reports
    fn name(&self) -> &str;

    /// Fetch the full document text
    async fn document_text(&self) -> Result<String>;
}

/// Receives session events for persistence or analytics
///
/// Observers are called fire-and-forget: an `Err` is logged by the session
/// and otherwise ignored.
pub trait SessionObserver: Send + Sync {
    fn on_event(&self, event: &SessionEvent) -> Result<()>;
}

/// Document provider over text already in memory
#[derive(Debug, Clone)]
pub struct StaticDocument {
    name: String,
    text: String,
}

impl StaticDocument {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

#[async_trait]
impl DocumentTextProvider for StaticDocument {
    fn name(&self) -> &str {
        &self.name
    }

    async fn document_text(&self) -> Result<String> {
        Ok(self.text.clone())
    }
}

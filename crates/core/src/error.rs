//! Error types shared by collaborators of the assistant core

use thiserror::Error;

/// Result alias for collaborator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised at collaborator boundaries
#[derive(Error, Debug)]
pub enum Error {
    /// Document text could not be obtained
    #[error("Document unavailable: {0}")]
    DocumentUnavailable(String),

    /// Document text was obtained but is not usable text
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// An observer failed to record an event
    #[error("Observer error: {0}")]
    Observer(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

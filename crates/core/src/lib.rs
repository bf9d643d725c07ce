//! Core traits and types for the legal assistant
//!
//! This crate provides foundational types used across all other crates:
//! - Conversation types (messages, senders, session events)
//! - Extraction types (dates, amounts, party names)
//! - Collaborator traits (document text, session observers)
//! - Error types

pub mod conversation;
pub mod error;
pub mod extraction;
pub mod traits;

pub use conversation::{Message, MessageId, Sender, SessionEvent};
pub use error::{Error, Result};
pub use extraction::{ExtractedField, FieldKind, PartyRole, DEFAULT_CURRENCY};
pub use traits::{DocumentTextProvider, SessionObserver, StaticDocument};

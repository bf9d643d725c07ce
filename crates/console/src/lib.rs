//! Console host for the legal assistant
//!
//! Wires the assistant core to a terminal: parses input lines into
//! commands, gates messages on busy sessions and rate limits, reads
//! documents from disk for analysis and logs session events.

pub mod command;
pub mod document;
pub mod gate;
pub mod observer;

pub use command::Command;
pub use document::FileDocument;
pub use gate::admit_message;
pub use observer::LoggingObserver;

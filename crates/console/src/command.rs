//! Console input parsing

use std::path::PathBuf;

/// A parsed line of console input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Chat message for the assistant
    Message(String),
    /// Start a new consultation
    Reset,
    /// Print the transcript, or write it to a file
    Export(Option<PathBuf>),
    /// Print the shareable consultation text
    Share,
    /// Analyze a document on disk
    Analyze(PathBuf),
    Help,
    Quit,
    /// Unrecognized slash command
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return Command::Message(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match (name.to_lowercase().as_str(), arg) {
            ("reset" | "new", _) => Command::Reset,
            ("export", "") => Command::Export(None),
            ("export", path) => Command::Export(Some(PathBuf::from(path))),
            ("share", _) => Command::Share,
            ("analyze", "") => Command::Unknown("/analyze needs a file path".to_string()),
            ("analyze", path) => Command::Analyze(PathBuf::from(path)),
            ("help" | "?", _) => Command::Help,
            ("quit" | "exit", _) => Command::Quit,
            _ => Command::Unknown(format!("Unknown command: /{}", name)),
        }
    }
}

pub const HELP: &str = "\
Commands:
  /reset            start a new consultation
  /export [file]    print the transcript or save it to a file
  /share            print the consultation as shareable text
  /analyze <file>   analyze a plain-text legal document
  /help             show this help
  /quit             leave";

//! Extraction result types

use serde::{Deserialize, Serialize};

/// Currency reported for every extracted amount. Multi-currency detection is
/// not supported.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Kind of structured value pulled from free text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Date,
    Amount,
    PartyName,
}

/// Role assigned to an extracted party
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    /// Licensor / Provider
    Licensor,
    /// Licensee / Customer
    Licensee,
}

impl PartyRole {
    pub fn display_name(&self) -> &'static str {
        match self {
            PartyRole::Licensor => "Licensor / Provider",
            PartyRole::Licensee => "Licensee / Customer",
        }
    }
}

impl std::fmt::Display for PartyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A structured value extracted from text. Produced per call, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedField {
    pub kind: FieldKind,
    /// Text exactly as matched in the source
    pub raw_match: String,
    /// Normalized form (ISO date, amount without symbol, unquoted name)
    pub normalized: Option<String>,
    /// Byte offset of the match in the source text
    pub offset: usize,
    /// Party role, only set for party names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<PartyRole>,
}

impl ExtractedField {
    pub fn new(kind: FieldKind, raw_match: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            raw_match: raw_match.into(),
            normalized: None,
            offset,
            role: None,
        }
    }

    pub fn with_normalized(mut self, normalized: impl Into<String>) -> Self {
        self.normalized = Some(normalized.into());
        self
    }

    /// Normalized value if present, otherwise the raw match
    pub fn value(&self) -> &str {
        self.normalized.as_deref().unwrap_or(&self.raw_match)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_prefers_normalized() {
        let field = ExtractedField::new(FieldKind::Amount, "$1,200", 4).with_normalized("1,200");
        assert_eq!(field.value(), "1,200");

        let field = ExtractedField::new(FieldKind::Date, "13/45/2024", 0);
        assert_eq!(field.value(), "13/45/2024");
    }

    #[test]
    fn test_role_display() {
        assert_eq!(PartyRole::Licensor.to_string(), "Licensor / Provider");
        assert_eq!(PartyRole::Licensee.display_name(), "Licensee / Customer");
    }
}

//! Pattern-Based Field Extraction
//!
//! Extracts structured fields from legal document text:
//! - Dates (`February 1, 2024`, `02/01/2024`, `2024-02-01`)
//! - USD amounts (`$75,000`, `$1,250.50`)
//! - Party names (`CloudTech Solutions Inc.`, `"Acme Holdings LLC"`)
//!
//! Extraction never fails: absence of matches yields an empty vector.
//! Results are ordered by position of first appearance in the text.
//!
//! # Example
//!
//! ```
//! use legalmind_text_processing::PatternExtractor;
//!
//! let extractor = PatternExtractor::new();
//! let amounts = extractor.extract_amounts("An annual fee of $75,000 is due.");
//!
//! assert_eq!(amounts.len(), 1);
//! assert_eq!(amounts[0].normalized.as_deref(), Some("75,000"));
//! ```

use chrono::NaiveDate;
use legalmind_core::{ExtractedField, FieldKind, PartyRole};
use once_cell::sync::Lazy;
use regex::{Captures, Match, Regex};

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// Capitalized words that precede a name without being part of it
const LEADING_WORDS: [&str; 4] = ["The", "This", "Licensor", "Licensee"];

const ENTITY_SUFFIXES: &str = r"(?:Inc\.|LLC\b|Corp\.|Corporation\b|Company\b)";

// Compiled regex patterns
static TEXTUAL_DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b({})\s+(\d{{1,2}}),?\s+(\d{{4}})\b", MONTHS.join("|"))).unwrap()
});

static SLASH_DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").unwrap());

static ISO_DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap());

static AMOUNT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(\d{1,3}(?:,\d{3})+|\d+)(\.\d{2}\b)?").unwrap());

// One to three capitalized words (CamelCase allowed) followed by an entity suffix
static PARTY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b((?:[A-Z][A-Za-z]+[ \t]+){{0,2}}[A-Z][A-Za-z]+)[ \t]+{}",
        ENTITY_SUFFIXES
    ))
    .unwrap()
});

static QUOTED_PARTY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"["\u{{201C}}]([^"\u{{201C}}\u{{201D}}\n]{{1,80}}?{})["\u{{201D}}]"#,
        ENTITY_SUFFIXES
    ))
    .unwrap()
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Regex-driven extractor for dates, amounts and party names
///
/// Stateless; patterns are compiled once per process and shared.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternExtractor;

impl PatternExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Dates in textual, `MM/DD/YYYY` and `YYYY-MM-DD` form
    ///
    /// Duplicates are kept. `normalized` holds the ISO form when the match is
    /// a valid calendar date.
    pub fn extract_dates(&self, text: &str) -> Vec<ExtractedField> {
        let mut fields: Vec<ExtractedField> = Vec::new();

        for caps in TEXTUAL_DATE_PATTERN.captures_iter(text) {
            let month = MONTHS
                .iter()
                .position(|m| *m == &caps[1])
                .map(|i| i as u32 + 1);
            let normalized = month.and_then(|m| iso_date(number(&caps, 3), m, number(&caps, 2)));
            fields.push(date_field(&caps, normalized));
        }

        for caps in SLASH_DATE_PATTERN.captures_iter(text) {
            let normalized = iso_date(number(&caps, 3), number(&caps, 1), number(&caps, 2));
            fields.push(date_field(&caps, normalized));
        }

        for caps in ISO_DATE_PATTERN.captures_iter(text) {
            let normalized = iso_date(number(&caps, 1), number(&caps, 2), number(&caps, 3));
            fields.push(date_field(&caps, normalized));
        }

        fields.sort_by_key(|f| f.offset);
        fields
    }

    /// Dollar amounts; `normalized` drops the `$`. Currency is always USD.
    pub fn extract_amounts(&self, text: &str) -> Vec<ExtractedField> {
        AMOUNT_PATTERN
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let normalized = whole.as_str().trim_start_matches('$');
                Some(
                    ExtractedField::new(FieldKind::Amount, whole.as_str(), whole.start())
                        .with_normalized(normalized),
                )
            })
            .collect()
    }

    /// Company names ending in a legal-entity suffix, bare or quoted
    ///
    /// A bare match inside a quoted name is dropped. Leading articles and
    /// role words are trimmed. Deduplicated by normalized name (first
    /// occurrence wins) and given roles by [`assign_party_roles`].
    pub fn extract_party_names(&self, text: &str) -> Vec<ExtractedField> {
        let quoted: Vec<Match<'_>> = QUOTED_PARTY_PATTERN.find_iter(text).collect();

        let bare = PARTY_PATTERN
            .find_iter(text)
            .filter(|m| {
                !quoted
                    .iter()
                    .any(|q| q.start() <= m.start() && m.end() <= q.end())
            })
            .map(|m| {
                let (raw, skipped) = strip_leading_words(m.as_str());
                (raw, m.start() + skipped)
            });

        let mut candidates: Vec<ExtractedField> = quoted
            .iter()
            .map(|q| (q.as_str(), q.start()))
            .chain(bare)
            .map(|(raw, offset)| {
                ExtractedField::new(FieldKind::PartyName, raw, offset)
                    .with_normalized(normalize_party_name(raw))
            })
            .collect();
        candidates.sort_by_key(|f| f.offset);

        let mut parties: Vec<ExtractedField> = Vec::new();
        for candidate in candidates {
            if !parties.iter().any(|p| p.normalized == candidate.normalized) {
                parties.push(candidate);
            }
        }

        assign_party_roles(&mut parties);
        parties
    }

    /// All fields of every kind, ordered by position
    pub fn extract_all(&self, text: &str) -> Vec<ExtractedField> {
        let mut fields = self.extract_dates(text);
        fields.extend(self.extract_amounts(text));
        fields.extend(self.extract_party_names(text));
        fields.sort_by_key(|f| f.offset);
        fields
    }
}

/// Assign party roles by order of first appearance
///
/// Heuristic, not inference: the first distinct party becomes the
/// Licensor / Provider and the second the Licensee / Customer. Any further
/// parties get no role. This is wrong for documents that name the customer
/// first or that have more than two parties.
pub fn assign_party_roles(parties: &mut [ExtractedField]) {
    for (i, party) in parties.iter_mut().enumerate() {
        party.role = match i {
            0 => Some(PartyRole::Licensor),
            1 => Some(PartyRole::Licensee),
            _ => None,
        };
    }
}

fn normalize_party_name(raw: &str) -> String {
    let unquoted = raw.trim_matches(|c| c == '"' || c == '\u{201C}' || c == '\u{201D}');
    let collapsed = WHITESPACE.replace_all(unquoted.trim(), " ");
    strip_leading_words(&collapsed).0.to_string()
}

/// Drop leading [`LEADING_WORDS`] while at least a name word and the suffix
/// remain. Returns the rest and the number of bytes skipped.
fn strip_leading_words(raw: &str) -> (&str, usize) {
    let mut rest = raw;
    while let Some((first, tail)) = rest.split_once([' ', '\t']) {
        let tail = tail.trim_start();
        if !LEADING_WORDS.contains(&first) || !tail.contains([' ', '\t']) {
            break;
        }
        rest = tail;
    }
    (rest, raw.len() - rest.len())
}

fn number(caps: &Captures<'_>, group: usize) -> u32 {
    caps.get(group)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

fn iso_date(year: u32, month: u32, day: u32) -> Option<String> {
    let year = i32::try_from(year).ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.format("%Y-%m-%d").to_string())
}

fn date_field(caps: &Captures<'_>, normalized: Option<String>) -> ExtractedField {
    let (raw, offset) = caps
        .get(0)
        .map(|m| (m.as_str(), m.start()))
        .unwrap_or_default();
    let mut field = ExtractedField::new(FieldKind::Date, raw, offset);
    field.normalized = normalized;
    field
}

//! Text Processing for the Legal Assistant
//!
//! This crate provides the rule-based text capabilities of the assistant:
//! - **Knowledge Base**: validated topics, triggers and canned responses
//! - **Intent Matching**: first-match keyword scan over the knowledge base
//! - **Pattern Extraction**: dates, USD amounts and party names via regex
//! - **Document Analysis**: document type, parties, key dates, financial
//!   terms, risk factors and compliance gaps built on the extractor
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use legalmind_text_processing::{IntentMatcher, KnowledgeBase};
//!
//! let kb = Arc::new(KnowledgeBase::bundled().unwrap());
//! let matcher = IntentMatcher::new(kb);
//!
//! assert_eq!(matcher.detect("Tell me about GST"), Some("taxation"));
//! ```

pub mod analysis;
pub mod entities;
pub mod intent;
pub mod knowledge;

pub use analysis::{
    ComplianceItem, ComplianceStatus, DocumentAnalysis, DocumentAnalyzer, DocumentSummary,
    DocumentType, FinancialTerm, FinancialTermKind, Importance, KeyDate, KeyDateKind, Party,
    RiskFactor, RiskLevel,
};
pub use entities::{assign_party_roles, PatternExtractor};
pub use intent::{IntentMatch, IntentMatcher};
pub use knowledge::{KnowledgeBase, KnowledgeBaseError, Topic};

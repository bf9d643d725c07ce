//! Rule-Based Document Analysis
//!
//! Builds a structured report of a legal document on top of the
//! [`PatternExtractor`]:
//! - document type by keyword rules
//! - parties with roles, key dates, financial terms
//! - risk factors and compliance gaps from [`rules`]
//!
//! There is no language understanding here. Every field is either a regex
//! match or a keyword rule hit.

pub mod rules;

use chrono::{DateTime, Utc};
use legalmind_core::{
    DocumentTextProvider, Error as CoreError, ExtractedField, PartyRole, DEFAULT_CURRENCY,
};
use serde::{Deserialize, Serialize};

use crate::entities::PatternExtractor;

/// Document category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    SoftwareLicense,
    Employment,
    NonDisclosure,
    Contract,
}

impl DocumentType {
    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentType::SoftwareLicense => "Software License Agreement",
            DocumentType::Employment => "Employment Agreement",
            DocumentType::NonDisclosure => "Non-Disclosure Agreement",
            DocumentType::Contract => "Contract",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A contracting party
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    pub role: Option<PartyRole>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyDateKind {
    Effective,
    Deadline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    High,
    Critical,
}

/// A date found in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDate {
    /// Date as written
    pub date: String,
    /// ISO form, when the date is a valid calendar date
    pub iso_date: Option<String>,
    pub kind: KeyDateKind,
    pub importance: Importance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialTermKind {
    Fee,
    Penalty,
}

/// A monetary amount found in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialTerm {
    /// Amount without currency symbol, e.g. `75,000`
    pub amount: String,
    pub currency: String,
    pub kind: FinancialTermKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub level: RiskLevel,
    pub description: String,
    pub impact: String,
    pub mitigation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    NonCompliant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceItem {
    pub requirement: String,
    pub status: ComplianceStatus,
    pub details: String,
}

/// Short human-readable digest of an analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub executive_summary: String,
    pub key_points: Vec<String>,
}

/// Full analysis report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub document_name: Option<String>,
    pub document_type: DocumentType,
    pub parties: Vec<Party>,
    pub key_dates: Vec<KeyDate>,
    pub financial_terms: Vec<FinancialTerm>,
    pub risk_factors: Vec<RiskFactor>,
    /// Outcome of every compliance rule, satisfied or not
    pub compliance_items: Vec<ComplianceItem>,
    pub word_count: usize,
    pub analyzed_at: DateTime<Utc>,
}

impl DocumentAnalysis {
    /// Compliance rules the document does not satisfy
    pub fn compliance_gaps(&self) -> impl Iterator<Item = &ComplianceItem> {
        self.compliance_items
            .iter()
            .filter(|c| c.status == ComplianceStatus::NonCompliant)
    }

    pub fn highest_risk(&self) -> Option<RiskLevel> {
        self.risk_factors.iter().map(|r| r.level).max()
    }

    pub fn summary(&self) -> DocumentSummary {
        let subject = self
            .document_name
            .as_deref()
            .map(|name| format!("{} is a {}", name, self.document_type))
            .unwrap_or_else(|| format!("This document is a {}", self.document_type));

        let between = match self.parties.as_slice() {
            [] => "with no identified parties".to_string(),
            [only] => format!("involving {}", only.name),
            [first, second] => format!("between {} and {}", first.name, second.name),
            [first, second, rest @ ..] => format!(
                "between {}, {} and {} other part{}",
                first.name,
                second.name,
                rest.len(),
                if rest.len() == 1 { "y" } else { "ies" }
            ),
        };

        let gaps = self.compliance_gaps().count();
        let executive_summary = format!(
            "{} {}. It references {} key date{} and {} financial term{}, with {} risk factor{} and {} compliance gap{} identified.",
            subject,
            between,
            self.key_dates.len(),
            plural(self.key_dates.len()),
            self.financial_terms.len(),
            plural(self.financial_terms.len()),
            self.risk_factors.len(),
            plural(self.risk_factors.len()),
            gaps,
            plural(gaps),
        );

        let mut key_points = Vec::new();
        for party in &self.parties {
            match party.role {
                Some(role) => key_points.push(format!("{}: {}", role, party.name)),
                None => key_points.push(format!("Additional party: {}", party.name)),
            }
        }
        if let Some(effective) = self
            .key_dates
            .iter()
            .find(|d| d.kind == KeyDateKind::Effective)
        {
            key_points.push(format!("Effective date: {}", effective.date));
        }
        if let Some(fee) = self
            .financial_terms
            .iter()
            .find(|t| t.kind == FinancialTermKind::Fee)
        {
            key_points.push(format!("Fee: {} {}", fee.amount, fee.currency));
        }
        for risk in &self.risk_factors {
            key_points.push(format!("{:?} risk: {}", risk.level, risk.description));
        }
        for gap in self.compliance_gaps() {
            key_points.push(format!("Compliance gap: {}", gap.details));
        }

        DocumentSummary {
            executive_summary,
            key_points,
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Rule-based analyzer over the pattern extractor
#[derive(Debug, Clone, Default)]
pub struct DocumentAnalyzer {
    extractor: PatternExtractor,
}

impl DocumentAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyze document text. Never fails; an empty document yields an
    /// empty report classified as a plain contract.
    pub fn analyze(&self, text: &str) -> DocumentAnalysis {
        self.analyze_named(None, text)
    }

    /// Fetch text from a provider and analyze it
    ///
    /// Provider failures and blank documents are returned to the caller.
    pub async fn analyze_from(
        &self,
        provider: &dyn DocumentTextProvider,
    ) -> legalmind_core::Result<DocumentAnalysis> {
        let text = provider.document_text().await?;
        if text.trim().is_empty() {
            return Err(CoreError::InvalidDocument(format!(
                "{} contains no text",
                provider.name()
            )));
        }

        Ok(self.analyze_named(Some(provider.name()), &text))
    }

    fn analyze_named(&self, name: Option<&str>, text: &str) -> DocumentAnalysis {
        let lowered = text.to_lowercase();

        let parties = self
            .extractor
            .extract_party_names(text)
            .into_iter()
            .map(|field| Party {
                name: field.value().to_string(),
                role: field.role,
            })
            .collect::<Vec<_>>();

        let key_dates = self
            .extractor
            .extract_dates(text)
            .into_iter()
            .enumerate()
            .map(|(i, field)| key_date(i, field))
            .collect::<Vec<_>>();

        let financial_terms = self
            .extractor
            .extract_amounts(text)
            .into_iter()
            .enumerate()
            .map(|(i, field)| FinancialTerm {
                amount: field.value().to_string(),
                currency: DEFAULT_CURRENCY.to_string(),
                kind: if i == 0 {
                    FinancialTermKind::Fee
                } else {
                    FinancialTermKind::Penalty
                },
            })
            .collect::<Vec<_>>();

        let risk_factors = rules::RISK_RULES
            .iter()
            .filter(|rule| rule.applies(&lowered))
            .map(|rule| RiskFactor {
                level: rule.level,
                description: rule.description.to_string(),
                impact: rule.impact.to_string(),
                mitigation: rule.mitigation.to_string(),
            })
            .collect::<Vec<_>>();

        let compliance_items = rules::COMPLIANCE_RULES
            .iter()
            .map(|rule| {
                let status = rule.status(&lowered);
                let details = match status {
                    ComplianceStatus::Compliant => rule.present_details,
                    ComplianceStatus::NonCompliant => rule.missing_details,
                };
                ComplianceItem {
                    requirement: rule.requirement.to_string(),
                    status,
                    details: details.to_string(),
                }
            })
            .collect::<Vec<_>>();

        let analysis = DocumentAnalysis {
            document_name: name.map(str::to_string),
            document_type: rules::classify(&lowered),
            parties,
            key_dates,
            financial_terms,
            risk_factors,
            compliance_items,
            word_count: text.split_whitespace().count(),
            analyzed_at: Utc::now(),
        };

        tracing::info!(
            document = name.unwrap_or("<inline>"),
            document_type = %analysis.document_type,
            parties = analysis.parties.len(),
            dates = analysis.key_dates.len(),
            amounts = analysis.financial_terms.len(),
            risks = analysis.risk_factors.len(),
            "Analyzed document"
        );

        analysis
    }
}

fn key_date(index: usize, field: ExtractedField) -> KeyDate {
    let (kind, importance) = if index == 0 {
        (KeyDateKind::Effective, Importance::Critical)
    } else {
        (KeyDateKind::Deadline, Importance::High)
    };

    KeyDate {
        date: field.raw_match,
        iso_date: field.normalized,
        kind,
        importance,
    }
}

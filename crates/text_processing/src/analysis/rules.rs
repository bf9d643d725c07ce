//! Keyword rules for document analysis
//!
//! All keywords are lowercase and matched as substrings of the lowercased
//! document text. Rule order matters for document type classification.

use super::{ComplianceStatus, DocumentType, RiskLevel};

/// Classifies a document by keyword; first rule with any keyword present wins
#[derive(Debug, Clone, Copy)]
pub struct DocumentTypeRule {
    pub keywords: &'static [&'static str],
    pub document_type: DocumentType,
}

/// Flags a risk when any trigger is present and no exclusion is
#[derive(Debug, Clone, Copy)]
pub struct RiskRule {
    pub triggers: &'static [&'static str],
    pub exclusions: &'static [&'static str],
    pub level: RiskLevel,
    pub description: &'static str,
    pub impact: &'static str,
    pub mitigation: &'static str,
}

/// A clause the document is expected to contain
#[derive(Debug, Clone, Copy)]
pub struct ComplianceRule {
    pub requirement: &'static str,
    /// Any of these satisfies the requirement
    pub satisfied_by: &'static [&'static str],
    pub missing_details: &'static str,
    pub present_details: &'static str,
}

pub const DOCUMENT_TYPE_RULES: &[DocumentTypeRule] = &[
    DocumentTypeRule {
        keywords: &["license", "software"],
        document_type: DocumentType::SoftwareLicense,
    },
    DocumentTypeRule {
        keywords: &["employment", "employee"],
        document_type: DocumentType::Employment,
    },
    DocumentTypeRule {
        keywords: &["nda", "confidential"],
        document_type: DocumentType::NonDisclosure,
    },
];

pub const RISK_RULES: &[RiskRule] = &[
    RiskRule {
        triggers: &["unlimited liability", "uncapped liability"],
        exclusions: &[],
        level: RiskLevel::High,
        description: "Unlimited liability exposure identified",
        impact: "Potential for significant financial risk",
        mitigation: "Negotiate liability caps and limitations",
    },
    RiskRule {
        triggers: &["automatic renewal"],
        exclusions: &["opt-out"],
        level: RiskLevel::Medium,
        description: "Automatic renewal without clear opt-out mechanism",
        impact: "May result in unintended contract extensions",
        mitigation: "Add clear termination and opt-out procedures",
    },
];

pub const COMPLIANCE_RULES: &[ComplianceRule] = &[
    ComplianceRule {
        requirement: "GDPR Data Protection",
        satisfied_by: &["gdpr", "data protection"],
        missing_details: "No GDPR or data protection clauses identified",
        present_details: "Data protection provisions present",
    },
    ComplianceRule {
        requirement: "Force Majeure Clause",
        satisfied_by: &["force majeure"],
        missing_details: "No force majeure provisions found",
        present_details: "Force majeure provisions present",
    },
];

fn contains_any(lowered: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| lowered.contains(k))
}

/// Document type for already-lowercased text
pub fn classify(lowered: &str) -> DocumentType {
    DOCUMENT_TYPE_RULES
        .iter()
        .find(|rule| contains_any(lowered, rule.keywords))
        .map(|rule| rule.document_type)
        .unwrap_or(DocumentType::Contract)
}

impl RiskRule {
    pub fn applies(&self, lowered: &str) -> bool {
        contains_any(lowered, self.triggers) && !contains_any(lowered, self.exclusions)
    }
}

impl ComplianceRule {
    pub fn status(&self, lowered: &str) -> ComplianceStatus {
        if contains_any(lowered, self.satisfied_by) {
            ComplianceStatus::Compliant
        } else {
            ComplianceStatus::NonCompliant
        }
    }
}

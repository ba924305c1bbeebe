use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the input manifest. Exists only while loading; classification
/// consumes it and produces a [`ClassifiedRow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRecord {
    pub url: String,
    pub content_type: String,
    pub word_count: u64,
}

/// Copyright-risk severity for a source domain.
///
/// Variants are declared in ascending severity so the derived ordering gives
/// `Unknown < Low < Medium < High`. The ordering is defensive: database
/// validation rejects duplicate patterns, so two entries never compete for
/// the same exact domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Unknown,
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::High => write!(f, "high"),
            RiskTier::Medium => write!(f, "medium"),
            RiskTier::Low => write!(f, "low"),
            RiskTier::Unknown => write!(f, "unknown"),
        }
    }
}

/// A manifest entry after classification against the risk database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRow {
    pub url: String,
    /// Normalized domain, or `""` when the URL could not be parsed.
    pub domain: String,
    pub content_type: String,
    pub word_count: u64,
    pub risk_level: RiskTier,
    pub risk_reason: String,
    /// Absent when the tier is [`RiskTier::Unknown`].
    pub publisher: Option<String>,
}

/// Per-domain rollup of high/medium-risk rows, for the summary's
/// `top_risk_domains` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRollup {
    pub domain: String,
    pub publisher: Option<String>,
    pub risk_level: RiskTier,
    pub count: usize,
    pub total_words: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub total_sources: usize,
    pub high_risk_count: usize,
    pub medium_risk_count: usize,
    pub low_risk_count: usize,
    pub unknown_count: usize,
    pub high_risk_pct: f64,
    pub medium_risk_pct: f64,
    pub low_risk_pct: f64,
    pub unknown_pct: f64,
    pub top_risk_domains: Vec<DomainRollup>,
    pub recommendations: Vec<String>,
}

/// A completed audit: identity, timestamp, classified rows in input order,
/// and the aggregate summary. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub audit_id: String,
    pub created_at: DateTime<Utc>,
    pub rows: Vec<ClassifiedRow>,
    pub summary: AuditSummary,
}

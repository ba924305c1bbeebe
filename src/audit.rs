//! One audit run: manifest text in, classified rows and summary out.

use indicatif::{ProgressBar, ProgressStyle};

use crate::aggregate::summarize;
use crate::error::InputError;
use crate::manifest::parse_manifest;
use crate::models::{AuditSummary, ClassifiedRow};
use crate::risk::classifier::classify;
use crate::risk::db::RiskDb;

/// Row count above which the classification pass shows a progress bar.
const PROGRESS_THRESHOLD: usize = 1_000;

/// Run the full pipeline: load → classify each row in order → aggregate.
///
/// Structural manifest problems abort with [`InputError`] before any row is
/// classified. Row-level URL problems never abort; they surface as Unknown
/// rows. Every manifest record yields exactly one classified row, in input
/// order.
pub fn run_audit(
    manifest_text: &str,
    db: &RiskDb,
    quiet: bool,
) -> Result<(Vec<ClassifiedRow>, AuditSummary), InputError> {
    let records = parse_manifest(manifest_text)?;

    let pb = if !quiet && records.len() >= PROGRESS_THRESHOLD {
        let pb = ProgressBar::new(records.len() as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} classified")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        Some(pb)
    } else {
        None
    };

    let rows: Vec<ClassifiedRow> = records
        .iter()
        .map(|record| {
            let row = classify(record, db);
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            row
        })
        .collect();

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let summary = summarize(&rows);
    Ok((rows, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskTier;
    use crate::risk::db::DomainEntry;

    fn worked_example_db() -> RiskDb {
        RiskDb::from_entries(vec![
            DomainEntry {
                domain_pattern: "nytimes.com".to_string(),
                publisher: "The New York Times".to_string(),
                tier: RiskTier::High,
                reason: "active litigation".to_string(),
            },
            DomainEntry {
                domain_pattern: "wikipedia.org".to_string(),
                publisher: "Wikimedia Foundation".to_string(),
                tier: RiskTier::Low,
                reason: "permissive license".to_string(),
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_worked_example() {
        let manifest = "url\n\
                        https://www.nytimes.com/2024/x\n\
                        https://en.wikipedia.org/y\n\
                        https://notreal.xyz/z\n";

        let (rows, summary) = run_audit(manifest, &worked_example_db(), true).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].domain, "nytimes.com");
        assert_eq!(rows[0].risk_level, RiskTier::High);
        assert_eq!(rows[1].domain, "en.wikipedia.org");
        assert_eq!(rows[1].risk_level, RiskTier::Low);
        assert_eq!(rows[2].domain, "notreal.xyz");
        assert_eq!(rows[2].risk_level, RiskTier::Unknown);
        assert_eq!(rows[2].risk_reason, "domain not in risk database");

        assert_eq!(summary.total_sources, 3);
        assert_eq!(summary.high_risk_count, 1);
        assert_eq!(summary.medium_risk_count, 0);
        assert_eq!(summary.low_risk_count, 1);
        assert_eq!(summary.unknown_count, 1);
        assert_eq!(summary.high_risk_pct, 33.3);
        assert_eq!(summary.low_risk_pct, 33.3);
        assert_eq!(summary.unknown_pct, 33.3);
    }

    #[test]
    fn test_counts_always_sum_to_total() {
        let manifest = "url\n\
                        https://nytimes.com/a\n\
                        https://wikipedia.org/b\n\
                        not a url\n\
                        https://unknown-site.io/c\n";

        let (rows, summary) = run_audit(manifest, &worked_example_db(), true).unwrap();

        assert_eq!(summary.total_sources, rows.len());
        assert_eq!(
            summary.high_risk_count
                + summary.medium_risk_count
                + summary.low_risk_count
                + summary.unknown_count,
            summary.total_sources
        );
    }

    #[test]
    fn test_idempotent_for_fixed_snapshot() {
        let manifest = "url,word_count\n\
                        https://www.nytimes.com/a,100\n\
                        https://notreal.xyz/b,200\n";
        let db = worked_example_db();

        let (rows_a, summary_a) = run_audit(manifest, &db, true).unwrap();
        let (rows_b, summary_b) = run_audit(manifest, &db, true).unwrap();

        assert_eq!(rows_a, rows_b);
        assert_eq!(summary_a, summary_b);
    }

    #[test]
    fn test_unparsable_row_does_not_abort() {
        let manifest = "url\nnot a url\nhttps://nytimes.com/x\n";
        let (rows, summary) = run_audit(manifest, &worked_example_db(), true).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].risk_level, RiskTier::Unknown);
        assert_eq!(rows[0].risk_reason, "unparsable URL");
        assert_eq!(rows[1].risk_level, RiskTier::High);
        assert_eq!(summary.unknown_count, 1);
    }

    #[test]
    fn test_structural_error_aborts_before_classification() {
        let manifest = "domain\nnytimes.com\n";
        let err = run_audit(manifest, &worked_example_db(), true).unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_empty_manifest_audits_cleanly() {
        let (rows, summary) = run_audit("url\n", &worked_example_db(), true).unwrap();

        assert!(rows.is_empty());
        assert_eq!(summary.total_sources, 0);
        assert_eq!(summary.high_risk_pct, 0.0);
        assert_eq!(
            summary.recommendations,
            vec!["No sources found in manifest; nothing to audit.".to_string()]
        );
    }
}

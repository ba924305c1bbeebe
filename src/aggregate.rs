//! Aggregate statistics and recommendations over classified rows.

use std::collections::HashMap;

use crate::models::{AuditSummary, ClassifiedRow, DomainRollup, RiskTier};

const TOP_DOMAINS: usize = 10;
const UNKNOWN_REVIEW_THRESHOLD: f64 = 0.10;

/// Reduce classified rows into an [`AuditSummary`].
///
/// Counts and per-domain rollups are built in a single pass. Percentages are
/// rounded to one decimal and defined as `0.0` for an empty manifest. The
/// recommendation rules are evaluated in a fixed order so output is stable
/// for a given row sequence.
pub fn summarize(rows: &[ClassifiedRow]) -> AuditSummary {
    let total = rows.len();
    let mut high = 0usize;
    let mut medium = 0usize;
    let mut low = 0usize;
    let mut unknown = 0usize;
    let mut rollups: HashMap<String, DomainRollup> = HashMap::new();

    for row in rows {
        match row.risk_level {
            RiskTier::High => high += 1,
            RiskTier::Medium => medium += 1,
            RiskTier::Low => low += 1,
            RiskTier::Unknown => unknown += 1,
        }

        if matches!(row.risk_level, RiskTier::High | RiskTier::Medium) {
            let rollup = rollups
                .entry(row.domain.clone())
                .or_insert_with(|| DomainRollup {
                    domain: row.domain.clone(),
                    publisher: row.publisher.clone(),
                    risk_level: row.risk_level,
                    count: 0,
                    total_words: 0,
                });
            rollup.count += 1;
            rollup.total_words += row.word_count;
        }
    }

    let mut top_risk_domains: Vec<DomainRollup> = rollups.into_values().collect();
    top_risk_domains.sort_by(|a, b| {
        b.risk_level
            .cmp(&a.risk_level)
            .then(b.count.cmp(&a.count))
            .then(a.domain.cmp(&b.domain))
    });
    top_risk_domains.truncate(TOP_DOMAINS);

    AuditSummary {
        total_sources: total,
        high_risk_count: high,
        medium_risk_count: medium,
        low_risk_count: low,
        unknown_count: unknown,
        high_risk_pct: pct(high, total),
        medium_risk_pct: pct(medium, total),
        low_risk_pct: pct(low, total),
        unknown_pct: pct(unknown, total),
        top_risk_domains,
        recommendations: recommendations(total, high, medium, unknown),
    }
}

/// `count / total * 100`, rounded to one decimal; `0.0` when `total == 0`.
fn pct(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 1000.0).round() / 10.0
}

fn recommendations(total: usize, high: usize, medium: usize, unknown: usize) -> Vec<String> {
    let mut recs = Vec::new();

    if high > 0 {
        recs.push(format!(
            "Obtain licenses for or remove {} high-risk source(s) before training.",
            high
        ));
    }
    if medium > 0 {
        recs.push(format!(
            "Confirm attribution/Terms-of-Service compliance for {} medium-risk source(s).",
            medium
        ));
    }
    if total > 0 && unknown as f64 / total as f64 > UNKNOWN_REVIEW_THRESHOLD {
        recs.push(format!(
            "Manually review {} unclassified source(s).",
            unknown
        ));
    }
    if total == 0 {
        recs.push("No sources found in manifest; nothing to audit.".to_string());
    }
    if total > 0 && high == 0 && medium == 0 {
        recs.push("No high- or medium-risk sources detected; dataset appears compliant.".to_string());
    }

    recs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(domain: &str, tier: RiskTier, words: u64) -> ClassifiedRow {
        ClassifiedRow {
            url: format!("https://{}/x", domain),
            domain: domain.to_string(),
            content_type: "text/html".to_string(),
            word_count: words,
            risk_level: tier,
            risk_reason: "test".to_string(),
            publisher: (tier != RiskTier::Unknown).then(|| format!("{} pub", domain)),
        }
    }

    #[test]
    fn test_counts_sum_to_total() {
        let rows = vec![
            row("a.com", RiskTier::High, 10),
            row("b.com", RiskTier::Medium, 20),
            row("c.com", RiskTier::Low, 30),
            row("d.com", RiskTier::Unknown, 0),
            row("a.com", RiskTier::High, 5),
        ];
        let summary = summarize(&rows);

        assert_eq!(summary.total_sources, 5);
        assert_eq!(
            summary.high_risk_count
                + summary.medium_risk_count
                + summary.low_risk_count
                + summary.unknown_count,
            summary.total_sources
        );
        assert_eq!(summary.high_risk_count, 2);
    }

    #[test]
    fn test_percentages_one_decimal() {
        let rows = vec![
            row("a.com", RiskTier::High, 0),
            row("b.com", RiskTier::Low, 0),
            row("c.com", RiskTier::Unknown, 0),
        ];
        let summary = summarize(&rows);

        assert_eq!(summary.high_risk_pct, 33.3);
        assert_eq!(summary.medium_risk_pct, 0.0);
        assert_eq!(summary.low_risk_pct, 33.3);
        assert_eq!(summary.unknown_pct, 33.3);
    }

    #[test]
    fn test_empty_manifest() {
        let summary = summarize(&[]);

        assert_eq!(summary.total_sources, 0);
        assert_eq!(summary.high_risk_pct, 0.0);
        assert_eq!(summary.unknown_pct, 0.0);
        assert!(summary.top_risk_domains.is_empty());
        assert_eq!(
            summary.recommendations,
            vec!["No sources found in manifest; nothing to audit.".to_string()]
        );
    }

    #[test]
    fn test_recommendation_rule_order() {
        let rows = vec![
            row("a.com", RiskTier::High, 0),
            row("b.com", RiskTier::Medium, 0),
            row("c.com", RiskTier::Unknown, 0),
            row("d.com", RiskTier::Unknown, 0),
        ];
        let recs = summarize(&rows).recommendations;

        assert_eq!(recs.len(), 3);
        assert!(recs[0].contains("1 high-risk"));
        assert!(recs[1].contains("1 medium-risk"));
        assert!(recs[2].contains("2 unclassified"));
    }

    #[test]
    fn test_unknown_threshold_not_crossed() {
        // 1 unknown out of 10 is exactly 10% — the review rule requires more.
        let mut rows: Vec<ClassifiedRow> =
            (0..9).map(|i| row(&format!("s{}.com", i), RiskTier::Low, 0)).collect();
        rows.push(row("u.com", RiskTier::Unknown, 0));

        let recs = summarize(&rows).recommendations;
        assert!(recs.iter().all(|r| !r.contains("Manually review")));
    }

    #[test]
    fn test_compliant_dataset_recommendation() {
        let rows = vec![row("a.com", RiskTier::Low, 0)];
        let recs = summarize(&rows).recommendations;
        assert_eq!(recs.len(), 1);
        assert!(recs[0].contains("appears compliant"));
    }

    #[test]
    fn test_top_domains_rollup() {
        let rows = vec![
            row("m.com", RiskTier::Medium, 100),
            row("m.com", RiskTier::Medium, 50),
            row("m.com", RiskTier::Medium, 25),
            row("h.com", RiskTier::High, 10),
            row("low.com", RiskTier::Low, 999),
        ];
        let top = summarize(&rows).top_risk_domains;

        // High before medium even with a smaller count; low never appears.
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].domain, "h.com");
        assert_eq!(top[1].domain, "m.com");
        assert_eq!(top[1].count, 3);
        assert_eq!(top[1].total_words, 175);
    }

    #[test]
    fn test_top_domains_capped_and_deterministic() {
        let mut rows = Vec::new();
        for i in 0..15 {
            rows.push(row(&format!("d{:02}.com", i), RiskTier::High, 1));
        }
        let top = summarize(&rows).top_risk_domains;

        assert_eq!(top.len(), 10);
        // Equal counts fall back to domain order.
        assert_eq!(top[0].domain, "d00.com");
        assert_eq!(top[9].domain, "d09.com");
    }
}

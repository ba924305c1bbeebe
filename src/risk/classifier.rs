use crate::domain::extract_domain;
use crate::models::{ClassifiedRow, ManifestRecord, RiskTier};
use crate::risk::db::RiskDb;

/// Reason attached to rows whose URL could not be parsed.
pub const REASON_UNPARSABLE: &str = "unparsable URL";

/// Reason attached to rows whose domain has no database entry.
pub const REASON_NOT_IN_DATABASE: &str = "domain not in risk database";

/// Classify one manifest record against the risk database.
///
/// Pure: no I/O, no side effects. Identical input and database snapshot
/// always produce an identical row. An unparsable URL degrades to the
/// Unknown tier and never aborts the run.
pub fn classify(record: &ManifestRecord, db: &RiskDb) -> ClassifiedRow {
    let domain = match extract_domain(&record.url) {
        Ok(domain) => domain,
        Err(_) => {
            return ClassifiedRow {
                url: record.url.clone(),
                domain: String::new(),
                content_type: record.content_type.clone(),
                word_count: record.word_count,
                risk_level: RiskTier::Unknown,
                risk_reason: REASON_UNPARSABLE.to_string(),
                publisher: None,
            }
        }
    };

    let (risk_level, risk_reason, publisher) = match db.lookup(&domain) {
        Some(entry) => (
            entry.tier,
            entry.reason.clone(),
            Some(entry.publisher.clone()),
        ),
        None => (RiskTier::Unknown, REASON_NOT_IN_DATABASE.to_string(), None),
    };

    ClassifiedRow {
        url: record.url.clone(),
        domain,
        content_type: record.content_type.clone(),
        word_count: record.word_count,
        risk_level,
        risk_reason,
        publisher,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskTier;
    use crate::risk::db::DomainEntry;

    fn test_db() -> RiskDb {
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

    fn record(url: &str) -> ManifestRecord {
        ManifestRecord {
            url: url.to_string(),
            content_type: "text/html".to_string(),
            word_count: 100,
        }
    }

    #[test]
    fn test_exact_entry_fields_carry_over() {
        let row = classify(&record("https://nytimes.com/a"), &test_db());
        assert_eq!(row.domain, "nytimes.com");
        assert_eq!(row.risk_level, RiskTier::High);
        assert_eq!(row.risk_reason, "active litigation");
        assert_eq!(row.publisher.as_deref(), Some("The New York Times"));
    }

    #[test]
    fn test_subdomain_classifies_like_parent() {
        let db = test_db();
        let via_www = classify(&record("https://www.nytimes.com/2024/x"), &db);
        let direct = classify(&record("https://nytimes.com/y"), &db);

        assert_eq!(via_www.domain, "nytimes.com");
        assert_eq!(via_www.risk_level, direct.risk_level);
        assert_eq!(via_www.publisher, direct.publisher);

        let sub = classify(&record("https://en.wikipedia.org/wiki/X"), &db);
        assert_eq!(sub.risk_level, RiskTier::Low);
        assert_eq!(sub.publisher.as_deref(), Some("Wikimedia Foundation"));
    }

    #[test]
    fn test_unknown_domain() {
        let row = classify(&record("https://notreal.xyz/z"), &test_db());
        assert_eq!(row.risk_level, RiskTier::Unknown);
        assert_eq!(row.risk_reason, REASON_NOT_IN_DATABASE);
        assert_eq!(row.publisher, None);
    }

    #[test]
    fn test_unparsable_url_degrades_to_unknown() {
        let row = classify(&record("not a url"), &test_db());
        assert_eq!(row.domain, "");
        assert_eq!(row.risk_level, RiskTier::Unknown);
        assert_eq!(row.risk_reason, REASON_UNPARSABLE);
        assert_eq!(row.publisher, None);
    }

    #[test]
    fn test_deterministic() {
        let db = test_db();
        let rec = record("https://www.nytimes.com/2024/x");
        assert_eq!(classify(&rec, &db), classify(&rec, &db));
    }
}

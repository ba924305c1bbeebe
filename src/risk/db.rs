use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::DatabaseLoadError;
use crate::models::RiskTier;

/// One curated publisher entry. `domain_pattern` is a bare lower-case domain
/// (no scheme, no path); it matches itself and any subdomain of itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEntry {
    pub domain_pattern: String,
    pub publisher: String,
    pub tier: RiskTier,
    pub reason: String,
}

/// Immutable, loaded-once publisher risk database.
///
/// Constructed once at startup and passed by reference into the classifier;
/// because it never mutates after load, concurrent audits share it with no
/// locking.
#[derive(Debug)]
pub struct RiskDb {
    entries: Vec<DomainEntry>,
    exact: HashMap<String, usize>,
}

/// On-disk shape: a TOML document with repeated `[[entries]]` tables.
#[derive(Debug, Deserialize)]
struct RiskDbFile {
    #[serde(default)]
    entries: Vec<RiskDbFileEntry>,
}

#[derive(Debug, Deserialize)]
struct RiskDbFileEntry {
    domain: String,
    publisher: String,
    tier: RiskTier,
    reason: String,
}

impl RiskDb {
    /// Validate and index a set of entries.
    ///
    /// Rejects structurally malformed patterns and duplicates: silently
    /// picking one of two entries for the same pattern would make
    /// classification non-deterministic across reloads.
    pub fn from_entries(entries: Vec<DomainEntry>) -> Result<Self, DatabaseLoadError> {
        let mut normalized = Vec::with_capacity(entries.len());
        let mut exact = HashMap::with_capacity(entries.len());

        for mut entry in entries {
            let pattern = entry.domain_pattern.trim().to_lowercase();
            validate_pattern(&pattern)?;

            if entry.tier == RiskTier::Unknown {
                return Err(DatabaseLoadError::ReservedTier { pattern });
            }

            if exact.contains_key(&pattern) {
                return Err(DatabaseLoadError::DuplicatePattern(pattern));
            }

            entry.domain_pattern = pattern.clone();
            exact.insert(pattern, normalized.len());
            normalized.push(entry);
        }

        Ok(Self {
            entries: normalized,
            exact,
        })
    }

    /// Look up a normalized domain.
    ///
    /// Policy, in priority order:
    /// 1. Exact match against a `domain_pattern`.
    /// 2. Suffix match (`domain` ends with `"." + pattern`); among several,
    ///    the longest pattern wins — the most specific parent.
    /// 3. No match → `None`; the caller classifies the row as Unknown.
    pub fn lookup(&self, domain: &str) -> Option<&DomainEntry> {
        if let Some(&idx) = self.exact.get(domain) {
            return Some(&self.entries[idx]);
        }

        self.entries
            .iter()
            .filter(|e| {
                domain.len() > e.domain_pattern.len()
                    && domain.ends_with(&e.domain_pattern)
                    && domain.as_bytes()[domain.len() - e.domain_pattern.len() - 1] == b'.'
            })
            .max_by_key(|e| e.domain_pattern.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, DatabaseLoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| DatabaseLoadError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let file: RiskDbFile =
            toml::from_str(&content).map_err(|source| DatabaseLoadError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        let entries = file
            .entries
            .into_iter()
            .map(|e| DomainEntry {
                domain_pattern: e.domain,
                publisher: e.publisher,
                tier: e.tier,
                reason: e.reason,
            })
            .collect();

        Self::from_entries(entries)
    }

    /// Load the risk database, searching in order:
    ///
    /// 1. `db_override` — path passed via `--riskdb`
    /// 2. `<base_dir>/.provenance-audit/riskdb.toml`
    /// 3. `~/.config/provenance-audit/riskdb.toml`
    /// 4. The built-in curated table ([`RiskDb::builtin`])
    pub fn load_or_builtin(
        db_override: Option<&Path>,
        base_dir: &Path,
    ) -> Result<Self, DatabaseLoadError> {
        if let Some(path) = db_override {
            return Self::load(path);
        }

        let local = base_dir.join(".provenance-audit").join("riskdb.toml");
        if local.exists() {
            return Self::load(&local);
        }

        if let Some(home) = dirs::home_dir() {
            let home_db = home
                .join(".config")
                .join("provenance-audit")
                .join("riskdb.toml");
            if home_db.exists() {
                return Self::load(&home_db);
            }
        }

        Self::builtin()
    }

    /// Built-in curated table of publishers with known copyright positions,
    /// litigation history, or licensing terms.
    pub fn builtin() -> Result<Self, DatabaseLoadError> {
        let table: &[(&str, &str, RiskTier, &str)] = &[
            // High: active litigation or strict enforcement
            ("nytimes.com", "The New York Times", RiskTier::High,
             "Active copyright litigation against AI developers"),
            ("wsj.com", "Dow Jones & Company", RiskTier::High,
             "Strict paywall and licensing enforcement"),
            ("washingtonpost.com", "The Washington Post", RiskTier::High,
             "Paywalled content; licensing required for reuse"),
            ("bloomberg.com", "Bloomberg L.P.", RiskTier::High,
             "Proprietary financial content; strict enforcement"),
            ("ft.com", "The Financial Times", RiskTier::High,
             "Paywalled content; licensing required for reuse"),
            ("economist.com", "The Economist Group", RiskTier::High,
             "Paywalled content; licensing required for reuse"),
            ("newyorker.com", "Condé Nast", RiskTier::High,
             "Publisher actively enforces copyright against scraping"),
            ("gettyimages.com", "Getty Images", RiskTier::High,
             "Active litigation over media used in model training"),
            ("penguinrandomhouse.com", "Penguin Random House", RiskTier::High,
             "Trade publisher; book content requires licensing"),
            ("harpercollins.com", "HarperCollins", RiskTier::High,
             "Trade publisher; book content requires licensing"),
            ("simonandschuster.com", "Simon & Schuster", RiskTier::High,
             "Trade publisher; book content requires licensing"),
            // Medium: TOS restrictions or attribution requirements
            ("reddit.com", "Reddit, Inc.", RiskTier::Medium,
             "User content licensed for training only via paid API"),
            ("stackoverflow.com", "Stack Exchange, Inc.", RiskTier::Medium,
             "CC BY-SA content; attribution and share-alike required"),
            ("stackexchange.com", "Stack Exchange, Inc.", RiskTier::Medium,
             "CC BY-SA content; attribution and share-alike required"),
            ("quora.com", "Quora, Inc.", RiskTier::Medium,
             "Terms of Service restrict automated collection"),
            ("medium.com", "A Medium Corporation", RiskTier::Medium,
             "Author-owned content; TOS restricts bulk reuse"),
            ("github.com", "GitHub, Inc.", RiskTier::Medium,
             "Mixed repository licenses; per-repository review required"),
            ("nature.com", "Springer Nature", RiskTier::Medium,
             "Subscription journals; open-access subset only"),
            // Low: permissive or public-domain sources
            ("wikipedia.org", "Wikimedia Foundation", RiskTier::Low,
             "CC BY-SA; permissive license with attribution"),
            ("arxiv.org", "arXiv / Cornell University", RiskTier::Low,
             "Open-access preprints; permissive distribution terms"),
            ("gutenberg.org", "Project Gutenberg", RiskTier::Low,
             "Public-domain texts"),
            ("archive.org", "Internet Archive", RiskTier::Low,
             "Public-domain and permissively licensed collections"),
            ("plos.org", "Public Library of Science", RiskTier::Low,
             "CC BY open-access journals"),
        ];

        Self::from_entries(
            table
                .iter()
                .map(|(domain, publisher, tier, reason)| DomainEntry {
                    domain_pattern: (*domain).to_string(),
                    publisher: (*publisher).to_string(),
                    tier: *tier,
                    reason: (*reason).to_string(),
                })
                .collect(),
        )
    }
}

fn validate_pattern(pattern: &str) -> Result<(), DatabaseLoadError> {
    let invalid = |reason: &str| DatabaseLoadError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    };

    if pattern.is_empty() {
        return Err(invalid("empty pattern"));
    }
    if pattern.contains("://") || pattern.contains('/') {
        return Err(invalid("patterns are bare domains, not URLs"));
    }
    if pattern.chars().any(char::is_whitespace) {
        return Err(invalid("contains whitespace"));
    }
    if pattern.starts_with('.') || pattern.ends_with('.') {
        return Err(invalid("leading or trailing dot"));
    }

    Ok(())
}

use thiserror::Error;

/// Structural problem in the manifest itself. Aborts the whole audit before
/// any row is classified; no partial record is stored.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("manifest line {line}: {message}")]
pub struct InputError {
    /// 1-based line number of the offending row (line 1 is the header).
    pub line: usize,
    pub message: String,
}

impl InputError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Integrity failure while loading the risk database. Fatal at startup:
/// a database that silently drops or reorders entries would make
/// classification non-deterministic across reloads.
#[derive(Debug, Error)]
pub enum DatabaseLoadError {
    #[error("duplicate domain pattern in risk database: {0}")]
    DuplicatePattern(String),

    #[error("invalid domain pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("entry {pattern:?} uses tier \"unknown\"; unknown is reserved for unmatched domains")]
    ReservedTier { pattern: String },

    #[error("failed to read risk database from {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse risk database from {path}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Lookup of an `audit_id` that was never stored.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("audit {0} not found")]
pub struct NotFoundError(pub String);

//! Append-only audit persistence.
//!
//! The store is the only shared mutable state in the engine. Records are
//! fully constructed before publication; after insertion they are never
//! mutated, so readers only ever observe complete records.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::error::NotFoundError;
use crate::models::{AuditRecord, AuditSummary, ClassifiedRow};

/// Length of the short hex audit id.
const AUDIT_ID_LEN: usize = 8;

/// Narrow persistence interface so the in-memory implementation can later be
/// swapped for externally backed storage without touching the pipeline.
pub trait AuditStore: Send + Sync {
    /// Allocate a fresh id, timestamp the record, store it and return it.
    fn create(&self, rows: Vec<ClassifiedRow>, summary: AuditSummary) -> AuditRecord;

    /// Retrieve a stored record by id.
    fn get(&self, audit_id: &str) -> Result<AuditRecord, NotFoundError>;
}

/// In-memory audit store guarded by a mutex.
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    audits: Mutex<HashMap<String, AuditRecord>>,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.audits.lock().expect("audit store poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditStore for MemoryAuditStore {
    fn create(&self, rows: Vec<ClassifiedRow>, summary: AuditSummary) -> AuditRecord {
        let mut audits = self.audits.lock().expect("audit store poisoned");

        // Short ids are convenient for filing references; re-roll under the
        // lock on the rare collision so ids stay unique for the store's
        // lifetime.
        let audit_id = loop {
            let candidate = Uuid::new_v4().simple().to_string()[..AUDIT_ID_LEN].to_string();
            if !audits.contains_key(&candidate) {
                break candidate;
            }
        };

        let record = AuditRecord {
            audit_id: audit_id.clone(),
            created_at: Utc::now(),
            rows,
            summary,
        };

        audits.insert(audit_id, record.clone());
        record
    }

    fn get(&self, audit_id: &str) -> Result<AuditRecord, NotFoundError> {
        self.audits
            .lock()
            .expect("audit store poisoned")
            .get(audit_id)
            .cloned()
            .ok_or_else(|| NotFoundError(audit_id.to_string()))
    }
}

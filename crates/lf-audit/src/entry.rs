// entry.rs — Audit entry data model.
//
// One entry per committed status transition: which laudo, who acted, from
// which state to which, and why (for rejections). Entries form a chain via
// `previous_hash`, enabling tamper detection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single audit entry — one line in the JSONL transition log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique identifier for this entry.
    pub entry_id: Uuid,

    /// When the transition committed (UTC).
    pub timestamp: DateTime<Utc>,

    /// The laudo whose status changed.
    pub laudo_id: Uuid,

    /// Who requested the transition.
    pub actor_id: Uuid,

    /// Status before the transition, as its canonical string.
    pub from_status: String,

    /// Status after the transition.
    pub to_status: String,

    /// Rejection reason, when the transition carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// The committed laudo version produced by this transition.
    pub version: u64,

    /// Hash of the previous entry in the log (tamper detection).
    /// The first entry has this set to None.
    pub previous_hash: Option<String>,
}

impl AuditEntry {
    /// Create a new entry with the current timestamp and a random id.
    pub fn new(
        laudo_id: Uuid,
        actor_id: Uuid,
        from_status: impl Into<String>,
        to_status: impl Into<String>,
    ) -> Self {
        Self {
            entry_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            laudo_id,
            actor_id,
            from_status: from_status.into(),
            to_status: to_status.into(),
            reason: None,
            version: 0,
            previous_hash: None,
        }
    }

    /// Attach a rejection reason (builder style).
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Record the committed laudo version.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }
}

// error.rs — The engine's failure taxonomy.
//
// Unauthorized / InvalidTransition / MissingReason come up from the
// validator and are surfaced verbatim — client errors, never retried.
// Conflict is recoverable: the caller reloads and may reissue the same
// intent. NotFound is fatal for that request. The rest is ambient I/O.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use lf_audit::AuditError;
use lf_laudo::{LaudoStatus, TransitionError};
use lf_policy::PrivilegeError;

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Refused by the transition validator or the privilege gate.
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// The write was conditioned on a version that is no longer current.
    /// The engine never auto-retries — the caller must reload and reissue.
    #[error("stale version for laudo {laudo_id}: expected {expected}, found {found}")]
    Conflict {
        laudo_id: Uuid,
        expected: u64,
        found: u64,
    },

    /// The requested laudo does not exist.
    #[error("laudo not found: {0}")]
    NotFound(Uuid),

    /// Tag annotation requested on a laudo that is not finalized.
    #[error("laudo {laudo_id} is {status}, only finalized laudos can be tagged")]
    NotFinalized {
        laudo_id: Uuid,
        status: LaudoStatus,
    },

    /// The username is already taken in the user directory.
    #[error("username already exists: {0}")]
    DuplicateUsername(String),

    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed record on disk.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The audit append failed; the transition was not committed.
    #[error("audit error: {0}")]
    Audit(#[from] AuditError),

    /// Privilege administration failed.
    #[error("privilege error: {0}")]
    Privilege(#[from] PrivilegeError),
}

impl EngineError {
    /// Stable error kind string for the presentation layer's
    /// `{errorKind, message}` surface.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Transition(TransitionError::Unauthorized { .. }) => "unauthorized",
            EngineError::Transition(TransitionError::InvalidTransition { .. }) => {
                "invalid_transition"
            }
            EngineError::Transition(TransitionError::MissingReason) => "missing_reason",
            EngineError::Conflict { .. } => "conflict",
            EngineError::NotFound(_) => "not_found",
            EngineError::NotFinalized { .. } => "not_finalized",
            EngineError::DuplicateUsername(_) => "duplicate_username",
            EngineError::Io { .. } => "io",
            EngineError::Serialization(_) => "serialization",
            EngineError::Audit(_) => "audit",
            EngineError::Privilege(_) => "privilege",
        }
    }
}

// error.rs — Error types for the privilege subsystem.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use lf_laudo::Role;

/// Errors that can occur during privilege administration.
#[derive(Debug, Error)]
pub enum PrivilegeError {
    /// Privileges are only meaningful for technicians; granting one to any
    /// other role is refused outright.
    #[error("privileges can only be granted to tecnicos; user {user_id} has role {role}")]
    NotGrantable { user_id: Uuid, role: Role },

    /// Failed to read or write the privilege file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed privilege data on disk.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// error.rs — Error types for the laudo data model.

use thiserror::Error;

use crate::actor::Role;
use crate::status::LaudoStatus;

/// A stored status string matched neither the canonical nor the legacy
/// vocabulary.
#[derive(Debug, Error)]
#[error("unknown laudo status '{0}'")]
pub struct StatusParseError(pub String);

/// Why a requested transition was refused by the validator.
///
/// `Unauthorized` means the edge exists in the graph but this actor may not
/// take it; `InvalidTransition` means the edge is not in the graph at all.
/// The two are deliberately distinct — callers surface them verbatim and
/// must not retry either.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// The edge is legal but not for this role/privilege combination.
    #[error("role {role} may not transition a laudo from {from} to {to}")]
    Unauthorized {
        role: Role,
        from: LaudoStatus,
        to: LaudoStatus,
    },

    /// The (from, to) pair is not an edge of the workflow graph.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: LaudoStatus, to: LaudoStatus },

    /// Rejection requires a non-empty reason.
    #[error("rejection requires a non-empty reason")]
    MissingReason,
}

// rejection.rs — Rejection and resubmission entry points.
//
// Rejection is the one transition that carries a payload: the reason is
// mandatory, checked before anything else, and stored on the laudo until
// the owner resubmits. Resubmission clears it and counts the retry so the
// rework loop stays visible in reporting.

use uuid::Uuid;

use lf_laudo::{Actor, Laudo, LaudoStatus, TransitionError};

use crate::coordinator::ApprovalCoordinator;
use crate::error::EngineError;

impl ApprovalCoordinator {
    /// Reject a laudo under review.
    ///
    /// A blank (or whitespace-only) reason is refused before the laudo is
    /// even loaded, so `MissingReason` wins over any other failure the
    /// request would hit.
    pub fn reject(
        &mut self,
        laudo_id: Uuid,
        actor: &Actor,
        reason: &str,
    ) -> Result<Laudo, EngineError> {
        if reason.trim().is_empty() {
            return Err(TransitionError::MissingReason.into());
        }
        self.apply(laudo_id, LaudoStatus::Reprovado, actor, Some(reason), None)
    }

    /// Resubmit a rejected laudo for a fresh review cycle.
    ///
    /// Owner-only. Clears the stored rejection reason and increments the
    /// resubmission counter.
    pub fn resubmit(&mut self, laudo_id: Uuid, actor: &Actor) -> Result<Laudo, EngineError> {
        self.apply(laudo_id, LaudoStatus::EmAndamento, actor, None, None)
    }
}

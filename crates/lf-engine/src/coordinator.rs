// coordinator.rs — The approval coordinator: the single writer path.
//
// Every status mutation in the system enters through `apply`:
//
//   load snapshot → privilege gate → transition validation →
//   mutate a copy → stage (version-checked) → audit append → commit
//
// Validation strictly precedes mutation, so a failed request has zero side
// effects and is safe to reissue unchanged. The commit is conditioned on
// the version the caller loaded (optimistic concurrency): approvers act
// over minutes-to-days, and two of them racing on the same laudo must get
// a Conflict, not a silent overwrite. The engine never auto-retries a
// Conflict — that could silently double an approval.

use uuid::Uuid;

use chrono::Utc;

use lf_audit::{AuditEntry, AuditLog};
use lf_laudo::{validate, Actor, Laudo, LaudoStatus, Tag, TransitionError};

use crate::error::EngineError;
use crate::events::{EventDispatcher, NotificationSink, WorkflowEvent};
use crate::store::LaudoStore;

/// Orchestrates authorization, validation, atomic mutation, and audit
/// append for every laudo status change.
pub struct ApprovalCoordinator {
    store: LaudoStore,
    audit: AuditLog,
    dispatcher: EventDispatcher,
}

impl ApprovalCoordinator {
    pub fn new(store: LaudoStore, audit: AuditLog) -> Self {
        Self {
            store,
            audit,
            dispatcher: EventDispatcher::new(),
        }
    }

    /// Subscribe a notification sink to workflow events.
    pub fn add_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.dispatcher.add_sink(sink);
    }

    /// Read access to the underlying store, for query projection.
    pub fn store(&self) -> &LaudoStore {
        &self.store
    }

    /// Path of the audit log this coordinator appends to.
    pub fn audit_path(&self) -> &std::path::Path {
        self.audit.path()
    }

    /// Create a new draft laudo owned by the acting technician.
    pub fn create(
        &mut self,
        actor: &Actor,
        cliente: impl Into<String>,
        equipamento: impl Into<String>,
        diagnostico: impl Into<String>,
        solucao: impl Into<String>,
    ) -> Result<Laudo, EngineError> {
        let laudo = Laudo::new(actor.id, cliente, equipamento, diagnostico, solucao);
        self.store.insert(&laudo)?;
        tracing::info!(laudo_id = %laudo.id, created_by = %actor.username, "laudo created");
        self.dispatcher
            .dispatch(&WorkflowEvent::laudo_created(laudo.id, actor.id));
        Ok(laudo)
    }

    /// Apply a status transition.
    ///
    /// `expected_version` is the version the caller last saw; pass `None`
    /// to condition the write on the freshly loaded snapshot instead. A
    /// stale version yields `Conflict` and the caller must reload.
    pub fn apply(
        &mut self,
        laudo_id: Uuid,
        requested: LaudoStatus,
        actor: &Actor,
        reason: Option<&str>,
        expected_version: Option<u64>,
    ) -> Result<Laudo, EngineError> {
        let current = self.store.load(laudo_id)?;

        let snapshot_version = match expected_version {
            Some(v) if v != current.version => {
                return Err(EngineError::Conflict {
                    laudo_id,
                    expected: v,
                    found: current.version,
                });
            }
            Some(v) => v,
            None => current.version,
        };

        // Privilege/ownership gate, then the pure edge/role validator.
        if !lf_policy::authorize(actor, requested, &current) {
            return Err(TransitionError::Unauthorized {
                role: actor.role,
                from: current.status,
                to: requested,
            }
            .into());
        }
        validate(
            current.status,
            requested,
            actor.role,
            &actor.privileges,
            current.is_owner(actor.id),
            reason,
        )?;

        let from = current.status;
        let mut updated = current;
        updated.status = requested;
        match (from, requested) {
            // Resubmission clears the stored reason and counts the retry.
            (LaudoStatus::Reprovado, LaudoStatus::EmAndamento) => {
                updated.rejection_reason = None;
                updated.resubmission_count += 1;
            }
            (_, LaudoStatus::Reprovado) => {
                updated.rejection_reason = reason.map(|r| r.trim().to_string());
            }
            _ => {}
        }
        updated.version = snapshot_version + 1;
        updated.updated_at = Utc::now();

        // Stage, append, commit — in that order. If the audit append fails
        // the staged write is dropped and the store is untouched.
        let staged = self.store.stage(&updated, snapshot_version)?;
        let mut entry = AuditEntry::new(laudo_id, actor.id, from.to_string(), requested.to_string())
            .with_version(updated.version);
        if requested == LaudoStatus::Reprovado {
            if let Some(r) = reason {
                entry = entry.with_reason(r.trim());
            }
        }
        self.audit.append(&mut entry)?;
        staged.commit()?;

        tracing::info!(
            %laudo_id,
            actor = %actor.username,
            from = %from,
            to = %requested,
            version = updated.version,
            "transition committed"
        );
        self.dispatcher.dispatch(&transition_event(&updated, actor.id, from));

        Ok(updated)
    }

    /// Re-save draft fields without advancing the workflow.
    ///
    /// Runs through the same validate/stage/commit path as any other
    /// transition, using the idempotent owner edge.
    pub fn save_draft(
        &mut self,
        laudo_id: Uuid,
        actor: &Actor,
        diagnostico: Option<&str>,
        solucao: Option<&str>,
    ) -> Result<Laudo, EngineError> {
        let current = self.store.load(laudo_id)?;
        validate(
            current.status,
            LaudoStatus::EmAndamento,
            actor.role,
            &actor.privileges,
            current.is_owner(actor.id),
            None,
        )?;

        let snapshot_version = current.version;
        let from = current.status;
        let mut updated = current;
        if let Some(d) = diagnostico {
            updated.diagnostico = d.to_string();
        }
        if let Some(s) = solucao {
            updated.solucao = s.to_string();
        }
        updated.version = snapshot_version + 1;
        updated.updated_at = Utc::now();

        let staged = self.store.stage(&updated, snapshot_version)?;
        let mut entry = AuditEntry::new(
            laudo_id,
            actor.id,
            from.to_string(),
            LaudoStatus::EmAndamento.to_string(),
        )
        .with_version(updated.version);
        self.audit.append(&mut entry)?;
        staged.commit()?;

        tracing::info!(%laudo_id, actor = %actor.username, "draft re-saved");
        Ok(updated)
    }

    /// Tag a finalized laudo.
    ///
    /// Annotation is the only mutation allowed past finalization; it never
    /// touches `status` and leaves no transition in the audit log.
    pub fn annotate(
        &mut self,
        laudo_id: Uuid,
        actor: &Actor,
        tag: impl Into<String>,
        description: Option<String>,
    ) -> Result<Laudo, EngineError> {
        let current = self.store.load(laudo_id)?;
        if current.status != LaudoStatus::Finalizado {
            return Err(EngineError::NotFinalized {
                laudo_id,
                status: current.status,
            });
        }

        let snapshot_version = current.version;
        let mut updated = current;
        updated.tag = Some(Tag {
            tag: tag.into(),
            description,
            updated_at: Utc::now(),
            updated_by: actor.username.clone(),
        });
        updated.version = snapshot_version + 1;
        updated.updated_at = Utc::now();

        self.store.stage(&updated, snapshot_version)?.commit()?;
        tracing::info!(%laudo_id, actor = %actor.username, "laudo tagged");
        Ok(updated)
    }

    /// The audited transition history of one laudo, oldest first.
    pub fn history(&self, laudo_id: Uuid) -> Result<Vec<AuditEntry>, EngineError> {
        Ok(AuditLog::read_for_laudo(self.audit.path(), laudo_id)?)
    }
}

/// Pick the event variant for a committed transition.
fn transition_event(laudo: &Laudo, actor_id: Uuid, from: LaudoStatus) -> WorkflowEvent {
    match (from, laudo.status) {
        (LaudoStatus::Reprovado, LaudoStatus::EmAndamento) => WorkflowEvent::LaudoResubmitted {
            laudo_id: laudo.id,
            actor_id,
            resubmission_count: laudo.resubmission_count,
            timestamp: Utc::now(),
        },
        (_, LaudoStatus::Reprovado) => WorkflowEvent::LaudoRejected {
            laudo_id: laudo.id,
            actor_id,
            reason: laudo.rejection_reason.clone().unwrap_or_default(),
            timestamp: Utc::now(),
        },
        (_, LaudoStatus::Finalizado) => WorkflowEvent::LaudoFinalized {
            laudo_id: laudo.id,
            actor_id,
            timestamp: Utc::now(),
        },
        (from, to) => WorkflowEvent::status_changed(laudo.id, actor_id, from, to, laudo.version),
    }
}

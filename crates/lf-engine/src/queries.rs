// queries.rs — Read-side projections over the laudo store.
//
// Queries never mutate. Each snapshot carries the version the caller should
// pass back with a subsequent transition; serving slightly stale data is
// fine because the version check catches any write that raced the read.

use serde::Serialize;

use lf_laudo::{Actor, Laudo, LaudoStatus, Privilege, Role};

use crate::error::EngineError;
use crate::store::LaudoStore;

/// Read-only query facade over a [`LaudoStore`].
pub struct QueryProjector<'a> {
    store: &'a LaudoStore,
}

/// Per-status counts for dashboards.
#[derive(Debug, Default, Serialize)]
pub struct WorkflowStats {
    pub em_andamento: usize,
    pub aprovado_manutencao: usize,
    pub aprovado_vendas: usize,
    pub finalizado: usize,
    pub reprovado: usize,
    pub total: usize,
    /// Total rework cycles across all laudos.
    pub resubmissions: u64,
}

impl<'a> QueryProjector<'a> {
    pub fn new(store: &'a LaudoStore) -> Self {
        Self { store }
    }

    /// Everything the actor is allowed to see, newest first.
    ///
    /// Técnicos see only their own laudos; vendedores see laudos that have
    /// reached the sales stage; encarregados and admins see everything.
    pub fn visible_to(&self, actor: &Actor) -> Result<Vec<Laudo>, EngineError> {
        let mut laudos = self.store.list()?;
        laudos.retain(|l| l.visible_to(actor));
        Ok(laudos)
    }

    /// The actor's work queue: laudos currently waiting on a decision this
    /// actor's role is responsible for.
    pub fn pending_for(&self, actor: &Actor) -> Result<Vec<Laudo>, EngineError> {
        let mut laudos = self.store.list()?;
        match actor.role {
            Role::Encarregado | Role::Admin => {
                laudos.retain(|l| l.status == LaudoStatus::EmAndamento);
            }
            Role::Vendedor => {
                laudos.retain(|l| l.status == LaudoStatus::AprovadoManutencao);
            }
            Role::Tecnico => {
                // A técnico only has a queue while holding the finalize
                // privilege, and only over their own laudos.
                if actor.has_privilege(Privilege::FinalizeLaudos) {
                    laudos.retain(|l| {
                        l.status == LaudoStatus::AprovadoVendas && l.is_owner(actor.id)
                    });
                } else {
                    laudos.clear();
                }
            }
        }
        Ok(laudos)
    }

    /// Laudos past the first approval gate, filtered by visibility.
    pub fn approved_for(&self, actor: &Actor) -> Result<Vec<Laudo>, EngineError> {
        let mut laudos = self.visible_to(actor)?;
        laudos.retain(|l| {
            matches!(
                l.status,
                LaudoStatus::AprovadoManutencao
                    | LaudoStatus::AprovadoVendas
                    | LaudoStatus::Finalizado
            )
        });
        Ok(laudos)
    }

    /// Fully-approved laudos the actor could finalize right now.
    ///
    /// Runs the same finalization gate the coordinator applies: encarregado
    /// and admin always qualify, a tecnico only for their own laudos while
    /// holding `finalize_laudos`, everyone else gets an empty queue.
    pub fn finalizable_for(&self, actor: &Actor) -> Result<Vec<Laudo>, EngineError> {
        let mut laudos = self.store.list()?;
        laudos.retain(|l| {
            l.status == LaudoStatus::AprovadoVendas
                && lf_laudo::validate(
                    l.status,
                    LaudoStatus::Finalizado,
                    actor.role,
                    &actor.privileges,
                    l.is_owner(actor.id),
                    None,
                )
                .is_ok()
        });
        Ok(laudos)
    }

    /// All finalized laudos (the export surface).
    pub fn finalized(&self) -> Result<Vec<Laudo>, EngineError> {
        let mut laudos = self.store.list()?;
        laudos.retain(|l| l.status == LaudoStatus::Finalizado);
        Ok(laudos)
    }

    /// Rejected laudos owned by the actor, awaiting rework.
    pub fn rejected_for(&self, actor: &Actor) -> Result<Vec<Laudo>, EngineError> {
        let mut laudos = self.store.list()?;
        laudos.retain(|l| l.status == LaudoStatus::Reprovado && l.is_owner(actor.id));
        Ok(laudos)
    }

    /// Recently tagged laudos, most recent tag first.
    pub fn recent_tags(&self, limit: usize) -> Result<Vec<Laudo>, EngineError> {
        let mut laudos = self.store.list()?;
        laudos.retain(|l| l.tag.is_some());
        laudos.sort_by(|a, b| {
            let a_at = a.tag.as_ref().map(|t| t.updated_at);
            let b_at = b.tag.as_ref().map(|t| t.updated_at);
            b_at.cmp(&a_at)
        });
        laudos.truncate(limit);
        Ok(laudos)
    }

    /// Per-status counts over the whole store.
    pub fn stats(&self) -> Result<WorkflowStats, EngineError> {
        let mut stats = WorkflowStats::default();
        for laudo in self.store.list()? {
            match laudo.status {
                LaudoStatus::EmAndamento => stats.em_andamento += 1,
                LaudoStatus::AprovadoManutencao => stats.aprovado_manutencao += 1,
                LaudoStatus::AprovadoVendas => stats.aprovado_vendas += 1,
                LaudoStatus::Finalizado => stats.finalizado += 1,
                LaudoStatus::Reprovado => stats.reprovado += 1,
            }
            stats.total += 1;
            stats.resubmissions += u64::from(laudo.resubmission_count);
        }
        Ok(stats)
    }
}

// resolver.rs — Authorization checks beyond the transition graph.
//
// The transition validator answers "is this edge legal for this role?";
// the resolver answers the two questions that depend on delegated
// privileges and ownership rather than on the graph:
//
//   1. May this actor request this target state on this laudo at all?
//   2. May this actor read the laudo for export (PDF)?
//
// Both are pure and fail-closed.

use lf_laudo::{Actor, Laudo, LaudoStatus, Privilege, Role};

/// Privilege/ownership gate, consulted before transition validation.
///
/// The only request that needs more than a base role is a technician asking
/// for `finalizado`: that requires an active `finalize_laudos` privilege AND
/// ownership of the laudo. Everything else is decided by the validator's
/// role gates.
pub fn authorize(actor: &Actor, requested: LaudoStatus, laudo: &Laudo) -> bool {
    if actor.role == Role::Tecnico && requested == LaudoStatus::Finalizado {
        return actor.has_privilege(Privilege::FinalizeLaudos) && laudo.is_owner(actor.id);
    }
    true
}

/// Export/PDF visibility rule.
///
/// A laudo may be read by the export layer only once finalized, or by an
/// admin at any stage. Rendering happens externally; the rule lives here.
pub fn can_export(actor: &Actor, laudo: &Laudo) -> bool {
    laudo.status == LaudoStatus::Finalizado || actor.role == Role::Admin
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn laudo_owned_by(owner: Uuid) -> Laudo {
        Laudo::new(owner, "Cliente", "Bateria 24V", "diag", "sol")
    }

    #[test]
    fn privileged_owner_tecnico_may_request_finalization() {
        let owner = Uuid::new_v4();
        let laudo = laudo_owned_by(owner);
        let actor = Actor::new(owner, "t1", Role::Tecnico)
            .with_privileges(vec![Privilege::FinalizeLaudos]);
        assert!(authorize(&actor, LaudoStatus::Finalizado, &laudo));
    }

    #[test]
    fn unprivileged_tecnico_may_not_request_finalization() {
        let owner = Uuid::new_v4();
        let laudo = laudo_owned_by(owner);
        let actor = Actor::new(owner, "t1", Role::Tecnico);
        assert!(!authorize(&actor, LaudoStatus::Finalizado, &laudo));
    }

    #[test]
    fn privileged_tecnico_may_not_finalize_someone_elses_laudo() {
        let laudo = laudo_owned_by(Uuid::new_v4());
        let actor = Actor::new(Uuid::new_v4(), "t2", Role::Tecnico)
            .with_privileges(vec![Privilege::FinalizeLaudos]);
        assert!(!authorize(&actor, LaudoStatus::Finalizado, &laudo));
    }

    #[test]
    fn non_finalization_requests_pass_through() {
        let laudo = laudo_owned_by(Uuid::new_v4());
        let tecnico = Actor::new(Uuid::new_v4(), "t1", Role::Tecnico);
        // The validator will still refuse this; the resolver has no say.
        assert!(authorize(&tecnico, LaudoStatus::AprovadoManutencao, &laudo));

        let encarregado = Actor::new(Uuid::new_v4(), "chefe", Role::Encarregado);
        assert!(authorize(&encarregado, LaudoStatus::Finalizado, &laudo));
    }

    #[test]
    fn export_requires_finalization_or_admin() {
        let mut laudo = laudo_owned_by(Uuid::new_v4());
        let tecnico = Actor::new(laudo.created_by, "t1", Role::Tecnico);
        let admin = Actor::new(Uuid::new_v4(), "root", Role::Admin);

        assert!(!can_export(&tecnico, &laudo));
        assert!(can_export(&admin, &laudo));

        laudo.status = LaudoStatus::Finalizado;
        assert!(can_export(&tecnico, &laudo));
    }
}

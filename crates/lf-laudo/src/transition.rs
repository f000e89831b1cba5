// transition.rs — The pure transition validator.
//
// validate() is the single answer to "is (current → requested) legal for
// this actor?". It has no side effects and touches no storage; the approval
// coordinator calls it once per mutation, after authorization and before
// any write.
//
// The full edge set:
//
//   em_andamento        → aprovado_manutencao   encarregado | admin
//   em_andamento        → reprovado             encarregado | admin, reason
//   aprovado_manutencao → aprovado_vendas       vendedor | admin
//   aprovado_manutencao → reprovado             vendedor | admin, reason
//   aprovado_vendas     → finalizado            encarregado | admin |
//                                               (tecnico ∧ owner ∧ finalize_laudos)
//   em_andamento        → em_andamento          owner (draft re-save)
//   reprovado           → em_andamento          owner (resubmission)
//
// Anything else is InvalidTransition. A legal edge gated by the wrong role
// is Unauthorized, not InvalidTransition.

use crate::actor::{Privilege, Role};
use crate::error::TransitionError;
use crate::status::LaudoStatus;

/// Check whether `requested` is a legal next state for this actor.
///
/// `reason` is only consulted on rejection edges, where it must be
/// non-empty after trimming.
pub fn validate(
    current: LaudoStatus,
    requested: LaudoStatus,
    role: Role,
    privileges: &[Privilege],
    is_owner: bool,
    reason: Option<&str>,
) -> Result<(), TransitionError> {
    use LaudoStatus::*;

    let unauthorized = || TransitionError::Unauthorized {
        role,
        from: current,
        to: requested,
    };

    match (current, requested) {
        // Supervisor approves the maintenance stage.
        (EmAndamento, AprovadoManutencao) => match role {
            Role::Encarregado | Role::Admin => Ok(()),
            _ => Err(unauthorized()),
        },

        // Supervisor rejects a draft.
        (EmAndamento, Reprovado) => match role {
            Role::Encarregado | Role::Admin => require_reason(reason),
            _ => Err(unauthorized()),
        },

        // Sales approves the commercial stage.
        (AprovadoManutencao, AprovadoVendas) => match role {
            Role::Vendedor | Role::Admin => Ok(()),
            _ => Err(unauthorized()),
        },

        // Sales rejects at the commercial stage.
        (AprovadoManutencao, Reprovado) => match role {
            Role::Vendedor | Role::Admin => require_reason(reason),
            _ => Err(unauthorized()),
        },

        // Finalization: supervisor/admin, or the owning technician holding
        // the delegated finalize_laudos privilege.
        (AprovadoVendas, Finalizado) => match role {
            Role::Encarregado | Role::Admin => Ok(()),
            Role::Tecnico if is_owner && privileges.contains(&Privilege::FinalizeLaudos) => Ok(()),
            _ => Err(unauthorized()),
        },

        // Draft re-save: idempotent, owner only.
        (EmAndamento, EmAndamento) => {
            if is_owner {
                Ok(())
            } else {
                Err(unauthorized())
            }
        }

        // Resubmission: the single sanctioned exit from a terminal state.
        (Reprovado, EmAndamento) => {
            if is_owner {
                Ok(())
            } else {
                Err(unauthorized())
            }
        }

        // Not an edge of the graph.
        (from, to) => Err(TransitionError::InvalidTransition { from, to }),
    }
}

fn require_reason(reason: Option<&str>) -> Result<(), TransitionError> {
    match reason {
        Some(r) if !r.trim().is_empty() => Ok(()),
        _ => Err(TransitionError::MissingReason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_PRIVS: &[Privilege] = &[];
    const FINALIZE: &[Privilege] = &[Privilege::FinalizeLaudos];

    #[test]
    fn encarregado_approves_maintenance_stage() {
        assert!(validate(
            LaudoStatus::EmAndamento,
            LaudoStatus::AprovadoManutencao,
            Role::Encarregado,
            NO_PRIVS,
            false,
            None,
        )
        .is_ok());
    }

    #[test]
    fn admin_passes_every_approval_gate() {
        assert!(validate(
            LaudoStatus::EmAndamento,
            LaudoStatus::AprovadoManutencao,
            Role::Admin,
            NO_PRIVS,
            false,
            None,
        )
        .is_ok());
        assert!(validate(
            LaudoStatus::AprovadoManutencao,
            LaudoStatus::AprovadoVendas,
            Role::Admin,
            NO_PRIVS,
            false,
            None,
        )
        .is_ok());
        assert!(validate(
            LaudoStatus::AprovadoVendas,
            LaudoStatus::Finalizado,
            Role::Admin,
            NO_PRIVS,
            false,
            None,
        )
        .is_ok());
    }

    #[test]
    fn tecnico_cannot_approve_maintenance_stage() {
        let result = validate(
            LaudoStatus::EmAndamento,
            LaudoStatus::AprovadoManutencao,
            Role::Tecnico,
            NO_PRIVS,
            true,
            None,
        );
        assert!(matches!(result, Err(TransitionError::Unauthorized { .. })));
    }

    #[test]
    fn vendedor_approves_sales_stage_only() {
        assert!(validate(
            LaudoStatus::AprovadoManutencao,
            LaudoStatus::AprovadoVendas,
            Role::Vendedor,
            NO_PRIVS,
            false,
            None,
        )
        .is_ok());

        // Vendedor at the maintenance gate is a role mismatch on a legal edge.
        let result = validate(
            LaudoStatus::EmAndamento,
            LaudoStatus::AprovadoManutencao,
            Role::Vendedor,
            NO_PRIVS,
            false,
            None,
        );
        assert!(matches!(result, Err(TransitionError::Unauthorized { .. })));
    }

    #[test]
    fn rejection_requires_a_reason() {
        let result = validate(
            LaudoStatus::EmAndamento,
            LaudoStatus::Reprovado,
            Role::Encarregado,
            NO_PRIVS,
            false,
            None,
        );
        assert_eq!(result, Err(TransitionError::MissingReason));

        let result = validate(
            LaudoStatus::AprovadoManutencao,
            LaudoStatus::Reprovado,
            Role::Vendedor,
            NO_PRIVS,
            false,
            Some("   "),
        );
        assert_eq!(result, Err(TransitionError::MissingReason));

        assert!(validate(
            LaudoStatus::EmAndamento,
            LaudoStatus::Reprovado,
            Role::Encarregado,
            NO_PRIVS,
            false,
            Some("bateria não testada"),
        )
        .is_ok());
    }

    #[test]
    fn encarregado_finalizes() {
        assert!(validate(
            LaudoStatus::AprovadoVendas,
            LaudoStatus::Finalizado,
            Role::Encarregado,
            NO_PRIVS,
            false,
            None,
        )
        .is_ok());
    }

    #[test]
    fn privileged_owner_tecnico_finalizes() {
        assert!(validate(
            LaudoStatus::AprovadoVendas,
            LaudoStatus::Finalizado,
            Role::Tecnico,
            FINALIZE,
            true,
            None,
        )
        .is_ok());
    }

    #[test]
    fn unprivileged_owner_tecnico_cannot_finalize() {
        let result = validate(
            LaudoStatus::AprovadoVendas,
            LaudoStatus::Finalizado,
            Role::Tecnico,
            NO_PRIVS,
            true,
            None,
        );
        assert!(matches!(result, Err(TransitionError::Unauthorized { .. })));
    }

    #[test]
    fn privileged_non_owner_tecnico_cannot_finalize() {
        let result = validate(
            LaudoStatus::AprovadoVendas,
            LaudoStatus::Finalizado,
            Role::Tecnico,
            FINALIZE,
            false,
            None,
        );
        assert!(matches!(result, Err(TransitionError::Unauthorized { .. })));
    }

    #[test]
    fn vendedor_cannot_finalize() {
        let result = validate(
            LaudoStatus::AprovadoVendas,
            LaudoStatus::Finalizado,
            Role::Vendedor,
            NO_PRIVS,
            false,
            None,
        );
        assert!(matches!(result, Err(TransitionError::Unauthorized { .. })));
    }

    #[test]
    fn owner_draft_resave_is_idempotent() {
        assert!(validate(
            LaudoStatus::EmAndamento,
            LaudoStatus::EmAndamento,
            Role::Tecnico,
            NO_PRIVS,
            true,
            None,
        )
        .is_ok());

        let result = validate(
            LaudoStatus::EmAndamento,
            LaudoStatus::EmAndamento,
            Role::Tecnico,
            NO_PRIVS,
            false,
            None,
        );
        assert!(matches!(result, Err(TransitionError::Unauthorized { .. })));
    }

    #[test]
    fn owner_resubmits_after_rejection() {
        assert!(validate(
            LaudoStatus::Reprovado,
            LaudoStatus::EmAndamento,
            Role::Tecnico,
            NO_PRIVS,
            true,
            None,
        )
        .is_ok());

        let result = validate(
            LaudoStatus::Reprovado,
            LaudoStatus::EmAndamento,
            Role::Encarregado,
            NO_PRIVS,
            false,
            None,
        );
        assert!(matches!(result, Err(TransitionError::Unauthorized { .. })));
    }

    #[test]
    fn skipping_the_sales_stage_is_invalid() {
        let result = validate(
            LaudoStatus::EmAndamento,
            LaudoStatus::Finalizado,
            Role::Admin,
            NO_PRIVS,
            false,
            None,
        );
        assert!(matches!(
            result,
            Err(TransitionError::InvalidTransition { .. })
        ));

        let result = validate(
            LaudoStatus::AprovadoManutencao,
            LaudoStatus::Finalizado,
            Role::Admin,
            NO_PRIVS,
            false,
            None,
        );
        assert!(matches!(
            result,
            Err(TransitionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn finalizado_has_no_exit() {
        for to in LaudoStatus::ALL {
            let result = validate(
                LaudoStatus::Finalizado,
                to,
                Role::Admin,
                FINALIZE,
                true,
                Some("reason"),
            );
            assert!(
                matches!(result, Err(TransitionError::InvalidTransition { .. })),
                "finalizado -> {} should be invalid",
                to
            );
        }
    }

    #[test]
    fn reprovado_only_exits_to_em_andamento() {
        for to in LaudoStatus::ALL {
            if to == LaudoStatus::EmAndamento {
                continue;
            }
            let result = validate(
                LaudoStatus::Reprovado,
                to,
                Role::Admin,
                FINALIZE,
                true,
                Some("reason"),
            );
            assert!(
                matches!(result, Err(TransitionError::InvalidTransition { .. })),
                "reprovado -> {} should be invalid",
                to
            );
        }
    }

    #[test]
    fn every_unlisted_pair_is_refused() {
        // Exhaustive sweep: anything the rules above do not accept must come
        // back as InvalidTransition or Unauthorized for every role.
        let roles = [Role::Tecnico, Role::Encarregado, Role::Vendedor, Role::Admin];
        for from in LaudoStatus::ALL {
            for to in LaudoStatus::ALL {
                for role in roles {
                    let result = validate(from, to, role, NO_PRIVS, false, Some("motivo"));
                    if result.is_ok() {
                        // The accepted set, with no ownership and no privileges.
                        let legal = matches!(
                            (from, to, role),
                            (
                                LaudoStatus::EmAndamento,
                                LaudoStatus::AprovadoManutencao,
                                Role::Encarregado | Role::Admin
                            ) | (
                                LaudoStatus::EmAndamento,
                                LaudoStatus::Reprovado,
                                Role::Encarregado | Role::Admin
                            ) | (
                                LaudoStatus::AprovadoManutencao,
                                LaudoStatus::AprovadoVendas,
                                Role::Vendedor | Role::Admin
                            ) | (
                                LaudoStatus::AprovadoManutencao,
                                LaudoStatus::Reprovado,
                                Role::Vendedor | Role::Admin
                            ) | (
                                LaudoStatus::AprovadoVendas,
                                LaudoStatus::Finalizado,
                                Role::Encarregado | Role::Admin
                            )
                        );
                        assert!(legal, "unexpected Ok for {} -> {} as {}", from, to, role);
                    }
                }
            }
        }
    }
}

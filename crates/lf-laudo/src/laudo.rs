// laudo.rs — The laudo record: a technical inspection report on a battery.
//
// A laudo is owned by the creating technician and carries a monotonically
// increasing version used for optimistic concurrency at commit time.
// Its `status` field is mutated exclusively through the workflow engine;
// every other collaborator is a read-only consumer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::actor::Actor;
use crate::status::LaudoStatus;

/// Non-workflow annotation attached to a finalized laudo.
///
/// Tags never touch `status` and are the only mutation permitted once a
/// laudo is `finalizado`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub tag: String,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
    /// Username of whoever set the tag.
    pub updated_by: String,
}

/// A technical inspection report routed through the approval pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laudo {
    pub id: Uuid,

    /// The client the inspected equipment belongs to.
    pub cliente: String,

    /// The inspected equipment (battery) reference.
    pub equipamento: String,

    /// The technician who created this laudo.
    pub created_by: Uuid,

    /// Current workflow state. Written only by the approval coordinator.
    /// Accepts legacy vocabulary strings on load via the mapping table.
    #[serde(deserialize_with = "crate::status::deserialize_stored")]
    pub status: LaudoStatus,

    pub diagnostico: String,
    pub solucao: String,

    /// Set when rejected; cleared again on resubmission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,

    /// How many times the owner has resubmitted after a rejection.
    #[serde(default)]
    pub resubmission_count: u32,

    /// Post-finalization annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Tag>,

    /// Optimistic concurrency token. Incremented on every committed write.
    pub version: u64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Laudo {
    /// Create a new draft laudo in `em_andamento`, version 1.
    pub fn new(
        created_by: Uuid,
        cliente: impl Into<String>,
        equipamento: impl Into<String>,
        diagnostico: impl Into<String>,
        solucao: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            cliente: cliente.into(),
            equipamento: equipamento.into(),
            created_by,
            status: LaudoStatus::EmAndamento,
            diagnostico: diagnostico.into(),
            solucao: solucao.into(),
            rejection_reason: None,
            resubmission_count: 0,
            tag: None,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owner(&self, actor_id: Uuid) -> bool {
        self.created_by == actor_id
    }

    /// Ownership/role visibility rule.
    ///
    /// A technician sees only laudos they created. Admin and encarregado see
    /// everything. Vendedor sees laudos at or past the sales stage.
    pub fn visible_to(&self, actor: &Actor) -> bool {
        if actor.role.sees_all_laudos() {
            return true;
        }
        match actor.role {
            crate::actor::Role::Vendedor => matches!(
                self.status,
                LaudoStatus::AprovadoManutencao
                    | LaudoStatus::AprovadoVendas
                    | LaudoStatus::Finalizado
            ),
            _ => self.is_owner(actor.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{Actor, Role};

    fn test_laudo(created_by: Uuid) -> Laudo {
        Laudo::new(
            created_by,
            "Transportes Ipiranga",
            "Bateria tracionária 80V",
            "Células 12-14 sulfatadas",
            "Substituição das células e equalização",
        )
    }

    #[test]
    fn new_laudo_starts_as_draft_at_version_one() {
        let laudo = test_laudo(Uuid::new_v4());
        assert_eq!(laudo.status, LaudoStatus::EmAndamento);
        assert_eq!(laudo.version, 1);
        assert_eq!(laudo.resubmission_count, 0);
        assert!(laudo.rejection_reason.is_none());
        assert!(laudo.tag.is_none());
    }

    #[test]
    fn owner_check() {
        let owner = Uuid::new_v4();
        let laudo = test_laudo(owner);
        assert!(laudo.is_owner(owner));
        assert!(!laudo.is_owner(Uuid::new_v4()));
    }

    #[test]
    fn technician_sees_only_own_laudos() {
        let owner = Uuid::new_v4();
        let laudo = test_laudo(owner);

        let creator = Actor::new(owner, "t1", Role::Tecnico);
        let other = Actor::new(Uuid::new_v4(), "t2", Role::Tecnico);
        assert!(laudo.visible_to(&creator));
        assert!(!laudo.visible_to(&other));
    }

    #[test]
    fn admin_and_encarregado_see_everything() {
        let laudo = test_laudo(Uuid::new_v4());
        let admin = Actor::new(Uuid::new_v4(), "root", Role::Admin);
        let supervisor = Actor::new(Uuid::new_v4(), "chefe", Role::Encarregado);
        assert!(laudo.visible_to(&admin));
        assert!(laudo.visible_to(&supervisor));
    }

    #[test]
    fn vendedor_sees_only_sales_stage_and_beyond() {
        let mut laudo = test_laudo(Uuid::new_v4());
        let vendedor = Actor::new(Uuid::new_v4(), "vend", Role::Vendedor);

        assert!(!laudo.visible_to(&vendedor));
        laudo.status = LaudoStatus::AprovadoManutencao;
        assert!(laudo.visible_to(&vendedor));
        laudo.status = LaudoStatus::Finalizado;
        assert!(laudo.visible_to(&vendedor));
        laudo.status = LaudoStatus::Reprovado;
        assert!(!laudo.visible_to(&vendedor));
    }

    #[test]
    fn serialization_round_trip() {
        let laudo = test_laudo(Uuid::new_v4());
        let json = serde_json::to_string_pretty(&laudo).unwrap();
        let restored: Laudo = serde_json::from_str(&json).unwrap();
        assert_eq!(laudo.id, restored.id);
        assert_eq!(laudo.status, restored.status);
        assert_eq!(laudo.version, restored.version);
    }

    #[test]
    fn optional_fields_omitted_from_json() {
        let laudo = test_laudo(Uuid::new_v4());
        let json = serde_json::to_string(&laudo).unwrap();
        assert!(!json.contains("rejection_reason"));
        assert!(!json.contains("\"tag\""));
    }

    #[test]
    fn deserializes_legacy_status_strings() {
        let mut value = serde_json::to_value(test_laudo(Uuid::new_v4())).unwrap();
        value["status"] = serde_json::json!("aguardando_orcamento");
        let restored: Laudo = serde_json::from_value(value).unwrap();
        assert_eq!(restored.status, LaudoStatus::AprovadoManutencao);
    }

    #[test]
    fn deserializes_pre_counter_records() {
        // Stored laudos from before the resubmission counter existed.
        let mut value = serde_json::to_value(test_laudo(Uuid::new_v4())).unwrap();
        value.as_object_mut().unwrap().remove("resubmission_count");
        let restored: Laudo = serde_json::from_value(value).unwrap();
        assert_eq!(restored.resubmission_count, 0);
    }
}

// status.rs — The canonical laudo status registry.
//
// A laudo moves through a fixed pipeline:
//
//   em_andamento --(encarregado approve)--> aprovado_manutencao
//     --(vendedor approve)--> aprovado_vendas
//     --(encarregado | privileged-owner tecnico finalize)--> finalizado
//
//   em_andamento / aprovado_manutencao --(reject, reason)--> reprovado
//     --(owner resubmit)--> em_andamento
//
// Both terminal states are listed here; `reprovado` has exactly one exit
// (resubmission), `finalizado` has none.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StatusParseError;

/// The five canonical workflow states of a laudo.
///
/// Serialized as the canonical Portuguese snake_case strings used by the
/// rest of the system (`"em_andamento"`, `"aprovado_manutencao"`, ...).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LaudoStatus {
    /// Draft, owned by the creating technician; awaiting supervisor review.
    EmAndamento,

    /// Maintenance stage approved by the supervisor (encarregado).
    AprovadoManutencao,

    /// Commercial stage approved by sales (vendedor).
    AprovadoVendas,

    /// Terminal success state — the laudo is immutable and exportable.
    Finalizado,

    /// Terminal rejection state; the owner may resubmit, nothing else.
    Reprovado,
}

impl fmt::Display for LaudoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaudoStatus::EmAndamento => write!(f, "em_andamento"),
            LaudoStatus::AprovadoManutencao => write!(f, "aprovado_manutencao"),
            LaudoStatus::AprovadoVendas => write!(f, "aprovado_vendas"),
            LaudoStatus::Finalizado => write!(f, "finalizado"),
            LaudoStatus::Reprovado => write!(f, "reprovado"),
        }
    }
}

impl LaudoStatus {
    /// All canonical states, in pipeline order.
    pub const ALL: [LaudoStatus; 5] = [
        LaudoStatus::EmAndamento,
        LaudoStatus::AprovadoManutencao,
        LaudoStatus::AprovadoVendas,
        LaudoStatus::Finalizado,
        LaudoStatus::Reprovado,
    ];

    /// Whether this state is terminal.
    ///
    /// `reprovado` is terminal except for the single resubmission edge back
    /// to `em_andamento`; `finalizado` has no workflow exit at all.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LaudoStatus::Finalizado | LaudoStatus::Reprovado)
    }

    /// Parse a status string as stored in persisted data.
    ///
    /// Earlier deployments wrote a second, near-synonymous vocabulary
    /// (`pendente`, `aguardando_orcamento`, `orcamento_aprovado`, ...)
    /// interchangeably with the canonical one. Stored data is accepted via
    /// this explicit mapping table; the engine itself never emits legacy
    /// strings. Unknown strings are an error, never a passthrough.
    pub fn parse_stored(s: &str) -> Result<Self, StatusParseError> {
        match s {
            // Canonical vocabulary.
            "em_andamento" => Ok(LaudoStatus::EmAndamento),
            "aprovado_manutencao" => Ok(LaudoStatus::AprovadoManutencao),
            "aprovado_vendas" => Ok(LaudoStatus::AprovadoVendas),
            "finalizado" => Ok(LaudoStatus::Finalizado),
            "reprovado" => Ok(LaudoStatus::Reprovado),

            // Legacy vocabulary from the pre-refactor schema.
            "pendente" => Ok(LaudoStatus::EmAndamento),
            "aguardando_orcamento" => Ok(LaudoStatus::AprovadoManutencao),
            "ap_manutencao" => Ok(LaudoStatus::AprovadoManutencao),
            "aprovado" => Ok(LaudoStatus::AprovadoManutencao),
            "orcamento_aprovado" => Ok(LaudoStatus::AprovadoVendas),
            "ap_vendas" => Ok(LaudoStatus::AprovadoVendas),
            "compra_finalizada" => Ok(LaudoStatus::Finalizado),

            other => Err(StatusParseError(other.to_string())),
        }
    }
}

impl FromStr for LaudoStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LaudoStatus::parse_stored(s)
    }
}

/// Deserialize a status through the legacy mapping table.
///
/// Used on the `Laudo::status` field so records written by the pre-refactor
/// system load cleanly; the derived `Deserialize` on [`LaudoStatus`] itself
/// stays strict.
pub fn deserialize_stored<'de, D>(deserializer: D) -> Result<LaudoStatus, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LaudoStatus::parse_stored(&s).map_err(serde::de::Error::custom)
}

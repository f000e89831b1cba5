// actor.rs — Roles, privileges, and the Actor identity.
//
// Role is fixed at user creation and decides the base authorization for
// every transition. Privileges are delegated, revocable capabilities beyond
// the base role — today only `finalize_laudos`, which lets a technician
// finalize their own laudos.
//
// The auth/session layer supplies an Actor (id + role + active privileges)
// on every engine call; the engine never manages credentials.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Base role of a user. Fixed at creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Field technician: creates laudos, may finalize only their own and
    /// only when granted the `finalize_laudos` privilege.
    Tecnico,
    /// Supervisor: approves the maintenance stage and may finalize.
    Encarregado,
    /// Sales: approves the budget/commercial stage.
    Vendedor,
    /// Administrator: every gate in the pipeline.
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Tecnico => write!(f, "tecnico"),
            Role::Encarregado => write!(f, "encarregado"),
            Role::Vendedor => write!(f, "vendedor"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl Role {
    /// Roles that see every laudo regardless of ownership.
    pub fn sees_all_laudos(&self) -> bool {
        matches!(self, Role::Admin | Role::Encarregado)
    }
}

/// A delegated capability beyond the base role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Privilege {
    /// Allows a technician to finalize laudos they created.
    FinalizeLaudos,
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Privilege::FinalizeLaudos => write!(f, "finalize_laudos"),
        }
    }
}

/// The identity attached to every workflow request.
///
/// Carries a snapshot of the actor's active privileges as resolved by the
/// session layer at call time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    /// Active privileges at the time of the call.
    #[serde(default)]
    pub privileges: Vec<Privilege>,
}

impl Actor {
    pub fn new(id: Uuid, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            role,
            privileges: Vec::new(),
        }
    }

    /// Attach active privileges (builder style).
    pub fn with_privileges(mut self, privileges: Vec<Privilege>) -> Self {
        self.privileges = privileges;
        self
    }

    pub fn has_privilege(&self, privilege: Privilege) -> bool {
        self.privileges.contains(&privilege)
    }
}

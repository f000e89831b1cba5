// grant.rs — The privilege grant record.
//
// A grant names a user, a privilege, and who delegated it. Revocation is a
// soft flip of `is_active` so the grant history stays inspectable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lf_laudo::Privilege;

/// A single revocable privilege grant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrivilegeGrant {
    pub user_id: Uuid,
    pub privilege: Privilege,
    /// The admin who delegated this capability.
    pub granted_by: Uuid,
    pub granted_at: DateTime<Utc>,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<DateTime<Utc>>,
}

impl PrivilegeGrant {
    pub fn new(user_id: Uuid, privilege: Privilege, granted_by: Uuid) -> Self {
        Self {
            user_id,
            privilege,
            granted_by,
            granted_at: Utc::now(),
            is_active: true,
            revoked_at: None,
        }
    }

    /// Mark the grant revoked. Idempotent.
    pub fn revoke(&mut self) {
        if self.is_active {
            self.is_active = false;
            self.revoked_at = Some(Utc::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grant_is_active() {
        let grant = PrivilegeGrant::new(Uuid::new_v4(), Privilege::FinalizeLaudos, Uuid::new_v4());
        assert!(grant.is_active);
        assert!(grant.revoked_at.is_none());
    }

    #[test]
    fn revoke_flips_once() {
        let mut grant =
            PrivilegeGrant::new(Uuid::new_v4(), Privilege::FinalizeLaudos, Uuid::new_v4());
        grant.revoke();
        assert!(!grant.is_active);
        let first_revocation = grant.revoked_at;
        assert!(first_revocation.is_some());

        grant.revoke();
        assert_eq!(grant.revoked_at, first_revocation);
    }

    #[test]
    fn serialization_round_trip() {
        let grant = PrivilegeGrant::new(Uuid::new_v4(), Privilege::FinalizeLaudos, Uuid::new_v4());
        let json = serde_json::to_string(&grant).unwrap();
        assert!(json.contains("\"finalize_laudos\""));
        let restored: PrivilegeGrant = serde_json::from_str(&json).unwrap();
        assert_eq!(grant, restored);
    }
}

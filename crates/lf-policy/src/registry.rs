// registry.rs — Privilege grant/revoke administration.
//
// The registry owns the grant records and persists them as a single JSON
// file (`privileges.json`). Grant and revoke are idempotent: repeating an
// operation the system is already in the requested state for is a no-op,
// not an error.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use lf_laudo::{Privilege, Role};

use crate::error::PrivilegeError;
use crate::grant::PrivilegeGrant;

/// File-backed registry of privilege grants.
pub struct PrivilegeRegistry {
    path: PathBuf,
    grants: Vec<PrivilegeGrant>,
}

impl PrivilegeRegistry {
    /// Open (or create) the registry at the given file path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PrivilegeError> {
        let path = path.as_ref().to_path_buf();
        let grants = if path.exists() {
            let json = fs::read_to_string(&path).map_err(|source| PrivilegeError::Io {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&json)?
        } else {
            Vec::new()
        };
        Ok(Self { path, grants })
    }

    /// Grant a privilege to a technician.
    ///
    /// Returns `Ok(true)` if a new grant was recorded, `Ok(false)` if the
    /// user already holds an active grant (idempotent no-op). Grants to any
    /// role other than tecnico are refused.
    pub fn grant(
        &mut self,
        user_id: Uuid,
        role: Role,
        privilege: Privilege,
        granted_by: Uuid,
    ) -> Result<bool, PrivilegeError> {
        if role != Role::Tecnico {
            return Err(PrivilegeError::NotGrantable { user_id, role });
        }

        if self.has_active(user_id, privilege) {
            return Ok(false);
        }

        self.grants
            .push(PrivilegeGrant::new(user_id, privilege, granted_by));
        self.persist()?;
        tracing::info!(%user_id, %privilege, %granted_by, "privilege granted");
        Ok(true)
    }

    /// Revoke a privilege.
    ///
    /// Returns `Ok(true)` if an active grant was revoked, `Ok(false)` if
    /// there was nothing to revoke (idempotent no-op).
    pub fn revoke(&mut self, user_id: Uuid, privilege: Privilege) -> Result<bool, PrivilegeError> {
        let mut revoked = false;
        for grant in &mut self.grants {
            if grant.user_id == user_id && grant.privilege == privilege && grant.is_active {
                grant.revoke();
                revoked = true;
            }
        }
        if revoked {
            self.persist()?;
            tracing::info!(%user_id, %privilege, "privilege revoked");
        }
        Ok(revoked)
    }

    /// Active privileges for a user, for building an [`lf_laudo::Actor`].
    pub fn active_privileges(&self, user_id: Uuid) -> Vec<Privilege> {
        let mut privileges: Vec<Privilege> = self
            .grants
            .iter()
            .filter(|g| g.user_id == user_id && g.is_active)
            .map(|g| g.privilege)
            .collect();
        privileges.dedup();
        privileges
    }

    pub fn has_active(&self, user_id: Uuid, privilege: Privilege) -> bool {
        self.grants
            .iter()
            .any(|g| g.user_id == user_id && g.privilege == privilege && g.is_active)
    }

    /// All grant records, including revoked ones.
    pub fn all(&self) -> &[PrivilegeGrant] {
        &self.grants
    }

    fn persist(&self) -> Result<(), PrivilegeError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| PrivilegeError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(&self.grants)?;
        fs::write(&self.path, json).map_err(|source| PrivilegeError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn registry(dir: &Path) -> PrivilegeRegistry {
        PrivilegeRegistry::open(dir.join("privileges.json")).unwrap()
    }

    #[test]
    fn grant_and_lookup() {
        let dir = tempdir().unwrap();
        let mut reg = registry(dir.path());

        let user = Uuid::new_v4();
        let admin = Uuid::new_v4();
        assert!(reg
            .grant(user, Role::Tecnico, Privilege::FinalizeLaudos, admin)
            .unwrap());
        assert!(reg.has_active(user, Privilege::FinalizeLaudos));
        assert_eq!(
            reg.active_privileges(user),
            vec![Privilege::FinalizeLaudos]
        );
    }

    #[test]
    fn grant_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut reg = registry(dir.path());

        let user = Uuid::new_v4();
        let admin = Uuid::new_v4();
        assert!(reg
            .grant(user, Role::Tecnico, Privilege::FinalizeLaudos, admin)
            .unwrap());
        // Second grant is a no-op, not an error and not a duplicate record.
        assert!(!reg
            .grant(user, Role::Tecnico, Privilege::FinalizeLaudos, admin)
            .unwrap());
        assert_eq!(reg.all().len(), 1);
    }

    #[test]
    fn grant_refused_for_non_tecnico() {
        let dir = tempdir().unwrap();
        let mut reg = registry(dir.path());

        let result = reg.grant(
            Uuid::new_v4(),
            Role::Vendedor,
            Privilege::FinalizeLaudos,
            Uuid::new_v4(),
        );
        assert!(matches!(result, Err(PrivilegeError::NotGrantable { .. })));
    }

    #[test]
    fn revoke_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut reg = registry(dir.path());

        let user = Uuid::new_v4();
        reg.grant(user, Role::Tecnico, Privilege::FinalizeLaudos, Uuid::new_v4())
            .unwrap();

        assert!(reg.revoke(user, Privilege::FinalizeLaudos).unwrap());
        assert!(!reg.has_active(user, Privilege::FinalizeLaudos));
        // Nothing left to revoke.
        assert!(!reg.revoke(user, Privilege::FinalizeLaudos).unwrap());
    }

    #[test]
    fn regrant_after_revoke() {
        let dir = tempdir().unwrap();
        let mut reg = registry(dir.path());

        let user = Uuid::new_v4();
        let admin = Uuid::new_v4();
        reg.grant(user, Role::Tecnico, Privilege::FinalizeLaudos, admin)
            .unwrap();
        reg.revoke(user, Privilege::FinalizeLaudos).unwrap();
        assert!(reg
            .grant(user, Role::Tecnico, Privilege::FinalizeLaudos, admin)
            .unwrap());
        assert!(reg.has_active(user, Privilege::FinalizeLaudos));
        // History keeps the revoked record.
        assert_eq!(reg.all().len(), 2);
    }

    #[test]
    fn registry_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("privileges.json");
        let user = Uuid::new_v4();

        {
            let mut reg = PrivilegeRegistry::open(&path).unwrap();
            reg.grant(user, Role::Tecnico, Privilege::FinalizeLaudos, Uuid::new_v4())
                .unwrap();
        }

        let reg = PrivilegeRegistry::open(&path).unwrap();
        assert!(reg.has_active(user, Privilege::FinalizeLaudos));
    }
}

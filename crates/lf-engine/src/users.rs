// users.rs — The user directory.
//
// A small file-backed registry (`users.json`) of who exists and with which
// role. Credentials and sessions live in the auth layer, not here; the
// directory only backs actor resolution (username → id + role).

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lf_laudo::{Actor, Privilege, Role};

use crate::error::EngineError;

/// A registered user. Role is fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build the actor identity for a workflow call, attaching the active
    /// privileges resolved by the caller.
    pub fn as_actor(&self, privileges: Vec<Privilege>) -> Actor {
        Actor::new(self.id, self.username.clone(), self.role).with_privileges(privileges)
    }
}

/// File-backed user directory.
pub struct UserDirectory {
    path: PathBuf,
    users: Vec<User>,
}

impl UserDirectory {
    /// Open (or create) the directory at the given file path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref().to_path_buf();
        let users = if path.exists() {
            let json = fs::read_to_string(&path).map_err(|source| EngineError::Io {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&json)?
        } else {
            Vec::new()
        };
        Ok(Self { path, users })
    }

    /// Register a new user. Usernames are unique.
    pub fn add(&mut self, username: impl Into<String>, role: Role) -> Result<User, EngineError> {
        let username = username.into();
        if self.find_by_username(&username).is_some() {
            return Err(EngineError::DuplicateUsername(username));
        }

        let user = User {
            id: Uuid::new_v4(),
            username,
            role,
            created_at: Utc::now(),
        };
        self.users.push(user.clone());
        self.persist()?;
        Ok(user)
    }

    pub fn get(&self, user_id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn list(&self) -> &[User] {
        &self.users
    }

    fn persist(&self) -> Result<(), EngineError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| EngineError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(&self.users)?;
        fs::write(&self.path, json).map_err(|source| EngineError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn add_and_find() {
        let dir = tempdir().unwrap();
        let mut users = UserDirectory::open(dir.path().join("users.json")).unwrap();

        let user = users.add("joao", Role::Tecnico).unwrap();
        assert_eq!(users.find_by_username("joao").unwrap().id, user.id);
        assert_eq!(users.get(user.id).unwrap().role, Role::Tecnico);
    }

    #[test]
    fn duplicate_username_refused() {
        let dir = tempdir().unwrap();
        let mut users = UserDirectory::open(dir.path().join("users.json")).unwrap();

        users.add("joao", Role::Tecnico).unwrap();
        let result = users.add("joao", Role::Vendedor);
        assert!(matches!(result, Err(EngineError::DuplicateUsername(_))));
    }

    #[test]
    fn directory_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.json");

        {
            let mut users = UserDirectory::open(&path).unwrap();
            users.add("chefe", Role::Encarregado).unwrap();
        }

        let users = UserDirectory::open(&path).unwrap();
        assert_eq!(users.find_by_username("chefe").unwrap().role, Role::Encarregado);
    }

    #[test]
    fn as_actor_carries_privileges() {
        let dir = tempdir().unwrap();
        let mut users = UserDirectory::open(dir.path().join("users.json")).unwrap();

        let user = users.add("joao", Role::Tecnico).unwrap();
        let actor = user.as_actor(vec![Privilege::FinalizeLaudos]);
        assert_eq!(actor.id, user.id);
        assert!(actor.has_privilege(Privilege::FinalizeLaudos));
    }
}

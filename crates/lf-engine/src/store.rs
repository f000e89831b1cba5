// store.rs — Versioned one-file-per-laudo persistence.
//
// Each laudo is stored as `<store_dir>/<laudo_id>.json`. Laudos are
// independently versioned resources: a write is staged against the version
// the caller loaded, and a mismatch at commit time is a Conflict — never a
// silent overwrite.
//
// The stage/commit split exists so the coordinator can append the audit
// entry between the two: the new record is written to a temp file first and
// only renamed into place after the append succeeds, so no
// partially-applied transition is ever observable.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use lf_laudo::Laudo;

use crate::error::EngineError;

/// Persistent store for laudo records.
pub struct LaudoStore {
    store_dir: PathBuf,
}

/// A write that has been version-checked and written to a temp file, but
/// not yet made visible. Dropped without [`commit`](StagedWrite::commit),
/// it cleans up after itself and the store is untouched.
pub struct StagedWrite {
    tmp: PathBuf,
    dst: PathBuf,
    committed: bool,
}

impl StagedWrite {
    /// Make the staged record visible by renaming it into place.
    pub fn commit(mut self) -> Result<(), EngineError> {
        fs::rename(&self.tmp, &self.dst).map_err(|source| EngineError::Io {
            path: self.dst.clone(),
            source,
        })?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedWrite {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.tmp);
        }
    }
}

impl LaudoStore {
    /// Create a new store backed by the given directory.
    pub fn new(store_dir: impl AsRef<Path>) -> Result<Self, EngineError> {
        let store_dir = store_dir.as_ref().to_path_buf();
        fs::create_dir_all(&store_dir).map_err(|source| EngineError::Io {
            path: store_dir.clone(),
            source,
        })?;
        Ok(Self { store_dir })
    }

    /// Insert a newly created laudo.
    pub fn insert(&self, laudo: &Laudo) -> Result<(), EngineError> {
        let path = self.laudo_file(laudo.id);
        let json = serde_json::to_string_pretty(laudo)?;
        fs::write(&path, json).map_err(|source| EngineError::Io { path, source })
    }

    /// Get a laudo snapshot by id.
    pub fn get(&self, laudo_id: Uuid) -> Result<Option<Laudo>, EngineError> {
        let path = self.laudo_file(laudo_id);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path).map_err(|source| EngineError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Load a laudo, failing with `NotFound` if it does not exist.
    pub fn load(&self, laudo_id: Uuid) -> Result<Laudo, EngineError> {
        self.get(laudo_id)?.ok_or(EngineError::NotFound(laudo_id))
    }

    /// Stage a mutated laudo against the version the caller loaded.
    ///
    /// Re-reads the persisted record and refuses with `Conflict` if its
    /// version no longer matches `expected_version`.
    pub fn stage(&self, laudo: &Laudo, expected_version: u64) -> Result<StagedWrite, EngineError> {
        let persisted = self.load(laudo.id)?;
        if persisted.version != expected_version {
            return Err(EngineError::Conflict {
                laudo_id: laudo.id,
                expected: expected_version,
                found: persisted.version,
            });
        }

        let dst = self.laudo_file(laudo.id);
        let tmp = dst.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(laudo)?;
        fs::write(&tmp, json).map_err(|source| EngineError::Io {
            path: tmp.clone(),
            source,
        })?;

        Ok(StagedWrite {
            tmp,
            dst,
            committed: false,
        })
    }

    /// List all laudos, newest first.
    pub fn list(&self) -> Result<Vec<Laudo>, EngineError> {
        let mut laudos = Vec::new();

        let entries = fs::read_dir(&self.store_dir).map_err(|source| EngineError::Io {
            path: self.store_dir.clone(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| EngineError::Io {
                path: self.store_dir.clone(),
                source,
            })?;
            let path = entry.path();

            if path.extension().is_some_and(|ext| ext == "json") {
                let json = fs::read_to_string(&path).map_err(|source| EngineError::Io {
                    path: path.clone(),
                    source,
                })?;
                if let Ok(laudo) = serde_json::from_str::<Laudo>(&json) {
                    laudos.push(laudo);
                }
            }
        }

        laudos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(laudos)
    }

    fn laudo_file(&self, laudo_id: Uuid) -> PathBuf {
        self.store_dir.join(format!("{}.json", laudo_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_laudo() -> Laudo {
        Laudo::new(
            Uuid::new_v4(),
            "Cliente A",
            "Bateria 48V",
            "diagnóstico",
            "solução",
        )
    }

    #[test]
    fn insert_and_get_round_trip() {
        let dir = tempdir().unwrap();
        let store = LaudoStore::new(dir.path().join("laudos")).unwrap();

        let laudo = make_laudo();
        store.insert(&laudo).unwrap();

        let found = store.get(laudo.id).unwrap().unwrap();
        assert_eq!(found.id, laudo.id);
        assert_eq!(found.cliente, "Cliente A");
    }

    #[test]
    fn get_nonexistent_returns_none() {
        let dir = tempdir().unwrap();
        let store = LaudoStore::new(dir.path().join("laudos")).unwrap();
        assert!(store.get(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn load_nonexistent_is_not_found() {
        let dir = tempdir().unwrap();
        let store = LaudoStore::new(dir.path().join("laudos")).unwrap();
        let result = store.load(Uuid::new_v4());
        assert!(matches!(result, Err(EngineError::NotFound(_))));
    }

    #[test]
    fn staged_commit_updates_record() {
        let dir = tempdir().unwrap();
        let store = LaudoStore::new(dir.path().join("laudos")).unwrap();

        let mut laudo = make_laudo();
        store.insert(&laudo).unwrap();

        laudo.version = 2;
        laudo.diagnostico = "revisado".to_string();
        let staged = store.stage(&laudo, 1).unwrap();
        staged.commit().unwrap();

        let found = store.get(laudo.id).unwrap().unwrap();
        assert_eq!(found.version, 2);
        assert_eq!(found.diagnostico, "revisado");
    }

    #[test]
    fn stale_version_is_a_conflict() {
        let dir = tempdir().unwrap();
        let store = LaudoStore::new(dir.path().join("laudos")).unwrap();

        let mut laudo = make_laudo();
        store.insert(&laudo).unwrap();

        // First writer commits version 2.
        laudo.version = 2;
        store.stage(&laudo, 1).unwrap().commit().unwrap();

        // Second writer still holds the version-1 snapshot.
        let result = store.stage(&laudo, 1);
        assert!(matches!(
            result,
            Err(EngineError::Conflict {
                expected: 1,
                found: 2,
                ..
            })
        ));
    }

    #[test]
    fn abandoned_stage_leaves_store_untouched() {
        let dir = tempdir().unwrap();
        let store = LaudoStore::new(dir.path().join("laudos")).unwrap();

        let mut laudo = make_laudo();
        store.insert(&laudo).unwrap();

        laudo.version = 2;
        {
            let _staged = store.stage(&laudo, 1).unwrap();
            // Dropped without commit.
        }

        let found = store.get(laudo.id).unwrap().unwrap();
        assert_eq!(found.version, 1);
        // No temp file left behind either.
        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn list_returns_all_laudos() {
        let dir = tempdir().unwrap();
        let store = LaudoStore::new(dir.path().join("laudos")).unwrap();

        store.insert(&make_laudo()).unwrap();
        store.insert(&make_laudo()).unwrap();

        assert_eq!(store.list().unwrap().len(), 2);
    }
}

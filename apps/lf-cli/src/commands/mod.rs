// mod.rs — Shared CLI context: opened stores and actor resolution.

pub mod audit;
pub mod laudo;
pub mod privilege;
pub mod review;
pub mod user;

use std::path::Path;

use anyhow::{bail, Context as _};

use lf_audit::AuditLog;
use lf_engine::{ApprovalCoordinator, EngineError, LaudoStore, LogSink, UserDirectory};
use lf_laudo::Actor;
use lf_policy::PrivilegeRegistry;

use crate::config::{CliConfig, DataPaths};

/// Everything a command needs: resolved paths plus the loaded config.
pub struct Context {
    pub paths: DataPaths,
    pub config: CliConfig,
}

impl Context {
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let config = CliConfig::load_or_default(data_dir)?;
        Ok(Self {
            paths: DataPaths::for_data_dir(data_dir),
            config,
        })
    }

    pub fn coordinator(&self) -> anyhow::Result<ApprovalCoordinator> {
        let store = LaudoStore::new(&self.paths.laudos_dir)?;
        let audit = AuditLog::open(&self.paths.audit_path)?;
        let mut coordinator = ApprovalCoordinator::new(store, audit);
        if self.config.notifications.events_log {
            coordinator.add_sink(Box::new(LogSink::new(&self.paths.events_path)));
        }
        Ok(coordinator)
    }

    pub fn store(&self) -> anyhow::Result<LaudoStore> {
        Ok(LaudoStore::new(&self.paths.laudos_dir)?)
    }

    pub fn users(&self) -> anyhow::Result<UserDirectory> {
        Ok(UserDirectory::open(&self.paths.users_path)?)
    }

    pub fn privileges(&self) -> anyhow::Result<PrivilegeRegistry> {
        Ok(PrivilegeRegistry::open(&self.paths.privileges_path)?)
    }

    /// Resolve `--as <username>` into an actor carrying the user's active
    /// privileges at this moment.
    pub fn resolve_actor(&self, username: &str) -> anyhow::Result<Actor> {
        let users = self.users()?;
        let user = match users.find_by_username(username) {
            Some(u) => u.clone(),
            None => bail!("unknown user: {} (register with `lf user add`)", username),
        };
        let privileges = self.privileges()?.active_privileges(user.id);
        Ok(user.as_actor(privileges))
    }
}

/// Surface an engine refusal as `<kind>: <message>`, the same shape the
/// HTTP layer would return.
pub fn engine_failure(err: EngineError) -> anyhow::Error {
    anyhow::anyhow!("{}: {}", err.kind(), err)
}

/// Parse a laudo id argument.
pub fn parse_laudo_id(id: &str) -> anyhow::Result<uuid::Uuid> {
    uuid::Uuid::parse_str(id).with_context(|| format!("invalid laudo id: {}", id))
}

//! CLI configuration, loaded from `laudo.toml` in the data directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level configuration from `<data_dir>/laudo.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Notification configuration.
    #[serde(default)]
    pub notifications: NotificationsConfig,

    /// Display / output configuration.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Notification sink configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Append workflow events to `<data_dir>/events.jsonl`.
    #[serde(default = "default_events_log")]
    pub events_log: bool,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            events_log: default_events_log(),
        }
    }
}

/// Display / output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Rows shown by `lf audit tail` when `--lines` is not given.
    #[serde(default = "default_tail_lines")]
    pub tail_lines: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            tail_lines: default_tail_lines(),
        }
    }
}

// Serde default functions
fn default_events_log() -> bool {
    true
}

fn default_tail_lines() -> usize {
    10
}

impl CliConfig {
    /// Load `laudo.toml` from the data directory, falling back to defaults
    /// when the file does not exist.
    pub fn load_or_default(data_dir: &Path) -> anyhow::Result<Self> {
        let path = data_dir.join("laudo.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)?;
        Ok(toml::from_str(&raw)?)
    }
}

/// Resolved paths for everything the CLI persists under the data directory.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub laudos_dir: PathBuf,
    pub audit_path: PathBuf,
    pub users_path: PathBuf,
    pub privileges_path: PathBuf,
    pub events_path: PathBuf,
}

impl DataPaths {
    pub fn for_data_dir(data_dir: &Path) -> Self {
        Self {
            laudos_dir: data_dir.join("laudos"),
            audit_path: data_dir.join("transitions.jsonl"),
            users_path: data_dir.join("users.json"),
            privileges_path: data_dir.join("privileges.json"),
            events_path: data_dir.join("events.jsonl"),
        }
    }
}

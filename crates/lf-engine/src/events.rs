// events.rs — Workflow events and notification dispatch.
//
// The engine emits an event after every committed mutation. Notification
// sinks (log files, future webhook/chat integrations) subscribe to these;
// sinks observe, they cannot veto or bypass the workflow. Dispatch is
// synchronous and sink failures never fail the transition that triggered
// them.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lf_laudo::LaudoStatus;

use crate::error::EngineError;

/// Events emitted at key workflow points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum WorkflowEvent {
    /// A technician created a new laudo.
    LaudoCreated {
        laudo_id: Uuid,
        created_by: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// A laudo changed status.
    StatusChanged {
        laudo_id: Uuid,
        actor_id: Uuid,
        from_status: String,
        to_status: String,
        version: u64,
        timestamp: DateTime<Utc>,
    },

    /// A laudo was rejected, with the mandatory reason.
    LaudoRejected {
        laudo_id: Uuid,
        actor_id: Uuid,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// The owner resubmitted a rejected laudo.
    LaudoResubmitted {
        laudo_id: Uuid,
        actor_id: Uuid,
        resubmission_count: u32,
        timestamp: DateTime<Utc>,
    },

    /// A laudo reached the terminal success state.
    LaudoFinalized {
        laudo_id: Uuid,
        actor_id: Uuid,
        timestamp: DateTime<Utc>,
    },
}

impl WorkflowEvent {
    /// Event type name as a string.
    pub fn event_type(&self) -> &str {
        match self {
            WorkflowEvent::LaudoCreated { .. } => "laudo_created",
            WorkflowEvent::StatusChanged { .. } => "status_changed",
            WorkflowEvent::LaudoRejected { .. } => "laudo_rejected",
            WorkflowEvent::LaudoResubmitted { .. } => "laudo_resubmitted",
            WorkflowEvent::LaudoFinalized { .. } => "laudo_finalized",
        }
    }

    pub fn laudo_created(laudo_id: Uuid, created_by: Uuid) -> Self {
        WorkflowEvent::LaudoCreated {
            laudo_id,
            created_by,
            timestamp: Utc::now(),
        }
    }

    pub fn status_changed(
        laudo_id: Uuid,
        actor_id: Uuid,
        from: LaudoStatus,
        to: LaudoStatus,
        version: u64,
    ) -> Self {
        WorkflowEvent::StatusChanged {
            laudo_id,
            actor_id,
            from_status: from.to_string(),
            to_status: to.to_string(),
            version,
            timestamp: Utc::now(),
        }
    }
}

/// Trait for receiving workflow events.
///
/// Implementations decide what to do with each event: log to a file, call a
/// webhook, post to chat. Errors are logged but don't stop the system.
pub trait NotificationSink: Send {
    fn send(&self, event: &WorkflowEvent) -> Result<(), EngineError>;
}

/// Logs events as JSONL to a file (always-on sink).
pub struct LogSink {
    path: PathBuf,
}

impl LogSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl NotificationSink for LogSink {
    fn send(&self, event: &WorkflowEvent) -> Result<(), EngineError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| EngineError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| EngineError::Io {
                path: self.path.clone(),
                source,
            })?;

        let json = serde_json::to_string(event)?;
        writeln!(file, "{}", json).map_err(|source| EngineError::Io {
            path: self.path.clone(),
            source,
        })?;

        Ok(())
    }
}

/// Dispatches events to multiple sinks.
///
/// Errors from individual sinks are logged via tracing but don't prevent
/// other sinks from receiving the event.
#[derive(Default)]
pub struct EventDispatcher {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.sinks.push(sink);
    }

    pub fn dispatch(&self, event: &WorkflowEvent) {
        for sink in &self.sinks {
            if let Err(e) = sink.send(event) {
                tracing::warn!("notification sink error: {}", e);
            }
        }
    }
}

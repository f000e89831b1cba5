//! # lf-audit
//!
//! Append-only transition log for LaudoFlow.
//!
//! Every committed status transition is recorded as an [`AuditEntry`] in a
//! JSONL (JSON Lines) log file. Each entry links to the previous one via a
//! SHA-256 hash, so inserting, deleting, or editing an entry breaks the
//! chain and is detectable with [`AuditLog::verify_chain`].
//!
//! ## Quick example
//!
//! ```rust,no_run
//! use lf_audit::{AuditLog, AuditEntry};
//! use uuid::Uuid;
//!
//! let mut log = AuditLog::open("/tmp/transitions.jsonl").unwrap();
//! let mut entry = AuditEntry::new(Uuid::new_v4(), Uuid::new_v4(), "em_andamento", "reprovado")
//!     .with_reason("bateria não testada");
//! log.append(&mut entry).unwrap();
//! ```

pub mod entry;
pub mod error;
pub mod hasher;
pub mod log;

pub use entry::AuditEntry;
pub use error::AuditError;
pub use log::AuditLog;

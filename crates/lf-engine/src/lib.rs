//! # lf-engine
//!
//! The approval workflow engine for battery maintenance laudos.
//!
//! A laudo moves `em_andamento → aprovado_manutencao → aprovado_vendas →
//! finalizado`, with rejection (and owner resubmission) available from the
//! two review stages. Every mutation flows through the
//! [`ApprovalCoordinator`], which authorizes, validates, version-checks,
//! audits, and only then commits.
//!
//! ## Key components
//!
//! - [`ApprovalCoordinator`] — the single writer path (create, apply,
//!   reject, resubmit, annotate)
//! - [`LaudoStore`] — versioned one-file-per-laudo persistence with
//!   staged, conflict-checked commits
//! - [`QueryProjector`] — read-side role queues, visibility filters, stats
//! - [`UserDirectory`] — who exists, with which role
//! - [`WorkflowEvent`] / [`NotificationSink`] — post-commit notifications

pub mod coordinator;
pub mod error;
pub mod events;
pub mod queries;
pub mod rejection;
pub mod store;
pub mod users;

pub use coordinator::ApprovalCoordinator;
pub use error::EngineError;
pub use events::{EventDispatcher, LogSink, NotificationSink, WorkflowEvent};
pub use queries::{QueryProjector, WorkflowStats};
pub use store::{LaudoStore, StagedWrite};
pub use users::{User, UserDirectory};

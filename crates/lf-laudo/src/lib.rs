//! # lf-laudo
//!
//! Canonical data model for LaudoFlow: the laudo record, the finite status
//! enumeration, roles and privileges, and the pure transition validator.
//!
//! A laudo's `status` field is only ever a member of [`LaudoStatus`] — never
//! an ad hoc string — and is mutated exclusively through the workflow engine
//! in `lf-engine`. This crate holds the rules; it performs no I/O.
//!
//! ## Key components
//!
//! - [`LaudoStatus`] — the five canonical workflow states, plus the mapping
//!   table for legacy strings found in stored data
//! - [`Role`] / [`Privilege`] / [`Actor`] — who is asking
//! - [`Laudo`] — the inspection report record itself
//! - [`validate`] — pure predicate: is this transition legal for this actor?

pub mod actor;
pub mod error;
pub mod laudo;
pub mod status;
pub mod transition;

pub use actor::{Actor, Privilege, Role};
pub use error::{StatusParseError, TransitionError};
pub use laudo::{Laudo, Tag};
pub use status::LaudoStatus;
pub use transition::validate;

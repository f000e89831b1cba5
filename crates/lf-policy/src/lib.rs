//! # lf-policy
//!
//! Privilege resolution for LaudoFlow.
//!
//! Base roles cover most of the approval pipeline; privileges are the
//! delegated, revocable capabilities beyond them — today only
//! `finalize_laudos`, which lets a technician finalize their own laudos.
//!
//! ## Key components
//!
//! - [`PrivilegeGrant`] — one revocable grant record
//! - [`PrivilegeRegistry`] — grant/revoke administration with JSON
//!   persistence; idempotent in both directions
//! - [`resolver`] — the authorization checks consulted by the approval
//!   coordinator and the export layer

pub mod error;
pub mod grant;
pub mod registry;
pub mod resolver;

pub use error::PrivilegeError;
pub use grant::PrivilegeGrant;
pub use registry::PrivilegeRegistry;
pub use resolver::{authorize, can_export};

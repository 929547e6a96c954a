//! Officer Quorum Domain Types
//!
//! This crate defines the vocabulary of the multi-signatory authorization
//! engine: the closed set of officer roles, who may stand in for whom, the
//! per-module approval policy, and the records an authorization session is
//! built from.
//!
//! # Key Concepts
//!
//! - **Officer role**: a named administrative position eligible to approve
//!   gated actions. Roles form a closed enum, never free strings.
//! - **Substitution**: a substitute role may approve in place of an
//!   unavailable principal (Vice President for President, and so on).
//! - **Module rules**: each [`AuthorizationModule`] maps to one immutable
//!   [`ModuleRules`] record: mandatory roles, OR-groups, auxiliary roles and
//!   a base quorum.
//! - **Decisions**: an [`OfficerEntry`] records one role's approve/reject
//!   decision inside a session.
//!
//! # Architecture
//!
//! This is a pure types crate. Behaviour (quorum resolution, validation,
//! the session lifecycle) lives in `quorum-engine`.

#![deny(unsafe_code)]

mod decision;
mod errors;
mod module;
mod role;
mod session;

pub use decision::*;
pub use errors::*;
pub use module::*;
pub use role::*;
pub use session::*;

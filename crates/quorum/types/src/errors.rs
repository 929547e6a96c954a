//! Error types for authorization sessions

use crate::{AuthorizationModule, OfficerRole, SessionId, SessionStatus};

/// Why a decision, cancellation or lookup was refused.
///
/// Every variant is recoverable by the caller: prompt a different officer,
/// tell the user the window closed, or abandon the action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecisionError {
    #[error("{0} has already decided in this session")]
    DuplicateRole(OfficerRole),

    #[error("Session {id} is closed ({status})")]
    SessionClosed { id: SessionId, status: SessionStatus },

    #[error("Session expired: {0}")]
    SessionExpired(SessionId),

    #[error("{role} cannot decide on {module} actions")]
    UnknownRoleForModule {
        role: String,
        module: AuthorizationModule,
    },

    #[error("Unknown officer role: {0}")]
    UnknownRole(String),

    #[error("Unknown authorization module: {0}")]
    UnknownModule(String),

    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition {
        from: SessionStatus,
        to: SessionStatus,
    },

    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("No decision recorded for {0}")]
    DecisionNotFound(OfficerRole),

    #[error("Invalid session ttl: {secs}s (must be between 1 and {max_secs})")]
    InvalidTtl { secs: i64, max_secs: u64 },

    #[error("Credential proof rejected for {0}")]
    CredentialRejected(OfficerRole),
}

/// Result type alias for session operations
pub type DecisionResult<T> = Result<T, DecisionError>;

//! Session events
//!
//! Published by the service on a broadcast channel. Terminal events
//! (`Authorized`, `Expired`, `Cancelled`) are emitted exactly once per
//! session, by the call that caused the transition.

use chrono::{DateTime, Utc};
use quorum_types::{AuthorizationModule, OfficerDecision, OfficerRole, SessionId, SessionStatus};
use serde::{Deserialize, Serialize};

/// Something that happened to an authorization session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEvent {
    pub session_id: SessionId,
    pub module: AuthorizationModule,
    pub kind: SessionEventKind,
    pub at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEventKind {
    Created {
        initiator: OfficerRole,
    },
    DecisionRecorded {
        role: OfficerRole,
        decision: OfficerDecision,
        #[serde(skip_serializing_if = "Option::is_none")]
        acting_for: Option<OfficerRole>,
    },
    DecisionRevoked {
        role: OfficerRole,
    },
    /// The gated action may now proceed
    Authorized,
    Expired,
    Cancelled,
}

impl SessionEventKind {
    /// Event for a session entering `status`; `None` for `Pending`
    pub fn for_status(status: SessionStatus) -> Option<Self> {
        match status {
            SessionStatus::Pending => None,
            SessionStatus::Authorized => Some(SessionEventKind::Authorized),
            SessionStatus::Expired => Some(SessionEventKind::Expired),
            SessionStatus::Cancelled => Some(SessionEventKind::Cancelled),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionEventKind::Authorized | SessionEventKind::Expired | SessionEventKind::Cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_kinds_follow_status() {
        assert_eq!(SessionEventKind::for_status(SessionStatus::Pending), None);
        for status in [
            SessionStatus::Authorized,
            SessionStatus::Expired,
            SessionStatus::Cancelled,
        ] {
            let kind = SessionEventKind::for_status(status).unwrap();
            assert!(kind.is_terminal(), "{status}");
        }
        assert!(!SessionEventKind::DecisionRevoked {
            role: OfficerRole::Treasurer
        }
        .is_terminal());
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let kind = SessionEventKind::DecisionRecorded {
            role: OfficerRole::AssistantSecretary,
            decision: OfficerDecision::Approved,
            acting_for: Some(OfficerRole::Secretary),
        };
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["type"], "decision_recorded");
        assert_eq!(json["role"], "assistant_secretary");
        assert_eq!(json["acting_for"], "secretary");
    }
}

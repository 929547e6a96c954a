//! Officer decisions and the opaque credential proof that accompanies them

use crate::OfficerRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An officer's decision on a gated action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfficerDecision {
    Approved,
    Rejected,
}

impl OfficerDecision {
    pub fn is_approval(&self) -> bool {
        matches!(self, OfficerDecision::Approved)
    }
}

impl std::fmt::Display for OfficerDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OfficerDecision::Approved => write!(f, "approved"),
            OfficerDecision::Rejected => write!(f, "rejected"),
        }
    }
}

/// One role's recorded decision inside an authorization session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficerEntry {
    /// The deciding role; unique within a session
    pub role: OfficerRole,
    pub decision: OfficerDecision,
    pub decided_at: DateTime<Utc>,
    /// The principal this role is standing in for.
    ///
    /// Set iff `role` is a substitute and its principal has not approved
    /// in the same session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acting_for: Option<OfficerRole>,
}

impl OfficerEntry {
    pub fn new(role: OfficerRole, decision: OfficerDecision, decided_at: DateTime<Utc>) -> Self {
        Self {
            role,
            decision,
            decided_at,
            acting_for: None,
        }
    }

    pub fn approved(role: OfficerRole, decided_at: DateTime<Utc>) -> Self {
        Self::new(role, OfficerDecision::Approved, decided_at)
    }

    pub fn rejected(role: OfficerRole, decided_at: DateTime<Utc>) -> Self {
        Self::new(role, OfficerDecision::Rejected, decided_at)
    }

    pub fn with_acting_for(mut self, principal: OfficerRole) -> Self {
        self.acting_for = Some(principal);
        self
    }

    pub fn is_approval(&self) -> bool {
        self.decision.is_approval()
    }
}

/// Proof of identity presented alongside a decision.
///
/// Opaque to the engine: verification belongs to an external collaborator
/// and the bytes are never recorded in a session.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialProof(Vec<u8>);

impl CredentialProof {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// An empty proof, for callers that verify identity elsewhere
    pub fn none() -> Self {
        Self::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for CredentialProof {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CredentialProof({} bytes)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_builders() {
        let now = Utc::now();
        let entry = OfficerEntry::approved(OfficerRole::VicePresident, now)
            .with_acting_for(OfficerRole::President);
        assert!(entry.is_approval());
        assert_eq!(entry.acting_for, Some(OfficerRole::President));

        let rejected = OfficerEntry::rejected(OfficerRole::Treasurer, now);
        assert!(!rejected.is_approval());
        assert_eq!(rejected.acting_for, None);
    }

    #[test]
    fn test_proof_debug_hides_bytes() {
        let proof = CredentialProof::new(b"hunter2".to_vec());
        assert_eq!(format!("{:?}", proof), "CredentialProof(7 bytes)");
    }
}

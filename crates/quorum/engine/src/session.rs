//! Session State Machine: one bounded-time attempt to gather approvals
//!
//! ```text
//! Pending ──► Authorized
//!    │
//!    ├──────► Expired
//!    │
//!    └──────► Cancelled
//! ```
//!
//! Only `Pending` accepts decisions. Every mutation re-runs the validator;
//! a valid result moves the session to `Authorized` in the same call.
//! Mutating methods return `Some(SessionTransition)` only on the call that
//! left `Pending`, so callers can treat authorization as an edge.

use crate::validator::{approved_roles, validate, ValidationResult};
use chrono::{DateTime, Duration, Utc};
use quorum_types::{
    AuthorizationModule, DecisionError, DecisionResult, ModuleRules, OfficerDecision,
    OfficerEntry, OfficerRole, SessionId, SessionStatus, SessionTransition,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One in-flight or completed approval attempt for a gated action
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthorizationSession {
    pub id: SessionId,
    pub module: AuthorizationModule,
    /// Free text, opaque to the engine
    pub action_description: String,
    /// The role that triggered the gated action
    pub initiator: OfficerRole,
    /// At most one entry per role
    pub participants: Vec<OfficerEntry>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: SessionStatus,
    /// Set when the session leaves `Pending`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl AuthorizationSession {
    /// A window ending past the last representable instant is clamped to it
    pub fn new(
        module: AuthorizationModule,
        action_description: impl Into<String>,
        initiator: OfficerRole,
        created_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            id: SessionId::generate(),
            module,
            action_description: action_description.into(),
            initiator,
            participants: Vec::new(),
            created_at,
            expires_at: created_at
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            status: SessionStatus::Pending,
            completed_at: None,
        }
    }

    pub fn with_id(mut self, id: SessionId) -> Self {
        self.id = id;
        self
    }

    pub fn rules(&self) -> &'static ModuleRules {
        self.module.rules()
    }

    /// Re-derive the validation result from the recorded entries
    pub fn evaluate(&self) -> ValidationResult {
        validate(self.module, self.initiator, &self.participants)
    }

    pub fn entry(&self, role: OfficerRole) -> Option<&OfficerEntry> {
        self.participants.iter().find(|e| e.role == role)
    }

    pub fn is_past_expiry(&self, at: DateTime<Utc>) -> bool {
        at > self.expires_at
    }

    pub fn is_authorized(&self) -> bool {
        self.status == SessionStatus::Authorized
    }

    /// Record a role's decision and re-evaluate.
    ///
    /// Rejections, in order: closed or expired session, ineligible role,
    /// duplicate role. A decision arriving after `expires_at` moves the
    /// session to `Expired` before it is refused.
    pub fn submit_decision(
        &mut self,
        role: OfficerRole,
        decision: OfficerDecision,
        occurs_at: DateTime<Utc>,
    ) -> DecisionResult<Option<SessionTransition>> {
        self.ensure_open(occurs_at)?;

        if !self.rules().is_eligible(role) {
            return Err(DecisionError::UnknownRoleForModule {
                role: role.to_string(),
                module: self.module,
            });
        }
        if self.entry(role).is_some() {
            return Err(DecisionError::DuplicateRole(role));
        }

        self.participants
            .push(OfficerEntry::new(role, decision, occurs_at));
        self.annotate_substitutes();

        let result = self.evaluate();
        debug!(
            session_id = %self.id,
            role = %role,
            decision = %decision,
            authorized = result.authorized_count,
            required = result.required_count,
            "Decision recorded"
        );

        if result.is_valid {
            return self.transition(SessionStatus::Authorized, occurs_at).map(Some);
        }
        Ok(None)
    }

    /// Cancel a pending session
    pub fn cancel(&mut self, occurs_at: DateTime<Utc>) -> DecisionResult<SessionTransition> {
        if self.status == SessionStatus::Pending && self.is_past_expiry(occurs_at) {
            self.transition(SessionStatus::Expired, occurs_at)?;
            return Err(DecisionError::SessionExpired(self.id.clone()));
        }
        self.transition(SessionStatus::Cancelled, occurs_at)
    }

    /// Expire the session if its window has elapsed. Idempotent; a no-op
    /// on terminal sessions.
    pub fn check_expiry(&mut self, occurs_at: DateTime<Utc>) -> Option<SessionTransition> {
        if self.status != SessionStatus::Pending || !self.is_past_expiry(occurs_at) {
            return None;
        }
        warn!(session_id = %self.id, "Authorization session expired");
        self.transition(SessionStatus::Expired, occurs_at).ok()
    }

    /// Withdraw a role's decision while the session is pending.
    ///
    /// Never changes the status: a session only becomes `Authorized` on a
    /// submitted decision.
    pub fn revoke_decision(
        &mut self,
        role: OfficerRole,
        occurs_at: DateTime<Utc>,
    ) -> DecisionResult<ValidationResult> {
        self.ensure_open(occurs_at)?;

        let index = self
            .participants
            .iter()
            .position(|e| e.role == role)
            .ok_or(DecisionError::DecisionNotFound(role))?;
        self.participants.remove(index);
        self.annotate_substitutes();

        debug!(session_id = %self.id, role = %role, "Decision revoked");
        Ok(self.evaluate())
    }

    /// Read-side projection for callers rendering progress or gating
    pub fn view(&self) -> SessionView {
        let result = self.evaluate();
        SessionView {
            id: self.id.clone(),
            module: self.module,
            action_description: self.action_description.clone(),
            initiator: self.initiator,
            status: self.status,
            authorized_count: result.authorized_count,
            required_count: result.required_count,
            quorum_reason: result.reason.to_string(),
            unmet_requirements: result.messages(),
            participants: self.participants.clone(),
            created_at: self.created_at,
            expires_at: self.expires_at,
            completed_at: self.completed_at,
        }
    }

    fn ensure_open(&mut self, occurs_at: DateTime<Utc>) -> DecisionResult<()> {
        match self.status {
            SessionStatus::Pending => {}
            SessionStatus::Expired => return Err(DecisionError::SessionExpired(self.id.clone())),
            status => {
                return Err(DecisionError::SessionClosed {
                    id: self.id.clone(),
                    status,
                })
            }
        }

        if self.check_expiry(occurs_at).is_some() {
            return Err(DecisionError::SessionExpired(self.id.clone()));
        }
        Ok(())
    }

    /// Keep `acting_for` in step with who has approved: a substitute acts
    /// for its principal only while the principal has not approved.
    fn annotate_substitutes(&mut self) {
        let approved = approved_roles(&self.participants);
        for entry in &mut self.participants {
            entry.acting_for = entry
                .role
                .principal_for()
                .filter(|principal| !approved.contains(principal));
        }
    }

    fn transition(
        &mut self,
        to: SessionStatus,
        at: DateTime<Utc>,
    ) -> DecisionResult<SessionTransition> {
        let from = self.status;
        if !from.can_transition_to(to) {
            return Err(DecisionError::InvalidTransition { from, to });
        }
        self.status = to;
        self.completed_at = Some(at);
        Ok(SessionTransition { from, to, at })
    }
}

/// Session status as seen by the caller
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub id: SessionId,
    pub module: AuthorizationModule,
    pub action_description: String,
    pub initiator: OfficerRole,
    pub status: SessionStatus,
    pub authorized_count: u32,
    pub required_count: u32,
    pub quorum_reason: String,
    pub unmet_requirements: Vec<String>,
    pub participants: Vec<OfficerEntry>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl SessionView {
    pub fn is_authorized(&self) -> bool {
        self.status == SessionStatus::Authorized
    }
}

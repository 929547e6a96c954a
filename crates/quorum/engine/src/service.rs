//! Authorization Service: the entry points a host application calls
//!
//! Owns every live session. Each session sits behind its own mutex so that
//! concurrent decisions on one session are serialized while unrelated
//! sessions proceed in parallel. Every status change is published once on
//! a broadcast channel, by the call that caused it.

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::credentials::{CredentialVerifier, TrustingVerifier};
use crate::events::{SessionEvent, SessionEventKind};
use crate::session::{AuthorizationSession, SessionView};
use crate::validator::ValidationResult;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use quorum_types::{
    AuthorizationModule, CredentialProof, DecisionError, DecisionResult, OfficerDecision,
    OfficerRole, SessionId, SessionStatus, SessionTransition,
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

type SessionHandle = Arc<Mutex<AuthorizationSession>>;

/// Result of an accepted decision
#[derive(Clone, Debug)]
pub struct DecisionReceipt {
    pub session: SessionView,
    /// Present only on the call that completed the quorum
    pub transition: Option<SessionTransition>,
}

impl DecisionReceipt {
    /// True exactly once per session: on the decision that authorized it
    pub fn became_authorized(&self) -> bool {
        matches!(self.transition, Some(t) if t.to == SessionStatus::Authorized)
    }
}

/// Coordinates officer approval sessions
pub struct AuthorizationService {
    config: EngineConfig,
    sessions: DashMap<SessionId, SessionHandle>,
    clock: Arc<dyn Clock>,
    verifier: Arc<dyn CredentialVerifier>,
    events: broadcast::Sender<SessionEvent>,
}

impl AuthorizationService {
    pub fn new(config: EngineConfig) -> Self {
        let (events, _) = broadcast::channel(config.events.channel_capacity.max(1));
        Self {
            config,
            sessions: DashMap::new(),
            clock: Arc::new(SystemClock),
            verifier: Arc::new(TrustingVerifier),
            events,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_verifier(mut self, verifier: Arc<dyn CredentialVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Receive every session event published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Open a new session for a gated action.
    ///
    /// `ttl` defaults to the configured window and must be positive and no
    /// longer than the configured maximum.
    pub fn create_session(
        &self,
        module: AuthorizationModule,
        action_description: impl Into<String>,
        initiator: OfficerRole,
        ttl: Option<Duration>,
    ) -> DecisionResult<SessionView> {
        let now = self.clock.now();
        let ttl = self.resolve_ttl(ttl, now)?;
        let session = AuthorizationSession::new(module, action_description, initiator, now, ttl);
        let view = session.view();

        info!(
            session_id = %session.id,
            module = %module,
            initiator = %initiator,
            required = view.required_count,
            expires_at = %session.expires_at,
            "Authorization session created"
        );

        self.publish(&session, SessionEventKind::Created { initiator }, now);
        self.sessions
            .insert(session.id.clone(), Arc::new(Mutex::new(session)));

        Ok(view)
    }

    /// Record an officer's decision.
    ///
    /// The proof is handed to the configured verifier and then dropped.
    pub fn submit_decision(
        &self,
        id: &SessionId,
        role: OfficerRole,
        decision: OfficerDecision,
        proof: &CredentialProof,
    ) -> DecisionResult<DecisionReceipt> {
        let handle = self.handle(id)?;

        if !self.verifier.verify(role, proof) {
            warn!(session_id = %id, role = %role, "Credential rejected");
            return Err(DecisionError::CredentialRejected(role));
        }

        let now = self.clock.now();
        let mut session = handle.lock();
        let before = session.status;

        match session.submit_decision(role, decision, now) {
            Ok(transition) => {
                let acting_for = session.entry(role).and_then(|e| e.acting_for);
                self.publish(
                    &session,
                    SessionEventKind::DecisionRecorded {
                        role,
                        decision,
                        acting_for,
                    },
                    now,
                );
                if let Some(t) = transition {
                    self.announce(&session, t);
                }
                Ok(DecisionReceipt {
                    session: session.view(),
                    transition,
                })
            }
            Err(err) => {
                warn!(session_id = %id, role = %role, error = %err, "Decision rejected");
                self.announce_expiry_if_new(&session, before, now);
                Err(err)
            }
        }
    }

    /// Record a decision for a role given by name, as entered by a user
    pub fn submit_named_decision(
        &self,
        id: &SessionId,
        role_name: &str,
        decision: OfficerDecision,
        proof: &CredentialProof,
    ) -> DecisionResult<DecisionReceipt> {
        let handle = self.handle(id)?;
        let role = match role_name.parse::<OfficerRole>() {
            Ok(role) => role,
            Err(_) => {
                let module = handle.lock().module;
                warn!(session_id = %id, role = role_name, "Unknown officer role");
                return Err(DecisionError::UnknownRoleForModule {
                    role: role_name.trim().to_string(),
                    module,
                });
            }
        };
        self.submit_decision(id, role, decision, proof)
    }

    /// Withdraw a role's decision from a pending session
    pub fn revoke_decision(
        &self,
        id: &SessionId,
        role: OfficerRole,
    ) -> DecisionResult<ValidationResult> {
        let handle = self.handle(id)?;
        let now = self.clock.now();
        let mut session = handle.lock();
        let before = session.status;

        match session.revoke_decision(role, now) {
            Ok(result) => {
                self.publish(&session, SessionEventKind::DecisionRevoked { role }, now);
                Ok(result)
            }
            Err(err) => {
                warn!(session_id = %id, role = %role, error = %err, "Revocation rejected");
                self.announce_expiry_if_new(&session, before, now);
                Err(err)
            }
        }
    }

    /// Current progress of a session. Expires it first if its window has
    /// elapsed.
    pub fn get_status(&self, id: &SessionId) -> DecisionResult<SessionView> {
        let handle = self.handle(id)?;
        let mut session = handle.lock();
        if let Some(t) = session.check_expiry(self.clock.now()) {
            self.announce(&session, t);
        }
        Ok(session.view())
    }

    /// Abandon a pending session
    pub fn cancel(&self, id: &SessionId) -> DecisionResult<SessionView> {
        let handle = self.handle(id)?;
        let now = self.clock.now();
        let mut session = handle.lock();
        let before = session.status;

        match session.cancel(now) {
            Ok(t) => {
                self.announce(&session, t);
                Ok(session.view())
            }
            Err(err) => {
                warn!(session_id = %id, error = %err, "Cancellation rejected");
                self.announce_expiry_if_new(&session, before, now);
                Err(err)
            }
        }
    }

    /// Expire one session if its window has elapsed
    pub fn check_expiry(&self, id: &SessionId) -> DecisionResult<Option<SessionTransition>> {
        let handle = self.handle(id)?;
        let mut session = handle.lock();
        let transition = session.check_expiry(self.clock.now());
        if let Some(t) = transition {
            self.announce(&session, t);
        }
        Ok(transition)
    }

    /// Snapshot of a session
    pub fn session(&self, id: &SessionId) -> Option<AuthorizationSession> {
        let handle = self.handle(id).ok()?;
        let snapshot = handle.lock().clone();
        Some(snapshot)
    }

    /// Sessions still collecting decisions
    pub fn pending_sessions(&self) -> Vec<SessionView> {
        self.sessions
            .iter()
            .filter_map(|entry| {
                let session = entry.value().lock();
                if session.status == SessionStatus::Pending {
                    Some(session.view())
                } else {
                    None
                }
            })
            .collect()
    }

    /// Expire every pending session whose window has elapsed
    pub fn expire_stale_sessions(&self) -> Vec<SessionId> {
        let now = self.clock.now();
        let mut expired = Vec::new();

        for entry in self.sessions.iter() {
            let mut session = entry.value().lock();
            if let Some(t) = session.check_expiry(now) {
                self.announce(&session, t);
                expired.push(session.id.clone());
            }
        }

        if !expired.is_empty() {
            info!(count = expired.len(), "Expired stale authorization sessions");
        }
        expired
    }

    /// Remove and return sessions that reached a terminal status
    pub fn archive_terminal(&self) -> Vec<AuthorizationSession> {
        let terminal: Vec<SessionId> = self
            .sessions
            .iter()
            .filter(|entry| entry.value().lock().status.is_terminal())
            .map(|entry| entry.key().clone())
            .collect();

        let archived: Vec<AuthorizationSession> = terminal
            .iter()
            .filter_map(|id| self.sessions.remove(id))
            .map(|(_, handle)| handle.lock().clone())
            .collect();

        debug!(count = archived.len(), "Archived terminal sessions");
        archived
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// The window must be positive, within the configured maximum, and end
    /// at a representable instant
    fn resolve_ttl(&self, ttl: Option<Duration>, now: DateTime<Utc>) -> DecisionResult<Duration> {
        let max_secs = self.config.session.max_ttl_secs;
        let ttl = ttl.unwrap_or_else(|| self.config.session.default_ttl());
        let secs = ttl.num_seconds();
        if ttl <= Duration::zero()
            || (secs as u64) > max_secs
            || now.checked_add_signed(ttl).is_none()
        {
            return Err(DecisionError::InvalidTtl { secs, max_secs });
        }
        Ok(ttl)
    }

    /// Clone the handle out so the map shard is released before the
    /// session lock is taken
    fn handle(&self, id: &SessionId) -> DecisionResult<SessionHandle> {
        self.sessions
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| DecisionError::SessionNotFound(id.clone()))
    }

    fn announce(&self, session: &AuthorizationSession, transition: SessionTransition) {
        if let Some(kind) = SessionEventKind::for_status(transition.to) {
            if transition.to == SessionStatus::Authorized {
                info!(
                    session_id = %session.id,
                    module = %session.module,
                    approvals = session.evaluate().authorized_count,
                    "Authorization session authorized"
                );
            } else {
                info!(
                    session_id = %session.id,
                    status = %transition.to,
                    "Authorization session closed"
                );
            }
            self.publish(session, kind, transition.at);
        }
    }

    fn announce_expiry_if_new(
        &self,
        session: &AuthorizationSession,
        before: SessionStatus,
        at: DateTime<Utc>,
    ) {
        if before == SessionStatus::Pending && session.status == SessionStatus::Expired {
            self.announce(
                session,
                SessionTransition {
                    from: before,
                    to: SessionStatus::Expired,
                    at,
                },
            );
        }
    }

    fn publish(&self, session: &AuthorizationSession, kind: SessionEventKind, at: DateTime<Utc>) {
        let _ = self.events.send(SessionEvent {
            session_id: session.id.clone(),
            module: session.module,
            kind,
            at,
        });
    }
}

impl Default for AuthorizationService {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::credentials::NonEmptyProofVerifier;
    use OfficerDecision::*;
    use OfficerRole::*;

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn service() -> (AuthorizationService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start()));
        let service = AuthorizationService::default().with_clock(clock.clone());
        (service, clock)
    }

    fn proof() -> CredentialProof {
        CredentialProof::none()
    }

    #[test]
    fn test_create_session_uses_default_ttl() {
        let (service, _) = service();
        let view = service
            .create_session(AuthorizationModule::Settings, "rename org", President, None)
            .unwrap();

        assert_eq!(view.status, SessionStatus::Pending);
        assert_eq!(view.created_at, start());
        assert_eq!(view.expires_at, start() + Duration::minutes(15));
        assert_eq!(view.required_count, 2);
        assert_eq!(service.session_count(), 1);
    }

    #[test]
    fn test_invalid_ttl() {
        let (service, _) = service();
        let err = service
            .create_session(
                AuthorizationModule::Settings,
                "x",
                President,
                Some(Duration::zero()),
            )
            .unwrap_err();
        assert!(matches!(err, DecisionError::InvalidTtl { secs: 0, .. }));

        let err = service
            .create_session(
                AuthorizationModule::Settings,
                "x",
                President,
                Some(Duration::days(2)),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            DecisionError::InvalidTtl {
                max_secs: 86_400,
                ..
            }
        ));
        assert_eq!(service.session_count(), 0);
    }

    #[test]
    fn test_unrepresentable_expiry_is_invalid_ttl() {
        let clock = Arc::new(ManualClock::new(start()));
        let mut config = EngineConfig::default();
        config.session.max_ttl_secs = u64::MAX;
        config.session.default_ttl_secs = u64::MAX;
        let service = AuthorizationService::new(config).with_clock(clock);

        let err = service
            .create_session(
                AuthorizationModule::Settings,
                "x",
                President,
                Some(Duration::seconds(10_000_000_000_000)),
            )
            .unwrap_err();
        assert!(matches!(err, DecisionError::InvalidTtl { .. }));

        let err = service
            .create_session(AuthorizationModule::Settings, "x", President, None)
            .unwrap_err();
        assert!(matches!(err, DecisionError::InvalidTtl { .. }));
        assert_eq!(service.session_count(), 0);
    }

    #[test]
    fn test_submit_until_authorized() {
        let (service, _) = service();
        let id = service
            .create_session(AuthorizationModule::Settings, "rotate keys", President, None)
            .unwrap()
            .id;

        let first = service
            .submit_decision(&id, President, Approved, &proof())
            .unwrap();
        assert!(!first.became_authorized());
        assert_eq!(
            first.session.unmet_requirements,
            vec![
                "need 1 more approvals".to_string(),
                "Secretary or Assistant Secretary required".to_string(),
            ]
        );

        let second = service
            .submit_decision(&id, AssistantSecretary, Approved, &proof())
            .unwrap();
        assert!(second.became_authorized());
        assert!(second.session.is_authorized());
    }

    #[test]
    fn test_unknown_session() {
        let (service, _) = service();
        let missing = SessionId::new("missing");
        assert_eq!(
            service.get_status(&missing).unwrap_err(),
            DecisionError::SessionNotFound(missing.clone())
        );
        assert!(service.session(&missing).is_none());
    }

    #[test]
    fn test_credential_rejected() {
        let (service, _) = service();
        let service = service.with_verifier(Arc::new(NonEmptyProofVerifier));
        let id = service
            .create_session(AuthorizationModule::Settings, "x", President, None)
            .unwrap()
            .id;

        let err = service
            .submit_decision(&id, President, Approved, &CredentialProof::none())
            .unwrap_err();
        assert_eq!(err, DecisionError::CredentialRejected(President));
        assert!(service.session(&id).unwrap().participants.is_empty());

        service
            .submit_decision(&id, President, Approved, &CredentialProof::new(b"pw".to_vec()))
            .unwrap();
    }

    #[test]
    fn test_named_decision() {
        let (service, _) = service();
        let id = service
            .create_session(AuthorizationModule::Content, "post", Secretary, None)
            .unwrap()
            .id;

        service
            .submit_named_decision(&id, "Secretary", Approved, &proof())
            .unwrap();
        let receipt = service
            .submit_named_decision(&id, "pro", Approved, &proof())
            .unwrap();
        assert!(receipt.became_authorized());

        let id = service
            .create_session(AuthorizationModule::Content, "post", Secretary, None)
            .unwrap()
            .id;
        let err = service
            .submit_named_decision(&id, "Janitor", Approved, &proof())
            .unwrap_err();
        assert_eq!(
            err,
            DecisionError::UnknownRoleForModule {
                role: "Janitor".to_string(),
                module: AuthorizationModule::Content,
            }
        );
    }

    #[test]
    fn test_get_status_expires_lazily() {
        let (service, clock) = service();
        let id = service
            .create_session(AuthorizationModule::Members, "add member", Secretary, None)
            .unwrap()
            .id;

        clock.advance(Duration::minutes(15));
        assert_eq!(service.get_status(&id).unwrap().status, SessionStatus::Pending);

        clock.advance(Duration::seconds(1));
        let view = service.get_status(&id).unwrap();
        assert_eq!(view.status, SessionStatus::Expired);
        assert_eq!(view.completed_at, Some(clock.now()));
    }

    #[test]
    fn test_cancel_and_archive() {
        let (service, _) = service();
        let cancelled = service
            .create_session(AuthorizationModule::Members, "a", Secretary, None)
            .unwrap()
            .id;
        let pending = service
            .create_session(AuthorizationModule::Members, "b", Secretary, None)
            .unwrap()
            .id;

        let view = service.cancel(&cancelled).unwrap();
        assert_eq!(view.status, SessionStatus::Cancelled);
        assert!(matches!(
            service.cancel(&cancelled),
            Err(DecisionError::InvalidTransition { .. })
        ));

        let open: Vec<SessionId> = service.pending_sessions().into_iter().map(|v| v.id).collect();
        assert_eq!(open, vec![pending.clone()]);

        let archived = service.archive_terminal();
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].id, cancelled);
        assert_eq!(service.session_count(), 1);
    }

    #[test]
    fn test_expire_stale_sessions() {
        let (service, clock) = service();
        let short = service
            .create_session(
                AuthorizationModule::Members,
                "a",
                Secretary,
                Some(Duration::minutes(1)),
            )
            .unwrap()
            .id;
        service
            .create_session(AuthorizationModule::Members, "b", Secretary, None)
            .unwrap();

        clock.advance(Duration::minutes(2));
        assert_eq!(service.expire_stale_sessions(), vec![short.clone()]);
        assert!(service.expire_stale_sessions().is_empty());
        assert_eq!(service.check_expiry(&short).unwrap(), None);
    }

    #[test]
    fn test_revoke_publishes_event() {
        let (service, _) = service();
        let id = service
            .create_session(AuthorizationModule::Finances, "pay", Treasurer, None)
            .unwrap()
            .id;
        service
            .submit_decision(&id, Treasurer, Approved, &proof())
            .unwrap();

        let mut events = service.subscribe();
        let result = service.revoke_decision(&id, Treasurer).unwrap();
        assert_eq!(result.authorized_count, 0);

        let event = events.try_recv().unwrap();
        assert_eq!(event.session_id, id);
        assert_eq!(event.kind, SessionEventKind::DecisionRevoked { role: Treasurer });
    }
}

//! Scenario replay
//!
//! A scenario is a JSON file naming the module, initiator and an ordered
//! list of steps. Steps run against an in-process service on a manual
//! clock, so expiry is reproducible:
//!
//! ```json
//! {
//!   "module": "finances",
//!   "action": "Transfer 500 to venue deposit",
//!   "initiator": "treasurer",
//!   "ttl_secs": 900,
//!   "steps": [
//!     { "op": "decide", "role": "treasurer" },
//!     { "op": "advance", "secs": 60 },
//!     { "op": "decide", "role": "president", "decision": "approved" }
//!   ]
//! }
//! ```

use crate::error::{CliError, CliResult};
use crate::output::{print_json, print_rows, print_success, print_warning, status_label, OutputFormat};
use chrono::{DateTime, Duration, Utc};
use colored::Colorize;
use quorum_engine::{
    AuthorizationService, Clock, EngineConfig, ManualClock, SessionEvent, SessionView,
};
use quorum_types::{
    AuthorizationModule, CredentialProof, DecisionError, OfficerDecision, OfficerRole, SessionId,
    SessionStatus,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tabled::Tabled;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::debug;

/// A scripted authorization session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub module: AuthorizationModule,
    #[serde(default)]
    pub action: String,
    pub initiator: OfficerRole,
    /// Falls back to the configured default
    #[serde(default)]
    pub ttl_secs: Option<i64>,
    /// Clock start; now if absent
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    pub steps: Vec<ScenarioStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// An officer decides; the role is given by name
    Decide {
        role: String,
        #[serde(default = "default_decision")]
        decision: OfficerDecision,
    },
    Revoke {
        role: String,
    },
    Cancel,
    /// Move the clock forward
    Advance {
        secs: i64,
    },
    /// Read the status, which applies expiry
    Check,
}

fn default_decision() -> OfficerDecision {
    OfficerDecision::Approved
}

impl std::fmt::Display for ScenarioStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioStep::Decide { role, decision } => write!(f, "{} {}", role, decision),
            ScenarioStep::Revoke { role } => write!(f, "revoke {}", role),
            ScenarioStep::Cancel => write!(f, "cancel"),
            ScenarioStep::Advance { secs } => write!(f, "advance {}s", secs),
            ScenarioStep::Check => write!(f, "check"),
        }
    }
}

/// What one step did to the session
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct StepReport {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Step")]
    pub step: String,
    #[tabled(rename = "At")]
    pub at: DateTime<Utc>,
    #[tabled(rename = "Outcome")]
    pub outcome: String,
    #[tabled(rename = "Status")]
    pub status: SessionStatus,
    #[tabled(rename = "Approvals")]
    pub approvals: String,
}

/// Full replay result
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub steps: Vec<StepReport>,
    pub session: SessionView,
    pub events: Vec<SessionEvent>,
}

impl Scenario {
    pub fn from_file(path: impl AsRef<Path>) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Run every step of a scenario against a fresh service
pub fn replay(scenario: &Scenario, config: EngineConfig) -> CliResult<SimulationReport> {
    let clock = Arc::new(ManualClock::new(scenario.start.unwrap_or_else(Utc::now)));
    let service = AuthorizationService::new(config).with_clock(clock.clone());
    let mut events = service.subscribe();

    let action = if scenario.action.is_empty() {
        format!("{} action", scenario.module)
    } else {
        scenario.action.clone()
    };
    let ttl = match scenario.ttl_secs {
        Some(secs) => Some(Duration::try_seconds(secs).ok_or_else(|| {
            CliError::Scenario(format!("ttl_secs {} is out of range", secs))
        })?),
        None => None,
    };
    let id = service
        .create_session(scenario.module, action, scenario.initiator, ttl)?
        .id;

    let mut steps = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.iter().enumerate() {
        let outcome = match apply(&service, &clock, &id, step)? {
            Ok(outcome) => outcome,
            Err(err) => err.to_string(),
        };
        let view = snapshot(&service, &id)?;
        debug!(index, step = %step, outcome = %outcome, "Scenario step applied");

        steps.push(StepReport {
            index: index + 1,
            step: step.to_string(),
            at: clock.now(),
            outcome,
            status: view.status,
            approvals: format!("{}/{}", view.authorized_count, view.required_count),
        });
    }

    let session = service.get_status(&id)?;
    Ok(SimulationReport {
        steps,
        session,
        events: drain(&mut events),
    })
}

/// Apply one step. The outer error aborts the replay; the inner one is an
/// engine rejection recorded as the step's outcome.
fn apply(
    service: &AuthorizationService,
    clock: &ManualClock,
    id: &SessionId,
    step: &ScenarioStep,
) -> CliResult<Result<String, DecisionError>> {
    let proof = CredentialProof::none();
    let outcome = match step {
        ScenarioStep::Decide { role, decision } => service
            .submit_named_decision(id, role, *decision, &proof)
            .map(|receipt| {
                if receipt.became_authorized() {
                    "recorded, authorized".to_string()
                } else {
                    "recorded".to_string()
                }
            }),
        ScenarioStep::Revoke { role } => role
            .parse::<OfficerRole>()
            .and_then(|role| service.revoke_decision(id, role))
            .map(|_| "revoked".to_string()),
        ScenarioStep::Cancel => service.cancel(id).map(|_| "cancelled".to_string()),
        ScenarioStep::Advance { secs } => {
            if *secs < 0 {
                return Err(CliError::Scenario(format!(
                    "cannot advance the clock by {}s",
                    secs
                )));
            }
            Duration::try_seconds(*secs)
                .and_then(|by| clock.advance(by))
                .ok_or_else(|| {
                    CliError::Scenario(format!("cannot advance the clock by {}s", secs))
                })?;
            Ok("clock advanced".to_string())
        }
        ScenarioStep::Check => service.get_status(id).map(|view| view.status.to_string()),
    };
    Ok(outcome)
}

fn snapshot(service: &AuthorizationService, id: &SessionId) -> CliResult<SessionView> {
    service
        .session(id)
        .map(|session| session.view())
        .ok_or_else(|| CliError::Decision(DecisionError::SessionNotFound(id.clone())))
}

fn drain(events: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut drained = Vec::new();
    loop {
        match events.try_recv() {
            Ok(event) => drained.push(event),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    drained
}

/// Execute `simulate`
pub fn execute(path: &Path, config: EngineConfig, format: OutputFormat) -> CliResult<()> {
    let scenario = Scenario::from_file(path)?;
    let report = replay(&scenario, config)?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => {
            let session = &report.session;
            println!(
                "{} {} ({}) initiated by {}",
                "Session:".bold(),
                session.module,
                session.action_description,
                session.initiator
            );
            print_rows(report.steps.clone(), format)?;
            println!(
                "{} {} with {} of {} approvals",
                "Final:".bold(),
                status_label(session.status),
                session.authorized_count,
                session.required_count
            );
            for message in &session.unmet_requirements {
                println!("  - {}", message);
            }
            if session.is_authorized() {
                print_success("Action authorized");
            } else {
                print_warning("Action not authorized");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn scenario(json: &str) -> Scenario {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_replay_until_authorized() {
        let scenario = scenario(
            r#"{
                "module": "finances",
                "action": "Transfer 500",
                "initiator": "treasurer",
                "start": "2026-03-01T09:00:00Z",
                "steps": [
                    { "op": "decide", "role": "treasurer" },
                    { "op": "decide", "role": "Secretary" },
                    { "op": "advance", "secs": 30 },
                    { "op": "decide", "role": "president" },
                    { "op": "decide", "role": "vp" }
                ]
            }"#,
        );

        let report = replay(&scenario, EngineConfig::default()).unwrap();
        assert_eq!(report.steps.len(), 5);
        assert_eq!(report.steps[0].approvals, "1/4");
        assert_eq!(report.steps[3].outcome, "recorded, authorized");
        assert_eq!(report.steps[3].at, start() + Duration::seconds(30));
        assert_eq!(report.steps[4].status, SessionStatus::Authorized);
        assert!(report.steps[4].outcome.contains("closed"));
        assert!(report.session.is_authorized());
        assert!(report
            .events
            .iter()
            .any(|e| e.kind == quorum_engine::SessionEventKind::Authorized));
    }

    #[test]
    fn test_replay_expiry() {
        let scenario = scenario(
            r#"{
                "module": "members",
                "initiator": "secretary",
                "ttl_secs": 60,
                "steps": [
                    { "op": "decide", "role": "president" },
                    { "op": "advance", "secs": 61 },
                    { "op": "decide", "role": "secretary", "decision": "approved" },
                    { "op": "check" }
                ]
            }"#,
        );

        let report = replay(&scenario, EngineConfig::default()).unwrap();
        assert_eq!(report.steps[2].status, SessionStatus::Expired);
        assert!(report.steps[2].outcome.contains("expired"));
        assert_eq!(report.steps[3].outcome, "expired");
        assert_eq!(report.session.status, SessionStatus::Expired);
    }

    #[test]
    fn test_unknown_role_is_recorded_not_fatal() {
        let scenario = scenario(
            r#"{
                "module": "content",
                "initiator": "secretary",
                "steps": [
                    { "op": "decide", "role": "janitor" },
                    { "op": "revoke", "role": "secretary" },
                    { "op": "cancel" }
                ]
            }"#,
        );

        let report = replay(&scenario, EngineConfig::default()).unwrap();
        assert_eq!(report.steps[0].outcome, "janitor cannot decide on content actions");
        assert_eq!(
            report.steps[1].outcome,
            DecisionError::DecisionNotFound(OfficerRole::Secretary).to_string()
        );
        assert_eq!(report.steps[2].status, SessionStatus::Cancelled);
    }

    #[test]
    fn test_negative_advance_aborts() {
        let scenario = scenario(
            r#"{
                "module": "settings",
                "initiator": "president",
                "steps": [{ "op": "advance", "secs": -5 }]
            }"#,
        );
        assert!(matches!(
            replay(&scenario, EngineConfig::default()),
            Err(CliError::Scenario(_))
        ));
    }

    #[test]
    fn test_out_of_range_durations_abort() {
        let ttl = scenario(
            r#"{ "module": "settings", "initiator": "president",
                 "ttl_secs": 9223372036854775807, "steps": [] }"#,
        );
        assert!(matches!(
            replay(&ttl, EngineConfig::default()),
            Err(CliError::Scenario(_))
        ));

        let advance = scenario(
            r#"{ "module": "settings", "initiator": "president",
                 "steps": [{ "op": "advance", "secs": 9223372036854775807 }] }"#,
        );
        assert!(matches!(
            replay(&advance, EngineConfig::default()),
            Err(CliError::Scenario(_))
        ));
    }

    #[test]
    fn test_invalid_ttl_aborts() {
        let scenario = scenario(
            r#"{ "module": "settings", "initiator": "president", "ttl_secs": 0, "steps": [] }"#,
        );
        assert!(matches!(
            replay(&scenario, EngineConfig::default()),
            Err(CliError::Decision(DecisionError::InvalidTtl { .. }))
        ));
    }
}

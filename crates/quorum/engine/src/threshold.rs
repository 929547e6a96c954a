//! Threshold Resolver: how many approvals a session actually needs
//!
//! The static base quorum is adjusted in two stages, always in this order:
//!
//! 1. Module-specific: under [`ModulePolicy::PrincipalEscalation`] the
//!    quorum rises to 4 when the President neither initiated nor approved,
//!    and settles at 3 once the President approves.
//! 2. Substitute-driven: in modules that demand the Legal Adviser when a
//!    substitute acts, any approving substitute lifts the quorum to at
//!    least 4. This stage only ever raises the number.
//!
//! Resolution is a pure function of its inputs and is re-run after every
//! decision, so the required count can never drift from the approved set.

use quorum_types::{rules_for, AuthorizationModule, ModulePolicy, OfficerRole};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Quorum when the principal officer is absent from initiation and approval
pub const PRINCIPAL_ABSENT_QUORUM: u32 = 4;
/// Quorum once the principal officer has approved
pub const PRINCIPAL_APPROVED_QUORUM: u32 = 3;
/// Floor applied whenever a substitute approves in an escalating module
pub const SUBSTITUTE_QUORUM_FLOOR: u32 = 4;

/// Why the required count has its current value. Diagnostic only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuorumReason {
    /// The module's base quorum, unadjusted
    Base { quorum: u32 },
    /// The President neither initiated nor approved
    PrincipalAbsent,
    /// The President approved
    PrincipalApproved,
    /// A substitute approved in place of its principal
    SubstituteActing { substitute: OfficerRole },
}

impl std::fmt::Display for QuorumReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuorumReason::Base { quorum } => write!(f, "base quorum of {}", quorum),
            QuorumReason::PrincipalAbsent => {
                write!(f, "President neither initiated nor approved; quorum escalated")
            }
            QuorumReason::PrincipalApproved => write!(f, "President approved"),
            QuorumReason::SubstituteActing { substitute } => {
                write!(f, "{} acting as substitute; quorum escalated", substitute)
            }
        }
    }
}

/// The resolved approval threshold for a session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedQuorum {
    pub required: u32,
    pub reason: QuorumReason,
}

/// Compute the number of approvals required right now
pub fn resolve_quorum(
    module: AuthorizationModule,
    initiator: OfficerRole,
    approved: &BTreeSet<OfficerRole>,
) -> ResolvedQuorum {
    let rules = rules_for(module);
    let mut resolved = ResolvedQuorum {
        required: rules.base_quorum,
        reason: QuorumReason::Base {
            quorum: rules.base_quorum,
        },
    };

    if rules.policy == ModulePolicy::PrincipalEscalation {
        let president_approved = approved.contains(&OfficerRole::President);
        if initiator != OfficerRole::President && !president_approved {
            resolved = ResolvedQuorum {
                required: PRINCIPAL_ABSENT_QUORUM,
                reason: QuorumReason::PrincipalAbsent,
            };
        } else if president_approved {
            resolved = ResolvedQuorum {
                required: PRINCIPAL_APPROVED_QUORUM,
                reason: QuorumReason::PrincipalApproved,
            };
        }
    }

    if rules.requires_legal_adviser_if_substitute_acts {
        if let Some(substitute) = approved.iter().find(|r| r.is_substitute()) {
            if resolved.required < SUBSTITUTE_QUORUM_FLOOR {
                resolved = ResolvedQuorum {
                    required: SUBSTITUTE_QUORUM_FLOOR,
                    reason: QuorumReason::SubstituteActing {
                        substitute: *substitute,
                    },
                };
            }
        }
    }

    resolved
}

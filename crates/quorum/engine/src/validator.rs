//! Validator: decides whether a set of decisions satisfies a module's policy
//!
//! Pure and deterministic: given the module, the initiator and the recorded
//! entries it always yields the same [`ValidationResult`]. Sessions re-run
//! it after every decision event instead of keeping incremental counters.

use crate::threshold::{resolve_quorum, QuorumReason};
use quorum_types::{
    rules_for, AuthorizationModule, ModulePolicy, OfficerEntry, OfficerRole,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One requirement the current approvals do not yet meet
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnmetRequirement {
    /// Fewer approvals than the resolved quorum
    MoreApprovals { needed: u32 },
    /// A mandatory role (or its substitute) has not approved
    RoleRequired { role: OfficerRole },
    /// No member of an alternative group has approved
    OneOf { roles: Vec<OfficerRole> },
    /// A substitute acted and the Legal Adviser has not approved
    LegalAdviserForSubstitute,
    /// Neither Secretary+PRO nor President plus one of them approved
    PublicationPair,
}

impl std::fmt::Display for UnmetRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnmetRequirement::MoreApprovals { needed } => {
                write!(f, "need {} more approvals", needed)
            }
            UnmetRequirement::RoleRequired { role } => write!(f, "{} required", role),
            UnmetRequirement::OneOf { roles } => {
                let titles: Vec<&str> = roles.iter().map(|r| r.title()).collect();
                write!(f, "{} required", titles.join(" or "))
            }
            UnmetRequirement::LegalAdviserForSubstitute => {
                write!(f, "Legal Adviser required (substitute acting)")
            }
            UnmetRequirement::PublicationPair => {
                write!(f, "need Secretary+PRO, or President plus one of them")
            }
        }
    }
}

/// Outcome of validating a session's decisions against its module policy
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Distinct approving roles
    pub authorized_count: u32,
    /// Resolved quorum for the current approvals
    pub required_count: u32,
    pub reason: QuorumReason,
    /// In evaluation order: count, required roles, groups, legal adviser,
    /// publication pair
    pub unmet_requirements: Vec<UnmetRequirement>,
}

impl ValidationResult {
    /// Unmet requirements rendered as messages
    pub fn messages(&self) -> Vec<String> {
        self.unmet_requirements.iter().map(|u| u.to_string()).collect()
    }
}

/// Roles whose recorded decision is an approval
pub fn approved_roles(entries: &[OfficerEntry]) -> BTreeSet<OfficerRole> {
    entries
        .iter()
        .filter(|e| e.is_approval())
        .map(|e| e.role)
        .collect()
}

/// Validate recorded decisions against the module policy
pub fn validate(
    module: AuthorizationModule,
    initiator: OfficerRole,
    entries: &[OfficerEntry],
) -> ValidationResult {
    let rules = rules_for(module);
    let approved = approved_roles(entries);
    let has_substitute = approved.iter().any(|r| r.is_substitute());
    let quorum = resolve_quorum(module, initiator, &approved);
    let authorized_count = approved.len() as u32;

    let mut unmet = Vec::new();

    if authorized_count < quorum.required {
        unmet.push(UnmetRequirement::MoreApprovals {
            needed: quorum.required - authorized_count,
        });
    }

    for role in rules.required_roles {
        let covered = approved.contains(role)
            || role.substitute().is_some_and(|s| approved.contains(&s));
        if !covered {
            unmet.push(UnmetRequirement::RoleRequired { role: *role });
        }
    }

    for group in rules.alternative_groups {
        if !group.iter().any(|r| approved.contains(r)) {
            unmet.push(UnmetRequirement::OneOf {
                roles: group.to_vec(),
            });
        }
    }

    if has_substitute
        && rules.requires_legal_adviser_if_substitute_acts
        && !approved.contains(&OfficerRole::LegalAdviser)
    {
        unmet.push(UnmetRequirement::LegalAdviserForSubstitute);
    }

    if rules.policy == ModulePolicy::PublicationPair {
        let has_secretary = approved.contains(&OfficerRole::Secretary);
        let has_pro = approved.contains(&OfficerRole::PublicitySecretary);
        let has_president = approved.contains(&OfficerRole::President);
        let pair = has_secretary && has_pro;
        let presidential = has_president && (has_secretary || has_pro);
        if !(pair || presidential) {
            unmet.push(UnmetRequirement::PublicationPair);
        }
    }

    let is_valid = unmet.is_empty() && authorized_count >= quorum.required;

    ValidationResult {
        is_valid,
        authorized_count,
        required_count: quorum.required,
        reason: quorum.reason,
        unmet_requirements: unmet,
    }
}

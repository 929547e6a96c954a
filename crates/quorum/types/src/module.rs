//! Module Rule Table: per-module approval policy
//!
//! Each authorization module maps to exactly one immutable [`ModuleRules`]
//! record. The table is a `match` over a closed enum so that adding a
//! module without a policy fails to compile.

use crate::{DecisionError, OfficerRole};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::OfficerRole::*;

/// A category of sensitive administrative action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationModule {
    /// Membership changes
    Members,
    /// Fund transfers
    Finances,
    /// Election operations
    Elections,
    /// Content publication
    Content,
    /// Leadership changes
    Leadership,
    /// Settings changes
    Settings,
}

impl AuthorizationModule {
    pub const ALL: [AuthorizationModule; 6] = [
        AuthorizationModule::Members,
        AuthorizationModule::Finances,
        AuthorizationModule::Elections,
        AuthorizationModule::Content,
        AuthorizationModule::Leadership,
        AuthorizationModule::Settings,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AuthorizationModule::Members => "members",
            AuthorizationModule::Finances => "finances",
            AuthorizationModule::Elections => "elections",
            AuthorizationModule::Content => "content",
            AuthorizationModule::Leadership => "leadership",
            AuthorizationModule::Settings => "settings",
        }
    }

    /// The static policy for this module
    pub fn rules(&self) -> &'static ModuleRules {
        rules_for(*self)
    }
}

impl std::fmt::Display for AuthorizationModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for AuthorizationModule {
    type Err = DecisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        AuthorizationModule::ALL
            .into_iter()
            .find(|m| m.label() == wanted)
            .ok_or_else(|| DecisionError::UnknownModule(s.trim().to_string()))
    }
}

/// Module-specific escape hatch layered over the generic rules
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModulePolicy {
    /// Generic required-roles / alternative-groups evaluation only
    Standard,
    /// May proceed without the President approving, at a higher quorum
    PrincipalEscalation,
    /// Secretary plus Publicity Secretary, or President plus either of them
    PublicationPair,
}

/// The static approval policy of one module
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModuleRules {
    /// Unconditionally mandatory, unless the role's substitute approves
    pub required_roles: &'static [OfficerRole],
    /// Each group needs at least one approving member
    pub alternative_groups: &'static [&'static [OfficerRole]],
    /// May top up the count, never individually mandatory
    pub auxiliary_roles: &'static [OfficerRole],
    /// Nominal approvals required before module-specific adjustment
    pub base_quorum: u32,
    pub requires_legal_adviser_if_substitute_acts: bool,
    pub policy: ModulePolicy,
}

impl ModuleRules {
    /// Whether `role` may take part in a session of this module.
    ///
    /// Eligible roles are the required roles and their substitutes, the
    /// alternative group members, and the auxiliary roles. Every other role
    /// is turned away with `UnknownRoleForModule`, so the auxiliary list is
    /// the closed set of optional approvers, not only a hint for counting.
    pub fn is_eligible(&self, role: OfficerRole) -> bool {
        self.required_roles
            .iter()
            .any(|r| *r == role || r.substitute() == Some(role))
            || self
                .alternative_groups
                .iter()
                .any(|group| group.contains(&role))
            || self.auxiliary_roles.contains(&role)
    }

    /// Eligible roles in rank order
    pub fn eligible_roles(&self) -> Vec<OfficerRole> {
        OfficerRole::ALL
            .into_iter()
            .filter(|r| self.is_eligible(*r))
            .collect()
    }
}

static MEMBERS: ModuleRules = ModuleRules {
    required_roles: &[President, Secretary],
    alternative_groups: &[],
    auxiliary_roles: &[
        VicePresident,
        AssistantSecretary,
        Treasurer,
        FinancialSecretary,
        PublicitySecretary,
        DirectorOfSocials,
        LegalAdviser,
    ],
    base_quorum: 3,
    requires_legal_adviser_if_substitute_acts: true,
    policy: ModulePolicy::Standard,
};

static FINANCES: ModuleRules = ModuleRules {
    required_roles: &[],
    alternative_groups: &[&[Treasurer, FinancialSecretary]],
    auxiliary_roles: &[
        President,
        VicePresident,
        Secretary,
        AssistantSecretary,
        LegalAdviser,
    ],
    base_quorum: 3,
    requires_legal_adviser_if_substitute_acts: true,
    policy: ModulePolicy::PrincipalEscalation,
};

static ELECTIONS: ModuleRules = ModuleRules {
    required_roles: &[President, Secretary],
    alternative_groups: &[&[PublicitySecretary, DirectorOfSocials]],
    auxiliary_roles: &[VicePresident, AssistantSecretary, Treasurer, LegalAdviser],
    base_quorum: 3,
    requires_legal_adviser_if_substitute_acts: true,
    policy: ModulePolicy::Standard,
};

static CONTENT: ModuleRules = ModuleRules {
    required_roles: &[],
    alternative_groups: &[],
    auxiliary_roles: &[
        President,
        VicePresident,
        Secretary,
        AssistantSecretary,
        PublicitySecretary,
        DirectorOfSocials,
    ],
    base_quorum: 2,
    requires_legal_adviser_if_substitute_acts: false,
    policy: ModulePolicy::PublicationPair,
};

static LEADERSHIP: ModuleRules = ModuleRules {
    required_roles: &[President, Secretary, LegalAdviser],
    alternative_groups: &[&[Treasurer, FinancialSecretary]],
    auxiliary_roles: &[
        VicePresident,
        AssistantSecretary,
        PublicitySecretary,
        DirectorOfSocials,
    ],
    base_quorum: 4,
    requires_legal_adviser_if_substitute_acts: true,
    policy: ModulePolicy::Standard,
};

static SETTINGS: ModuleRules = ModuleRules {
    required_roles: &[President],
    alternative_groups: &[&[Secretary, AssistantSecretary]],
    auxiliary_roles: &[VicePresident, Treasurer, FinancialSecretary, LegalAdviser],
    base_quorum: 2,
    requires_legal_adviser_if_substitute_acts: false,
    policy: ModulePolicy::Standard,
};

/// Look up the static policy for a module. Total over the enum.
pub fn rules_for(module: AuthorizationModule) -> &'static ModuleRules {
    match module {
        AuthorizationModule::Members => &MEMBERS,
        AuthorizationModule::Finances => &FINANCES,
        AuthorizationModule::Elections => &ELECTIONS,
        AuthorizationModule::Content => &CONTENT,
        AuthorizationModule::Leadership => &LEADERSHIP,
        AuthorizationModule::Settings => &SETTINGS,
    }
}

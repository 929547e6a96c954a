//! Role Registry: officer roles and the substitution map
//!
//! Roles are a closed set. Three of them are principals with exactly one
//! substitute each; a substitute may approve in the principal's place when
//! the principal is unavailable. A role is a principal, a substitute, or
//! neither, never both.

use crate::DecisionError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A named administrative position eligible to approve gated actions
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfficerRole {
    President,
    VicePresident,
    Secretary,
    AssistantSecretary,
    Treasurer,
    FinancialSecretary,
    PublicitySecretary,
    DirectorOfSocials,
    LegalAdviser,
}

impl OfficerRole {
    /// Every role, in hierarchy order
    pub const ALL: [OfficerRole; 9] = [
        OfficerRole::President,
        OfficerRole::VicePresident,
        OfficerRole::Secretary,
        OfficerRole::AssistantSecretary,
        OfficerRole::Treasurer,
        OfficerRole::FinancialSecretary,
        OfficerRole::PublicitySecretary,
        OfficerRole::DirectorOfSocials,
        OfficerRole::LegalAdviser,
    ];

    /// Display title
    pub fn title(&self) -> &'static str {
        match self {
            OfficerRole::President => "President",
            OfficerRole::VicePresident => "Vice President",
            OfficerRole::Secretary => "Secretary",
            OfficerRole::AssistantSecretary => "Assistant Secretary",
            OfficerRole::Treasurer => "Treasurer",
            OfficerRole::FinancialSecretary => "Financial Secretary",
            OfficerRole::PublicitySecretary => "Publicity Secretary",
            OfficerRole::DirectorOfSocials => "Director of Socials",
            OfficerRole::LegalAdviser => "Legal Adviser",
        }
    }

    /// Hierarchy rank, 1 being the most senior.
    ///
    /// Only used for ordering in listings; validation never looks at it.
    pub fn rank(&self) -> u8 {
        match self {
            OfficerRole::President => 1,
            OfficerRole::VicePresident => 2,
            OfficerRole::Secretary => 3,
            OfficerRole::AssistantSecretary => 4,
            OfficerRole::Treasurer => 5,
            OfficerRole::FinancialSecretary => 6,
            OfficerRole::PublicitySecretary => 7,
            OfficerRole::DirectorOfSocials => 8,
            OfficerRole::LegalAdviser => 9,
        }
    }

    /// The substitute empowered to act for this role, if it is a principal
    pub fn substitute(&self) -> Option<OfficerRole> {
        match self {
            OfficerRole::President => Some(OfficerRole::VicePresident),
            OfficerRole::Secretary => Some(OfficerRole::AssistantSecretary),
            OfficerRole::Treasurer => Some(OfficerRole::FinancialSecretary),
            _ => None,
        }
    }

    /// The principal this role stands in for, if it is a substitute
    pub fn principal_for(&self) -> Option<OfficerRole> {
        match self {
            OfficerRole::VicePresident => Some(OfficerRole::President),
            OfficerRole::AssistantSecretary => Some(OfficerRole::Secretary),
            OfficerRole::FinancialSecretary => Some(OfficerRole::Treasurer),
            _ => None,
        }
    }

    pub fn is_substitute(&self) -> bool {
        self.principal_for().is_some()
    }

    pub fn is_principal(&self) -> bool {
        self.substitute().is_some()
    }

    /// Snake-case identifier, matching the serde representation
    pub fn key(&self) -> &'static str {
        match self {
            OfficerRole::President => "president",
            OfficerRole::VicePresident => "vice_president",
            OfficerRole::Secretary => "secretary",
            OfficerRole::AssistantSecretary => "assistant_secretary",
            OfficerRole::Treasurer => "treasurer",
            OfficerRole::FinancialSecretary => "financial_secretary",
            OfficerRole::PublicitySecretary => "publicity_secretary",
            OfficerRole::DirectorOfSocials => "director_of_socials",
            OfficerRole::LegalAdviser => "legal_adviser",
        }
    }
}

impl std::fmt::Display for OfficerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

impl FromStr for OfficerRole {
    type Err = DecisionError;

    /// Accepts snake_case keys or display titles, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "vp" => return Ok(OfficerRole::VicePresident),
            "pro" => return Ok(OfficerRole::PublicitySecretary),
            _ => {}
        }

        OfficerRole::ALL
            .into_iter()
            .find(|role| role.key() == normalized)
            .ok_or_else(|| DecisionError::UnknownRole(s.trim().to_string()))
    }
}

//! Module rule table listing

use crate::error::CliResult;
use crate::output::{join_titles, print_rows, OutputFormat};
use quorum_types::{AuthorizationModule, ModulePolicy};
use serde::Serialize;
use tabled::Tabled;

/// One module's approval policy for display
#[derive(Debug, Serialize, Tabled)]
pub struct RuleRow {
    #[tabled(rename = "Module")]
    pub module: AuthorizationModule,
    #[tabled(rename = "Base")]
    pub base_quorum: u32,
    #[tabled(rename = "Required")]
    pub required: String,
    #[tabled(rename = "One of")]
    pub alternatives: String,
    #[tabled(rename = "Auxiliary")]
    pub auxiliary: String,
    #[tabled(rename = "LA if substitute")]
    pub legal_adviser_if_substitute: bool,
    #[tabled(rename = "Policy")]
    pub policy: &'static str,
}

impl From<AuthorizationModule> for RuleRow {
    fn from(module: AuthorizationModule) -> Self {
        let rules = module.rules();
        let alternatives = if rules.alternative_groups.is_empty() {
            "-".to_string()
        } else {
            rules
                .alternative_groups
                .iter()
                .map(|group| format!("[{}]", join_titles(group.iter())))
                .collect::<Vec<_>>()
                .join(" ")
        };

        Self {
            module,
            base_quorum: rules.base_quorum,
            required: join_titles(rules.required_roles.iter()),
            alternatives,
            auxiliary: join_titles(rules.auxiliary_roles.iter()),
            legal_adviser_if_substitute: rules.requires_legal_adviser_if_substitute_acts,
            policy: policy_label(rules.policy),
        }
    }
}

fn policy_label(policy: ModulePolicy) -> &'static str {
    match policy {
        ModulePolicy::Standard => "standard",
        ModulePolicy::PrincipalEscalation => "principal escalation",
        ModulePolicy::PublicationPair => "publication pair",
    }
}

pub fn rule_rows(module: Option<AuthorizationModule>) -> Vec<RuleRow> {
    match module {
        Some(module) => vec![RuleRow::from(module)],
        None => AuthorizationModule::ALL.into_iter().map(RuleRow::from).collect(),
    }
}

/// Execute `rules`
pub fn execute(module: Option<AuthorizationModule>, format: OutputFormat) -> CliResult<()> {
    print_rows(rule_rows(module), format)
}

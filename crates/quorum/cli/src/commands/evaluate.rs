//! One-shot validation of an approval set

use crate::error::CliResult;
use crate::output::{print_json, OutputFormat};
use chrono::Utc;
use colored::Colorize;
use quorum_engine::{validate, ValidationResult};
use quorum_types::{AuthorizationModule, OfficerEntry, OfficerRole};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Evaluation {
    pub module: AuthorizationModule,
    pub initiator: OfficerRole,
    pub approved: Vec<OfficerRole>,
    pub result: ValidationResult,
}

/// Validate `approved` as if each role had approved in a fresh session
pub fn evaluate(
    module: AuthorizationModule,
    initiator: OfficerRole,
    approved: &[OfficerRole],
) -> Evaluation {
    let now = Utc::now();
    let mut roles = approved.to_vec();
    roles.sort();
    roles.dedup();

    let entries: Vec<OfficerEntry> = roles
        .iter()
        .map(|role| OfficerEntry::approved(*role, now))
        .collect();

    Evaluation {
        module,
        initiator,
        result: validate(module, initiator, &entries),
        approved: roles,
    }
}

/// Execute `evaluate`
pub fn execute(
    module: AuthorizationModule,
    initiator: OfficerRole,
    approved: &[OfficerRole],
    format: OutputFormat,
) -> CliResult<()> {
    let evaluation = evaluate(module, initiator, approved);

    match format {
        OutputFormat::Json => print_json(&evaluation)?,
        OutputFormat::Text => {
            let result = &evaluation.result;
            let verdict = if result.is_valid {
                "authorized".green().bold()
            } else {
                "not authorized".red().bold()
            };
            println!("{} {} initiated by {}", "Module:".bold(), module, initiator);
            println!(
                "{} {} of {} approvals ({})",
                "Quorum:".bold(),
                result.authorized_count,
                result.required_count,
                result.reason
            );
            println!("{} {}", "Verdict:".bold(), verdict);
            for message in result.messages() {
                println!("  - {}", message);
            }
        }
    }
    Ok(())
}

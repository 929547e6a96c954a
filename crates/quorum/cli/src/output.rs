//! Output formatting utilities

use crate::error::CliResult;
use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use quorum_types::SessionStatus;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Print rows as a table, or as a JSON array
pub fn print_rows<T: Serialize + Tabled>(rows: Vec<T>, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("{}", "No results".dimmed());
            } else {
                println!("{}", Table::new(rows));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
    }
    Ok(())
}

pub fn print_json<T: Serialize>(data: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Session status, coloured for terminals
pub fn status_label(status: SessionStatus) -> ColoredString {
    let label = status.to_string();
    match status {
        SessionStatus::Pending => label.yellow(),
        SessionStatus::Authorized => label.green().bold(),
        SessionStatus::Expired => label.red(),
        SessionStatus::Cancelled => label.dimmed(),
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Comma-joined display titles, or a dash for none
pub fn join_titles<'a>(roles: impl IntoIterator<Item = &'a quorum_types::OfficerRole>) -> String {
    let titles: Vec<&str> = roles.into_iter().map(|r| r.title()).collect();
    if titles.is_empty() {
        "-".to_string()
    } else {
        titles.join(", ")
    }
}

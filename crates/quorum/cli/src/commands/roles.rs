//! Role registry listing

use crate::error::CliResult;
use crate::output::{print_rows, OutputFormat};
use quorum_types::OfficerRole;
use serde::Serialize;
use tabled::Tabled;

/// One officer role for display
#[derive(Debug, Serialize, Tabled)]
pub struct RoleRow {
    #[tabled(rename = "Rank")]
    pub rank: u8,
    #[tabled(rename = "Key")]
    pub key: &'static str,
    #[tabled(rename = "Title")]
    pub title: &'static str,
    #[tabled(rename = "Substitute")]
    pub substitute: String,
    #[tabled(rename = "Stands in for")]
    pub stands_in_for: String,
}

impl From<OfficerRole> for RoleRow {
    fn from(role: OfficerRole) -> Self {
        let title_or_dash = |r: Option<OfficerRole>| r.map_or("-".to_string(), |r| r.title().to_string());
        Self {
            rank: role.rank(),
            key: role.key(),
            title: role.title(),
            substitute: title_or_dash(role.substitute()),
            stands_in_for: title_or_dash(role.principal_for()),
        }
    }
}

pub fn role_rows() -> Vec<RoleRow> {
    OfficerRole::ALL.into_iter().map(RoleRow::from).collect()
}

/// Execute `roles`
pub fn execute(format: OutputFormat) -> CliResult<()> {
    print_rows(role_rows(), format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_rows() {
        let rows = role_rows();
        assert_eq!(rows.len(), 9);
        assert_eq!(rows[0].title, "President");
        assert_eq!(rows[0].substitute, "Vice President");
        assert_eq!(rows[1].stands_in_for, "President");
        assert_eq!(rows[8].substitute, "-");
    }
}

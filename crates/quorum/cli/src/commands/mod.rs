//! quorumctl subcommands

pub mod evaluate;
pub mod roles;
pub mod rules;
pub mod simulate;

//! quorumctl - officer quorum command-line interface
//!
//! Operators and developers use this CLI to:
//! - List officer roles and who may stand in for whom
//! - Inspect each module's approval rules
//! - Check whether a set of approvals would authorize an action
//! - Replay scripted authorization sessions, including expiry

use clap::{Parser, Subcommand};
use quorum_types::{AuthorizationModule, OfficerRole};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

pub use commands::simulate::{replay, Scenario, ScenarioStep, SimulationReport};
pub use config::{CliConfig, LoggingConfig};
pub use error::{CliError, CliResult};
pub use output::OutputFormat;

/// quorumctl application
#[derive(Parser)]
#[command(name = "quorumctl")]
#[command(about = "Officer quorum engine CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "QUORUM_CONFIG")]
    config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// List officer roles and substitutions
    Roles,

    /// Show module approval rules
    Rules {
        /// Only this module
        #[arg(short, long)]
        module: Option<AuthorizationModule>,
    },

    /// Check a set of approvals against a module's rules
    Evaluate {
        #[arg(short, long)]
        module: AuthorizationModule,

        /// Role that triggered the action
        #[arg(short, long)]
        initiator: OfficerRole,

        /// Approving roles, comma separated
        #[arg(short, long, value_delimiter = ',')]
        approved: Vec<OfficerRole>,
    },

    /// Replay a scenario file
    Simulate {
        /// Path to scenario JSON
        scenario: PathBuf,
    },

    /// Show configuration
    Config,
}

/// Run using the current process arguments.
pub fn run() -> CliResult<()> {
    run_with_args(std::env::args_os())
}

/// Run using the provided argument iterator.
pub fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let config = CliConfig::load(cli.config.as_deref())?;

    init_tracing(&config.logging, cli.verbose);

    match cli.command {
        Commands::Roles => commands::roles::execute(cli.output),
        Commands::Rules { module } => commands::rules::execute(module, cli.output),
        Commands::Evaluate {
            module,
            initiator,
            approved,
        } => commands::evaluate::execute(module, initiator, &approved, cli.output),
        Commands::Simulate { scenario } => {
            commands::simulate::execute(&scenario, config.engine(), cli.output)
        }
        Commands::Config => output::print_json(&config),
    }
}

/// Logs go to stderr so JSON output on stdout stays parseable
fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        logging.level.clone()
    };
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    let json_layer = logging.json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let text_layer = (!logging.json).then(|| {
        tracing_subscriber::fmt::layer()
            .without_time()
            .with_writer(std::io::stderr)
    });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .try_init();
}

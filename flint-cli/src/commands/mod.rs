//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod dispatch;
mod run;
mod workflows;

pub use dispatch::DispatchArgs;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Trigger a workflow and optionally wait for the run to finish
    Dispatch(DispatchArgs),
    /// List the workflows defined in the repository
    Workflows,
    /// Show the current snapshot of a single run
    Run {
        /// Run id
        id: u64,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Dispatch(args) => dispatch::handle_dispatch(args, config).await,
        Commands::Workflows => workflows::handle_workflows(config).await,
        Commands::Run { id } => run::handle_run(id, config).await,
    }
}

//! Dispatch command handler
//!
//! Drives the full trigger flow: resolve, dispatch, and when `--wait` is
//! set, correlate and poll the run to its conclusion.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use colored::*;

use crate::config::Config;
use flint_client::{
    DispatchOutcome, DispatchSpec, Dispatcher, GithubClient, PollPolicy,
};

/// Arguments for `flint dispatch`
#[derive(Args)]
pub struct DispatchArgs {
    /// Workflow name or numeric id
    #[arg(short, long)]
    workflow: String,

    /// Git ref the run should execute at
    #[arg(long = "ref", env = "GITHUB_REF", default_value = "main")]
    git_ref: String,

    /// Workflow inputs as a JSON object of string values
    #[arg(short, long)]
    inputs: Option<String>,

    /// Wait for the run to reach a terminal state
    #[arg(long)]
    wait: bool,

    /// Seconds between completion polls
    #[arg(long, default_value = "5")]
    poll_interval_secs: u64,

    /// Completion poll budget; 0 polls until the run finishes
    #[arg(long, default_value = "100")]
    max_poll_attempts: u32,
}

/// Trigger a workflow
pub async fn handle_dispatch(args: DispatchArgs, config: &Config) -> Result<()> {
    let client = GithubClient::with_base_url(&config.api_url, &config.token);

    let spec = DispatchSpec {
        owner: config.owner.clone(),
        repo: config.repo.clone(),
        workflow: args.workflow,
        git_ref: args.git_ref,
        inputs: args.inputs,
        wait: args.wait,
    };

    println!(
        "Dispatching workflow {} in {}/{} at {}...",
        spec.workflow.bold(),
        config.owner,
        config.repo,
        spec.git_ref.cyan()
    );
    if spec.wait {
        println!("{}", "Waiting for the run to finish.".dimmed());
    }

    let dispatcher = Dispatcher::new(&client).with_completion_policy(PollPolicy::new(
        Duration::from_secs(args.poll_interval_secs),
        args.max_poll_attempts,
    ));

    match dispatcher.run(&spec).await? {
        DispatchOutcome::Dispatched { workflow } => {
            println!("{}", "✓ Workflow dispatch accepted!".green().bold());
            println!("  Workflow: {} ({})", workflow.name.bold(), workflow.id.to_string().dimmed());
            println!("  Ref:      {}", spec.git_ref);
        }
        DispatchOutcome::Completed { workflow, run } => {
            println!("{}", "✓ Run succeeded!".green().bold());
            println!("  Workflow: {} ({})", workflow.name.bold(), workflow.id.to_string().dimmed());
            println!("  Run:      {}", run.id.to_string().cyan());
            println!("  URL:      {}", run.html_url.dimmed());
        }
    }

    Ok(())
}

//! Run command handler
//!
//! Shows the current snapshot of a single workflow run. Useful for
//! checking back on a run after a fire-and-forget dispatch, or when a
//! wait was abandoned partway.

use anyhow::Result;
use colored::*;

use crate::config::Config;
use flint_client::GithubClient;
use flint_core::domain::run::{RunConclusion, RunStatus, WorkflowRun};

/// Show a single run
pub async fn handle_run(id: u64, config: &Config) -> Result<()> {
    let client = GithubClient::with_base_url(&config.api_url, &config.token);

    let run = client.get_run(&config.owner, &config.repo, id).await?;

    print_run_details(&run);

    Ok(())
}

/// Print detailed run information
fn print_run_details(run: &WorkflowRun) {
    println!("{}", "Run Details:".bold());
    println!("  ID:         {}", run.id.to_string().cyan());
    println!("  Status:     {}", colorize_status(&run.status));
    if let Some(conclusion) = &run.conclusion {
        println!("  Conclusion: {}", colorize_conclusion(conclusion));
    }
    println!(
        "  Created:    {}",
        run.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!("  URL:        {}", run.html_url.dimmed());
}

/// Colorize a run status for display
fn colorize_status(status: &RunStatus) -> colored::ColoredString {
    let status_str = status.to_string();
    match status {
        RunStatus::Queued | RunStatus::Waiting | RunStatus::Pending | RunStatus::Requested => {
            status_str.yellow()
        }
        RunStatus::InProgress => status_str.cyan(),
        RunStatus::Completed => status_str.green(),
        RunStatus::Unknown => status_str.dimmed(),
    }
}

/// Colorize a run conclusion for display
fn colorize_conclusion(conclusion: &RunConclusion) -> colored::ColoredString {
    let conclusion_str = conclusion.to_string();
    match conclusion {
        RunConclusion::Success => conclusion_str.green(),
        RunConclusion::Failure | RunConclusion::TimedOut => conclusion_str.red(),
        RunConclusion::Cancelled | RunConclusion::Skipped => conclusion_str.dimmed(),
        RunConclusion::ActionRequired => conclusion_str.yellow(),
        RunConclusion::Neutral | RunConclusion::Unknown => conclusion_str.normal(),
    }
}

//! Workflows command handler
//!
//! Lists the workflow definitions of the configured repository.

use anyhow::Result;
use colored::*;

use crate::config::Config;
use flint_client::GithubClient;
use flint_core::domain::workflow::Workflow;

/// List all workflows in the repository
pub async fn handle_workflows(config: &Config) -> Result<()> {
    let client = GithubClient::with_base_url(&config.api_url, &config.token);

    let workflows = client.list_workflows(&config.owner, &config.repo).await?;

    if workflows.is_empty() {
        println!("{}", "No workflows found.".yellow());
    } else {
        println!(
            "{}",
            format!("Found {} workflow(s):", workflows.len()).bold()
        );
        println!();
        for workflow in workflows {
            print_workflow_summary(&workflow);
        }
    }

    Ok(())
}

/// Print a workflow summary
fn print_workflow_summary(workflow: &Workflow) {
    println!("  {} {}", "▸".cyan(), workflow.name.bold());
    println!("    ID:    {}", workflow.id.to_string().dimmed());
    println!("    Path:  {}", workflow.path.dimmed());
    if workflow.state != "active" {
        println!("    State: {}", workflow.state.yellow());
    }
    println!();
}

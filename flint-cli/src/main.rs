//! Flint CLI
//!
//! Command-line interface for triggering GitHub Actions workflows and
//! watching the runs they create.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "flint")]
#[command(about = "Trigger GitHub Actions workflows and watch their runs", long_about = None)]
struct Cli {
    /// API token used for every request
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// Repository in owner/repo form
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repo: String,

    /// API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flint=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::new(cli.api_url, cli.token, &cli.repo)?;

    handle_command(cli.command, &config).await
}

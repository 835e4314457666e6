//! weave - git workflow helper
//!
//! Generates branch names from tickets, and commit messages and pull
//! request descriptions with a local Ollama model.
//!
//! Available as the `weave` command.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use weave_rs::cli::commands::{Cli, Commands};
use weave_rs::cli::{branch, commit, config, pr};
use weave_rs::core::config::Config;
use weave_rs::error::Result;

#[tokio::main]
async fn main() {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::config_path()?,
    };
    tracing::debug!("Using configuration {}", config_path.display());

    match cli.command {
        // Config commands manage the file themselves
        Commands::Config(args) => config::handle_config(args.command, &config_path),
        Commands::Branch(args) => branch::handle_branch(args, &Config::load_from(&config_path)?),
        Commands::Commit(args) => {
            commit::handle_commit(args, &Config::load_from(&config_path)?).await
        }
        Commands::Pr(args) => pr::handle_pr(args, &Config::load_from(&config_path)?).await,
    }
}

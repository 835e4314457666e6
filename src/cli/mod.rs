//! CLI module for weave
//!
//! This module contains all CLI command definitions and handlers using clap.

pub mod branch;
pub mod commands;
pub mod commit;
pub mod config;
pub mod pr;
pub mod progress;

use std::io::{self, Write};

pub use commands::{Cli, Commands};

use crate::ai::OllamaClient;
use crate::core::git::{self, GitRepository};
use crate::error::{Result, WeaveError};
use progress::Spinner;

const RULE_WIDTH: usize = 60;

/// Fail unless git runs and the working directory is inside a repository
pub(crate) fn ensure_repository() -> Result<()> {
    if !git::git_available() {
        return Err(WeaveError::GitNotAvailable);
    }
    if !GitRepository::is_git_repository() {
        return Err(WeaveError::NotGitRepository);
    }
    Ok(())
}

/// Check the Ollama server and model, with a spinner for each step
pub(crate) async fn ensure_ollama(client: &OllamaClient) -> Result<()> {
    let spinner = Spinner::start("Checking Ollama connection");
    let connected = client.check_connection().await;
    spinner.finish(connected).await;
    if !connected {
        return Err(WeaveError::OllamaUnreachable(client.host().to_string()));
    }

    let spinner = Spinner::start(format!(
        "Checking if model '{}' is available",
        client.model()
    ));
    let available = client.is_model_available().await;
    spinner.finish(available).await;
    if !available {
        return Err(WeaveError::ModelUnavailable(client.model().to_string()));
    }

    Ok(())
}

/// Generate with a spinner running until the model answers
pub(crate) async fn generate_with_spinner(
    client: &OllamaClient,
    label: &str,
    prompt: &str,
) -> Result<String> {
    let spinner = Spinner::start(format!("Generating {} using {}", label, client.model()));
    let result = client.generate(prompt).await;
    spinner.finish(result.is_ok()).await;
    result
}

/// Print generated text between horizontal rules
pub(crate) fn print_ruled(title: &str, body: &str) {
    let rule = "─".repeat(RULE_WIDTH);
    println!("\n{}", rule);
    println!("{}", title);
    println!("{}", rule);
    println!("{}", body);
    println!("{}\n", rule);
}

/// Print `prompt` and read one trimmed, lower-cased line from stdin
pub(crate) fn read_answer(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_lowercase())
}

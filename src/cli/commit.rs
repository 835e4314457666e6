//! Commit CLI command handler

use crate::ai::prompts::{clean_commit_message, CommitPrompt};
use crate::ai::OllamaClient;
use crate::cli::commands::CommitArgs;
use crate::cli::{ensure_ollama, ensure_repository, generate_with_spinner, print_ruled, read_answer};
use crate::core::config::Config;
use crate::core::desktop;
use crate::core::git::GitRepository;
use crate::error::{Result, WeaveError};

/// Handle `weave commit`
pub async fn handle_commit(args: CommitArgs, config: &Config) -> Result<()> {
    ensure_repository()?;
    let git = GitRepository::open_current_dir()?;

    let client = OllamaClient::new(&config.commit.ollama);
    ensure_ollama(&client).await?;

    let staged = !args.unstaged;
    let diff = git.diff(staged)?;
    if diff.trim().is_empty() {
        return Err(WeaveError::NothingToCommit);
    }
    let files = git.changed_files(staged)?;
    println!("Found changes in {} file(s)", files.len());

    let prompt = CommitPrompt::build(&config.commit, &diff, &files);
    let response = generate_with_spinner(&client, "commit message", &prompt).await?;
    let message = clean_commit_message(&response);
    if message.is_empty() {
        return Err(WeaveError::Ollama("The model returned an empty message".to_string()));
    }

    print_ruled("Generated commit message:", &message);

    let accepted = args.yes || is_yes(&read_answer("Use this commit message? [y/N]: ")?);
    if accepted {
        if !staged {
            println!("Note: only staged changes are committed; stage your files with 'git add' first.");
        }
        let commit_id = git.commit(&message)?;
        println!("✓ Created commit: {}", short_id(&commit_id));
        return Ok(());
    }

    match desktop::copy_to_clipboard(&message) {
        Ok(()) => println!("✓ Commit message copied to clipboard"),
        Err(e) => {
            tracing::debug!("{}", e);
            println!("Commit cancelled. Message not copied to clipboard.");
        }
    }
    Ok(())
}

fn is_yes(answer: &str) -> bool {
    matches!(answer, "y" | "yes")
}

fn short_id(commit_id: &str) -> &str {
    commit_id.get(..8).unwrap_or(commit_id)
}

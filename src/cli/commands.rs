//! CLI command definitions using clap
//!
//! Defines the command structure for the `weave` CLI tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::config::CONFIG_ENV_VAR;

/// weave - branch names, commit messages and PR descriptions
///
/// Generates git branch names from tickets, and commit messages and pull
/// request descriptions with a local Ollama model.
#[derive(Parser, Debug)]
#[command(name = "weave", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, env = CONFIG_ENV_VAR, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a branch name from a ticket
    Branch(BranchArgs),

    /// Generate a commit message for the current changes
    Commit(CommitArgs),

    /// Generate a pull request description for the current branch
    Pr(PrArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Branch Command
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
pub struct BranchArgs {
    /// Ticket ID (e.g. STR-123)
    pub ticket: String,

    /// Branch type key (e.g. feature, hotfix); prompts when omitted
    #[arg(long = "type", short = 't', value_name = "KEY")]
    pub branch_type: Option<String>,

    /// Title to use instead of looking the ticket up
    #[arg(long)]
    pub title: Option<String>,

    /// Create and switch to the branch
    #[arg(long, short)]
    pub create: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Commit Command
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
pub struct CommitArgs {
    /// Describe unstaged changes instead of the index
    #[arg(long)]
    pub unstaged: bool,

    /// Commit without asking for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// PR Command
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
pub struct PrArgs {
    /// Base branch (defaults to pr.default_base, then auto-detection)
    #[arg(long, short)]
    pub base: Option<String>,

    /// Open the compare page (or copy) without asking
    #[arg(short = 'y', long)]
    pub yes: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration commands
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the configuration file path
    Path,

    /// Print the effective configuration
    Show,

    /// Check the configuration file for problems
    Validate,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

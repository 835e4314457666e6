//! Custom error types for weave
//!
//! User-friendly error messages for all failure scenarios.

use thiserror::Error;

use crate::naming::RefRejection;

/// Main error type for the weave application
#[derive(Error, Debug)]
pub enum WeaveError {
    /// Not running in a git repository
    #[error("This directory is not a git repository.\n\n  → Run 'git init' to create one, or navigate to an existing git project.")]
    NotGitRepository,

    /// The git executable could not be run
    #[error("git is not installed or not on PATH.\n\n  → Install git from https://git-scm.com/downloads")]
    GitNotAvailable,

    /// Git operation error
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    /// IO error
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// Network request error
    #[error("Network request failed: {0}\n\n  → Check your internet connection.")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("Failed to parse response: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML serialization/deserialization error
    #[error("Configuration file is invalid: {0}\n\n  → Run 'weave config validate' for details, or 'weave config init --force' to start over.")]
    Toml(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generated or supplied branch name is not a legal git ref
    #[error("Invalid branch name ({category}): {0}", category = .0.category())]
    InvalidBranchName(#[from] RefRejection),

    /// Branch generation needs a ticket
    #[error("A ticket ID is required.\n\n  → Example: weave branch STR-123")]
    TicketIdRequired,

    /// Ticket does not look like PROJECT-123
    #[error("Invalid ticket ID '{0}'.\n\n  → Expected format: PROJECT-123")]
    InvalidTicketId(String),

    /// The issue tracker CLI is not installed
    #[error("The jira CLI is not installed.\n\n  → Install it from https://github.com/ankitpokhrel/jira-cli\n  → Or pass the title directly with --title")]
    TrackerUnavailable,

    /// Ticket lookup returned nothing
    #[error("Ticket '{0}' not found.\n\n  → Check the ticket ID, or pass the title with --title")]
    TicketNotFound(String),

    /// Tracker rejected our credentials
    #[error("Issue tracker authentication failed.\n\n  → Run 'jira init' to configure your credentials.")]
    TrackerAuth,

    /// Any other tracker failure
    #[error("Issue tracker request failed: {0}")]
    Tracker(String),

    /// Ollama server not reachable
    #[error("Cannot reach Ollama at {0}.\n\n  → Start it with 'ollama serve'.\n  → Or set commit.ollama.host in your config.")]
    OllamaUnreachable(String),

    /// Configured model is not pulled
    #[error("Model '{0}' is not available in Ollama.\n\n  → Run 'ollama pull {0}'.")]
    ModelUnavailable(String),

    /// Ollama API error
    #[error("AI generation failed: {0}")]
    Ollama(String),

    /// Nothing to describe
    #[error("No changes to commit.\n\n  → Stage changes with 'git add', or use --unstaged.")]
    NothingToCommit,

    /// Branch has no commits ahead of base
    #[error("No commits between '{base}' and '{head}'.\n\n  → Commit your work first, or pick another base with --base.")]
    NoCommits { base: String, head: String },

    /// PR from a branch onto itself
    #[error("Current branch '{0}' is the base branch.\n\n  → Switch to a feature branch, or pick another base with --base.")]
    SameBranch(String),

    /// Clipboard tool failed
    #[error("Could not copy to clipboard: {0}")]
    Clipboard(String),

    /// Browser could not be opened
    #[error("Could not open browser: {0}")]
    Browser(String),

    /// Invalid input from user
    #[error("{0}")]
    InvalidInput(String),

    /// Operation cancelled by user
    #[error("Operation cancelled.")]
    Cancelled,
}

impl From<toml::de::Error> for WeaveError {
    fn from(err: toml::de::Error) -> Self {
        WeaveError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for WeaveError {
    fn from(err: toml::ser::Error) -> Self {
        WeaveError::Toml(err.to_string())
    }
}

/// Result type alias using WeaveError
pub type Result<T> = std::result::Result<T, WeaveError>;

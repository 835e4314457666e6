//! Core functionality for weave
//!
//! This module contains the collaborators around the naming engines:
//! - Application configuration
//! - Git repository operations
//! - Issue tracker lookups
//! - Repository host helpers (GitHub compare URLs, PR templates)
//! - Clipboard and browser integration

pub mod config;
pub mod desktop;
pub mod git;
pub mod jira;
pub mod repository;

pub use config::Config;
pub use git::GitRepository;
pub use jira::{JiraCli, TicketSource};
pub use repository::GitHubRemote;

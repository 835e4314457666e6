//! Issue tracker lookups
//!
//! Ticket titles come from the `jira` command line client
//! (`jira issue view <ID> --raw`). The [`TicketSource`] trait keeps the
//! branch flow independent of the concrete tracker.

use std::env;
use std::path::Path;
use std::process::Command;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::error::{Result, WeaveError};

const JIRA_EXECUTABLE: &str = "jira";

/// PROJECT-123 style identifiers
static TICKET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9]+-\d+$").expect("Invalid regex pattern for ticket ids")
});

/// Source of ticket titles
#[cfg_attr(test, mockall::automock)]
pub trait TicketSource {
    /// Whether the tracker can be queried at all
    fn is_available(&self) -> bool;

    /// Summary line of the ticket
    fn ticket_title(&self, ticket_id: &str) -> Result<String>;
}

/// Whether `ticket_id` looks like PROJECT-123
pub fn is_valid_ticket_id(ticket_id: &str) -> bool {
    TICKET_PATTERN.is_match(ticket_id)
}

/// Title to use for a branch: the explicit one if given, otherwise the
/// ticket summary from `source`
pub fn resolve_title(
    source: &dyn TicketSource,
    ticket_id: &str,
    explicit: Option<&str>,
) -> Result<String> {
    if let Some(title) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(title.to_string());
    }

    if !source.is_available() {
        return Err(WeaveError::TrackerUnavailable);
    }

    source.ticket_title(ticket_id)
}

/// The `jira` CLI
#[derive(Debug, Default, Clone, Copy)]
pub struct JiraCli;

impl JiraCli {
    pub fn new() -> Self {
        Self
    }
}

impl TicketSource for JiraCli {
    fn is_available(&self) -> bool {
        find_in_path(JIRA_EXECUTABLE)
    }

    fn ticket_title(&self, ticket_id: &str) -> Result<String> {
        if !self.is_available() {
            return Err(WeaveError::TrackerUnavailable);
        }
        if !is_valid_ticket_id(ticket_id) {
            return Err(WeaveError::InvalidTicketId(ticket_id.to_string()));
        }

        tracing::debug!("Running jira issue view {} --raw", ticket_id);
        let output = Command::new(JIRA_EXECUTABLE)
            .args(["issue", "view", ticket_id, "--raw"])
            .output()
            .map_err(|e| WeaveError::Tracker(format!("Failed to execute jira: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_failure(ticket_id, &stderr));
        }

        let title = parse_summary(&String::from_utf8_lossy(&output.stdout))?;
        if title.is_empty() {
            return Err(WeaveError::Tracker(format!(
                "Ticket {} has an empty title",
                ticket_id
            )));
        }
        Ok(title)
    }
}

fn classify_failure(ticket_id: &str, stderr: &str) -> WeaveError {
    if stderr.contains("not found") || stderr.contains("does not exist") {
        WeaveError::TicketNotFound(ticket_id.to_string())
    } else if stderr.contains("authentication") || stderr.contains("unauthorized") {
        WeaveError::TrackerAuth
    } else {
        WeaveError::Tracker(format!("Failed to fetch ticket: {}", stderr.trim()))
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawIssue {
    #[serde(default)]
    fields: IssueFields,
}

#[derive(Debug, Default, Deserialize)]
struct IssueFields {
    #[serde(default)]
    summary: String,
}

/// `fields.summary` of a raw issue document; missing fields read as empty
fn parse_summary(raw: &str) -> Result<String> {
    let issue: RawIssue = serde_json::from_str(raw)?;
    Ok(issue.fields.summary.trim().to_string())
}

fn find_in_path(executable: &str) -> bool {
    let Some(paths) = env::var_os("PATH") else {
        return false;
    };
    env::split_paths(&paths).any(|dir| is_executable(&dir.join(executable)))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}

//! Repository host helpers
//!
//! Detects a GitHub remote, builds the "compare" page URL used to open a
//! pull request in the browser, and discovers the repository's PR template.

use std::fs;
use std::path::Path;

use url::Url;

use crate::error::{Result, WeaveError};

/// PR template locations, checked in order
const PR_TEMPLATE_PATHS: &[&str] = &[
    ".github/PULL_REQUEST_TEMPLATE.md",
    ".github/pull_request_template.md",
    "PULL_REQUEST_TEMPLATE.md",
    "pull_request_template.md",
    "docs/PULL_REQUEST_TEMPLATE.md",
    "docs/pull_request_template.md",
];

/// A repository hosted on GitHub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubRemote {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl GitHubRemote {
    /// Interpret a remote URL; `None` when it does not point at GitHub
    pub fn from_remote_url(url: &str) -> Option<Self> {
        parse_github_url(url).map(|(owner, name)| Self { owner, name })
    }

    /// Compare page that opens a new PR from `head` into `base` with `body` prefilled
    pub fn compare_url(&self, base: &str, head: &str, body: &str) -> Result<String> {
        build_pr_url(&self.owner, &self.name, base, head, body)
    }
}

/// Parse a GitHub URL to extract owner and repository name
///
/// Supports both HTTPS and SSH URL formats:
/// - `https://github.com/owner/repo.git`
/// - `https://github.com/owner/repo`
/// - `git@github.com:owner/repo.git`
/// - `ssh://git@github.com/owner/repo.git`
pub fn parse_github_url(url: &str) -> Option<(String, String)> {
    let url = url.trim();

    if let Some(path) = url.strip_prefix("git@github.com:") {
        return parse_owner_repo_path(path);
    }

    if let Some(path) = url.strip_prefix("ssh://git@github.com/") {
        return parse_owner_repo_path(path);
    }

    let parsed = Url::parse(url).ok()?;
    if parsed.host_str() != Some("github.com") {
        return None;
    }
    parse_owner_repo_path(parsed.path().trim_start_matches('/'))
}

fn parse_owner_repo_path(path: &str) -> Option<(String, String)> {
    let path = path.trim_end_matches('/').trim_end_matches(".git");
    let mut parts = path.split('/');
    let owner = parts.next().filter(|s| !s.is_empty())?;
    let repo = parts.next().filter(|s| !s.is_empty())?;
    Some((owner.to_string(), repo.to_string()))
}

/// Build `https://github.com/{owner}/{repo}/compare/{base}...{head}?expand=1&body=...`
pub fn build_pr_url(owner: &str, repo: &str, base: &str, head: &str, body: &str) -> Result<String> {
    let mut url = Url::parse("https://github.com/")
        .map_err(|e| WeaveError::InvalidInput(format!("Invalid GitHub URL: {}", e)))?;

    url.path_segments_mut()
        .map_err(|_| WeaveError::InvalidInput("GitHub URL cannot have a path".to_string()))?
        .clear()
        .push(owner)
        .push(repo)
        .push("compare")
        .extend(compare_range(base, head).split('/'));

    url.query_pairs_mut()
        .append_pair("expand", "1")
        .append_pair("body", body);

    Ok(url.into())
}

fn compare_range(base: &str, head: &str) -> String {
    format!("{}...{}", base, head)
}

/// Trimmed contents of the first PR template found under `root`
pub fn find_pr_template(root: &Path) -> Option<String> {
    PR_TEMPLATE_PATHS.iter().find_map(|relative| {
        let path = root.join(relative);
        match fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!("Using PR template {}", path.display());
                Some(content.trim().to_string())
            }
            Err(_) => None,
        }
    })
}

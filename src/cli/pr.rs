//! Pull request CLI command handler

use crate::ai::prompts::{build_pr_prompt, clean_pr_description, PrContext};
use crate::ai::OllamaClient;
use crate::cli::commands::PrArgs;
use crate::cli::{ensure_ollama, ensure_repository, generate_with_spinner, print_ruled, read_answer};
use crate::core::config::{Config, PrConfig};
use crate::core::desktop;
use crate::core::git::GitRepository;
use crate::core::repository::{find_pr_template, GitHubRemote};
use crate::error::{Result, WeaveError};

/// Handle `weave pr`
pub async fn handle_pr(args: PrArgs, config: &Config) -> Result<()> {
    ensure_repository()?;
    let git = GitRepository::open_current_dir()?;

    let client = OllamaClient::new(&config.commit.ollama);
    ensure_ollama(&client).await?;

    let head = git.current_branch()?;
    let base = resolve_base(args.base.as_deref(), &config.pr, || git.detect_base_branch());
    if head == base {
        return Err(WeaveError::SameBranch(head));
    }
    println!("Comparing {} → {}", head, base);

    let commits = git.commits_between(&base, &head)?;
    if commits.trim().is_empty() {
        return Err(WeaveError::NoCommits { base, head });
    }
    let diff = git.diff_between(&base, &head)?;
    let files = git.changed_files_between(&base, &head)?;
    println!(
        "Found {} commit(s) changing {} file(s)",
        commits.lines().count(),
        files.len()
    );

    let template = find_pr_template(&git.root_dir()?).unwrap_or_default();
    if !template.is_empty() {
        println!("Using PR template from repository");
    }

    let ctx = PrContext {
        branch: head.clone(),
        base: base.clone(),
        commits,
        files: files.join("\n"),
        diff,
        template,
    };
    let prompt = build_pr_prompt(&config.pr, ctx);
    let response = generate_with_spinner(&client, "PR description", &prompt).await?;
    let description = clean_pr_description(&response);

    print_ruled("Generated PR description:", &description);

    let compare_url = match git.remote_url(&config.pr.default_remote) {
        Ok(url) => match GitHubRemote::from_remote_url(&url) {
            Some(remote) => Some(remote.compare_url(&base, &head, &description)?),
            None => None,
        },
        Err(e) => {
            tracing::debug!("No remote for compare URL: {}", e);
            None
        }
    };

    let action = if args.yes {
        match compare_url {
            Some(_) => PrAction::OpenBrowser,
            None => PrAction::CopyToClipboard,
        }
    } else {
        if compare_url.is_some() {
            println!("  1. Open in browser");
        }
        println!("  2. Copy to clipboard");
        println!("  3. Do nothing");
        PrAction::from_choice(&read_answer("\nSelect an option: ")?)
    };

    match (action, compare_url) {
        (PrAction::OpenBrowser, Some(url)) => {
            desktop::open_in_browser(&url)?;
            println!("✓ Opened PR creation page in browser");
        }
        (PrAction::OpenBrowser, None) => {
            eprintln!("No GitHub remote found.");
        }
        (PrAction::CopyToClipboard, url) => {
            desktop::copy_to_clipboard(&description)?;
            if url.is_none() && args.yes {
                println!("✓ No GitHub remote found. PR description copied to clipboard");
            } else {
                println!("✓ PR description copied to clipboard");
            }
        }
        (PrAction::Nothing, _) => {}
    }

    Ok(())
}

/// Base branch: flag, then configured default, then detection
fn resolve_base(flag: Option<&str>, config: &PrConfig, detect: impl FnOnce() -> String) -> String {
    flag.map(str::trim)
        .filter(|b| !b.is_empty())
        .or_else(|| Some(config.default_base.trim()).filter(|b| !b.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(detect)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrAction {
    OpenBrowser,
    CopyToClipboard,
    Nothing,
}

impl PrAction {
    fn from_choice(choice: &str) -> Self {
        match choice {
            "1" => PrAction::OpenBrowser,
            "2" => PrAction::CopyToClipboard,
            _ => PrAction::Nothing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_base_precedence() {
        let mut config = PrConfig::default();
        let detect = || "main".to_string();

        assert_eq!(resolve_base(Some("develop"), &config, detect), "develop");
        assert_eq!(resolve_base(None, &config, detect), "main");

        config.default_base = "release".to_string();
        assert_eq!(resolve_base(None, &config, detect), "release");
        assert_eq!(resolve_base(Some(" "), &config, detect), "release");
        assert_eq!(resolve_base(Some("develop"), &config, detect), "develop");
    }

    #[test]
    fn test_action_choice() {
        assert_eq!(PrAction::from_choice("1"), PrAction::OpenBrowser);
        assert_eq!(PrAction::from_choice("2"), PrAction::CopyToClipboard);
        assert_eq!(PrAction::from_choice("3"), PrAction::Nothing);
        assert_eq!(PrAction::from_choice(""), PrAction::Nothing);
    }
}

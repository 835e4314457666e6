//! Prompt templates for AI generation
//!
//! Builds the commit and PR prompts from the configured templates and
//! cleans the model's responses.

use crate::ai::template::{expand, TemplateContext};
use crate::core::config::{CommitConfig, PrConfig};
use crate::naming::sanitizer::floor_char_boundary;

/// Default commit prompt; fields: Types, Files, Diff
pub const DEFAULT_COMMIT_PROMPT: &str = r#"Based on the following git diff, generate a commit message in Conventional Commits format.

Format: <type>(<scope>): <description>

Types: {{.Types}}
Scope: The module/component affected (e.g., Core, Authentication, API, etc.)

Changed files:
{{.Files}}

Git diff:
{{.Diff}}

Generate ONLY the commit message in the format specified, nothing else. Be concise and specific."#;

/// Default PR prompt; fields: Template, Branch, Base, Commits, Files, Diff
pub const DEFAULT_PR_PROMPT: &str = r#"Write a pull request description for the changes below.

{{if .Template}}Fill in this pull request template. Keep its headings and checkboxes, and replace the placeholder text:

{{.Template}}{{else}}Use this format:

## Summary
One or two sentences on what this change does and why.

## Changes
- Bullet points for the key changes

## Notes
Breaking changes, follow-ups or anything a reviewer should know. Omit if none.{{end}}

Branch: {{.Branch}} → {{.Base}}

Commits:
{{.Commits}}

Changed files:
{{.Files}}

Git diff:
{{.Diff}}

Output ONLY the pull request description in Markdown, nothing else."#;

/// Truncate a diff to at most `max` bytes without splitting a character.
///
/// `max == 0` means no limit.
pub fn cap_diff(diff: &str, max: usize) -> &str {
    if max == 0 || diff.len() <= max {
        return diff;
    }
    &diff[..floor_char_boundary(diff, max)]
}

/// Commit prompt builder
pub struct CommitPrompt;

impl CommitPrompt {
    /// Expand the configured commit prompt for a diff and its changed files
    pub fn build(config: &CommitConfig, diff: &str, files: &[String]) -> String {
        let context = TemplateContext::new()
            .with("Types", config.types.join(", "))
            .with("Files", files.join("\n"))
            .with("Diff", cap_diff(diff, config.ollama.max_diff));

        expand(&config.prompt, &context)
    }
}

/// Strip whitespace and any quotes the model wrapped the message in
pub fn clean_commit_message(response: &str) -> String {
    response
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'')
        .to_string()
}

/// Inputs for a PR description prompt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrContext {
    pub branch: String,
    pub base: String,
    /// One commit per line
    pub commits: String,
    /// One path per line
    pub files: String,
    pub diff: String,
    /// Repository PR template, empty when there is none
    pub template: String,
}

impl From<PrContext> for TemplateContext {
    fn from(ctx: PrContext) -> Self {
        TemplateContext::new()
            .with("Branch", ctx.branch)
            .with("Base", ctx.base)
            .with("Commits", ctx.commits)
            .with("Files", ctx.files)
            .with("Diff", ctx.diff)
            .with("Template", ctx.template)
    }
}

/// Expand the configured PR prompt, capping the diff at `pr.max_diff`
pub fn build_pr_prompt(config: &PrConfig, mut ctx: PrContext) -> String {
    let capped = cap_diff(&ctx.diff, config.max_diff).len();
    ctx.diff.truncate(capped);
    expand(&config.prompt, &ctx.into())
}

pub fn clean_pr_description(response: &str) -> String {
    response.trim().to_string()
}

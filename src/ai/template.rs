//! Prompt template expansion
//!
//! A deliberately small template engine for operator-written prompts:
//!
//! - `{{.Field}}` substitutes the named field (missing fields become empty)
//! - `{{if .Field}}A{{else}}B{{end}}` keeps `A` when the field is non-empty,
//!   otherwise `B` (or nothing when there is no `{{else}}`)
//!
//! Whitespace inside the braces is allowed, so `{{ .Field }}` and
//! `{{ end }}` are recognised too.
//!
//! Only one conditional per template is resolved and conditionals do not
//! nest. An `{{if}}` without a later `{{end}}` is ignored and the template
//! falls back to plain placeholder substitution. Expansion never fails.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// `{{if .Field}}`
static IF_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*if\s+\.([A-Za-z_][A-Za-z0-9_]*)\s*\}\}")
        .expect("Invalid regex pattern for conditional directive")
});

/// `{{else}}`
static ELSE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*else\s*\}\}").expect("Invalid regex pattern for else tag"));

/// `{{end}}`
static END_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*end\s*\}\}").expect("Invalid regex pattern for end tag"));

/// `{{.Field}}`
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*\.([A-Za-z_][A-Za-z0-9_]*)\s*\}\}")
        .expect("Invalid regex pattern for template placeholder")
});

/// Any conditional marker left behind after resolution
static STRAY_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*(?:if\s+\.[A-Za-z_][A-Za-z0-9_]*|else|end)\s*\}\}")
        .expect("Invalid regex pattern for stray directives")
});

/// Named string fields available to a template, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContext {
    fields: Vec<(String, String)>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value with the same name
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a field, replacing any previous value with the same name
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Field value, if present
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Field value, empty when absent
    fn value(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }
}

/// Expand `template` against `context`.
///
/// The conditional is resolved first; placeholders are substituted afterwards
/// over the result, so placeholders inside the chosen branch are resolved too.
pub fn expand(template: &str, context: &TemplateContext) -> String {
    let resolved = resolve_conditional(template, context);
    let cleaned = STRAY_DIRECTIVE.replace_all(&resolved, "");
    substitute_placeholders(&cleaned, context)
}

/// Resolve the first `{{if .Field}}...{{end}}` block.
///
/// Returns the template unchanged when there is no conditional, or when the
/// opening tag has no `{{end}}` after it.
fn resolve_conditional(template: &str, context: &TemplateContext) -> String {
    let Some(caps) = IF_TAG.captures(template) else {
        return template.to_string();
    };
    let (Some(tag), Some(field)) = (caps.get(0), caps.get(1)) else {
        return template.to_string();
    };

    let rest = &template[tag.end()..];
    let Some(end) = END_TAG.find(rest) else {
        return template.to_string();
    };

    let before = &template[..tag.start()];
    let block = &rest[..end.start()];
    let after = &rest[end.end()..];

    let (then_branch, else_branch) = match ELSE_TAG.find(block) {
        Some(m) => (&block[..m.start()], Some(&block[m.end()..])),
        None => (block, None),
    };

    let selected = if context.value(field.as_str()).is_empty() {
        else_branch.unwrap_or("")
    } else {
        then_branch
    };

    format!("{}{}{}", before, selected, after)
}

/// Replace every `{{.Field}}` in a single pass; values are never re-scanned
fn substitute_placeholders(text: &str, context: &TemplateContext) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| {
            caps.get(1)
                .map(|m| context.value(m.as_str()).to_string())
                .unwrap_or_default()
        })
        .into_owned()
}

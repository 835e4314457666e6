//! Branch name assembly
//!
//! Composes `type/TICKET<sep>slug` from a branch type prefix, an opaque
//! ticket identifier and a title, keeping the result within the configured
//! maximum length.

use crate::core::config::BranchConfig;
use crate::naming::sanitizer::{floor_char_boundary, sanitize};

/// Slug budget used when the prefix alone already exhausts `max_length`
const FALLBACK_TITLE_LENGTH: usize = 10;

/// Input for branch name generation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierRequest {
    /// Branch type prefix (e.g. "feature")
    pub branch_type: String,
    /// Ticket identifier, used verbatim
    pub ticket_id: String,
    /// Free-text title; the ticket id is used when absent or blank
    pub title: Option<String>,
}

impl IdentifierRequest {
    pub fn new(branch_type: impl Into<String>, ticket_id: impl Into<String>) -> Self {
        Self {
            branch_type: branch_type.into(),
            ticket_id: ticket_id.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Generate a branch name.
///
/// Returns an empty string when the branch type or ticket id is missing.
/// That is the only rejection; every other input produces a name.
pub fn generate_name(request: &IdentifierRequest, config: &BranchConfig) -> String {
    let branch_type = request.branch_type.as_str();
    let ticket_id = request.ticket_id.as_str();

    if branch_type.is_empty() || ticket_id.is_empty() {
        return String::new();
    }

    let title = request
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(ticket_id);

    let separator = config.sanitization.effective_separator();

    // type + "/" + ticket + separator
    let prefix_length = branch_type.len() + 1 + ticket_id.len() + separator.len();
    let title_budget = match config.max_length.checked_sub(prefix_length) {
        Some(budget) if budget >= 1 => budget,
        _ => FALLBACK_TITLE_LENGTH,
    };

    let slug = sanitize(title, &config.sanitization_options(title_budget));
    let slug = ref_safe_slug(&slug, separator);

    let name = assemble(branch_type, ticket_id, separator, &slug);
    if name.len() <= config.max_length {
        return name;
    }

    // Only reachable through the fallback budget; the name stays over length
    // when the prefix leaves no room at all.
    let max_title_length = config.max_length.saturating_sub(prefix_length);
    if max_title_length == 0 {
        return name;
    }

    let truncated = if slug.len() > max_title_length {
        let cut = &slug[..floor_char_boundary(&slug, max_title_length)];
        ref_safe_slug(cut.strip_suffix(separator).unwrap_or(cut), separator)
    } else {
        slug
    };

    assemble(branch_type, ticket_id, separator, &truncated)
}

/// Map a type key to its configured prefix.
///
/// Unknown keys resolve to the configured default type key itself, not
/// to its prefix. Never fails.
pub fn branch_type(key: &str, config: &BranchConfig) -> String {
    config
        .types
        .get(key)
        .cloned()
        .unwrap_or_else(|| config.default_type.clone())
}

fn assemble(branch_type: &str, ticket_id: &str, separator: &str, slug: &str) -> String {
    format!("{}/{}{}{}", branch_type, ticket_id, separator, slug)
}

/// Remove dot sequences git refuses inside a ref: `..` anywhere and a
/// trailing dot. A separator exposed by the trim goes too.
fn ref_safe_slug(slug: &str, separator: &str) -> String {
    let mut result = slug.to_string();
    while result.contains("..") {
        result = result.replace("..", ".");
    }
    result
        .trim_end_matches(|c: char| c == '.' || separator.contains(c))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{BranchConfig, SanitizationConfig};
    use crate::naming::validator::is_valid;
    use std::collections::BTreeMap;

    fn test_branch_config() -> BranchConfig {
        let mut types = BTreeMap::new();
        types.insert("feature".to_string(), "feature".to_string());
        types.insert("bugfix".to_string(), "bugfix".to_string());
        types.insert("hotfix".to_string(), "hotfix".to_string());

        BranchConfig {
            max_length: 60,
            default_type: "feature".to_string(),
            types,
            sanitization: SanitizationConfig {
                separator: "-".to_string(),
                lowercase: true,
                transliterate: true,
            },
        }
    }

    fn generate(branch_type: &str, ticket: &str, title: &str) -> String {
        let request = IdentifierRequest::new(branch_type, ticket).with_title(title);
        generate_name(&request, &test_branch_config())
    }

    #[test]
    fn test_basic_branch_generation() {
        assert_eq!(
            generate("feature", "STR-123", "Add user authentication"),
            "feature/STR-123-add-user-authentication"
        );
    }

    #[test]
    fn test_title_with_special_characters() {
        assert_eq!(
            generate("bugfix", "BUG-456", r#"Fix: Login (issue) with "quotes""#),
            "bugfix/BUG-456-fix-login-issue-with-quotes"
        );
    }

    #[test]
    fn test_empty_title_uses_ticket_id() {
        assert_eq!(generate("hotfix", "HOT-999", ""), "hotfix/HOT-999-hot-999");
        assert_eq!(generate("hotfix", "HOT-999", "   "), "hotfix/HOT-999-hot-999");

        let request = IdentifierRequest::new("hotfix", "HOT-999");
        assert_eq!(
            generate_name(&request, &test_branch_config()),
            "hotfix/HOT-999-hot-999"
        );
    }

    #[test]
    fn test_missing_type_or_ticket_returns_empty() {
        assert_eq!(generate("", "TEST-123", "x"), "");
        assert_eq!(generate("feature", "", "x"), "");
    }

    #[test]
    fn test_title_with_german_umlauts() {
        assert_eq!(
            generate("feature", "GER-123", "Füge Benutzerverwaltung hinzü"),
            "feature/GER-123-fuege-benutzerverwaltung-hinzue"
        );
    }

    #[test]
    fn test_long_title_is_truncated_at_word() {
        let name = generate(
            "feature",
            "STR-123",
            "Implement the new onboarding wizard with progressive profile completion",
        );
        assert_eq!(
            name,
            "feature/STR-123-implement-the-new-onboarding-wizard-with"
        );
        assert!(name.len() <= 60);
    }

    #[test]
    fn test_fallback_budget_when_prefix_exhausts_max_length() {
        // Documented quirk: the prefix alone is longer than max_length, so the
        // slug gets a fixed budget of 10 and the name ends up over length.
        let config = BranchConfig {
            max_length: 20,
            ..test_branch_config()
        };
        let request = IdentifierRequest::new("feature", "VERYLONGTICKET-12345")
            .with_title("Add user authentication");

        let name = generate_name(&request, &config);
        assert_eq!(name, "feature/VERYLONGTICKET-12345-add-user");
        assert!(name.len() > config.max_length);
    }

    #[test]
    fn test_budget_counts_bytes_of_non_ascii_ticket() {
        // Known edge case: the budget is computed from byte lengths, so a
        // multi-byte ticket id costs more than its visible width.
        let config = BranchConfig {
            max_length: 30,
            ..test_branch_config()
        };
        let request =
            IdentifierRequest::new("feature", "ÄRGER-1").with_title("Refactor billing engine");

        let name = generate_name(&request, &config);
        assert_eq!(name, "feature/ÄRGER-1-refactor");
        assert!(name.len() <= config.max_length);
        assert!(name.chars().count() < config.max_length);
    }

    #[test]
    fn test_dots_never_break_ref_rules() {
        let name = generate("feature", "STR-1", "Bump to v2.1.0..final.");
        assert_eq!(name, "feature/STR-1-bump-to-v2.1.0.final");
        assert!(is_valid(&name));
    }

    #[test]
    fn test_generated_names_validate() {
        let titles = [
            "Add user authentication",
            "...hidden",
            "Release 1.0.",
            "  tabs\tand\nnewlines  ",
            "Füge Benutzerverwaltung hinzü",
            "A title that is definitely going to exceed the configured maximum length",
            "~^:?*[ reserved",
        ];
        for title in titles {
            let name = generate("feature", "STR-123", title);
            assert!(is_valid(&name), "{name:?} should be a valid ref");
            assert!(name.len() <= 60, "{name:?} too long");
        }
    }

    #[test]
    fn test_ref_illegal_separator_falls_back_to_hyphen() {
        for separator in ["~", "^", "[", ".", " ", "a/b"] {
            let mut config = test_branch_config();
            config.sanitization.separator = separator.to_string();

            for title in ["Fix login", "!!!"] {
                let request = IdentifierRequest::new("feature", "STR-1").with_title(title);
                let name = generate_name(&request, &config);
                assert!(name.starts_with("feature/STR-1-"), "{name:?}");
                assert!(is_valid(&name), "{name:?} from separator {separator:?}");
            }
        }
    }

    #[test]
    fn test_branch_type_mapping() {
        let mut config = test_branch_config();
        assert_eq!(branch_type("feature", &config), "feature");
        assert_eq!(branch_type("bugfix", &config), "bugfix");
        assert_eq!(branch_type("unknown", &config), "feature");

        config
            .types
            .insert("feature".to_string(), "feat".to_string());
        assert_eq!(branch_type("unknown", &config), "feature");
        assert_eq!(branch_type("feature", &config), "feat");

        config.types.clear();
        assert_eq!(branch_type("anything", &config), "feature");
    }
}

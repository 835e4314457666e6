//! Slug normalization
//!
//! Turns free-form text (usually a ticket title) into a separator-delimited
//! slug that is safe to embed in a branch name. The transformation is an
//! ordered series of passes; each pass is a separate function so its
//! behavior can be checked on its own.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

/// Fixed diacritic table applied when transliteration is enabled
const TRANSLITERATIONS: &[(&str, &str)] = &[
    ("ä", "ae"),
    ("Ä", "Ae"),
    ("ö", "oe"),
    ("Ö", "Oe"),
    ("ü", "ue"),
    ("Ü", "Ue"),
    ("ß", "ss"),
    ("à", "a"),
    ("á", "a"),
    ("â", "a"),
    ("ã", "a"),
    ("å", "a"),
    ("æ", "ae"),
    ("À", "A"),
    ("Á", "A"),
    ("Â", "A"),
    ("Ã", "A"),
    ("Å", "A"),
    ("Æ", "Ae"),
    ("è", "e"),
    ("é", "e"),
    ("ê", "e"),
    ("ë", "e"),
    ("È", "E"),
    ("É", "E"),
    ("Ê", "E"),
    ("Ë", "E"),
    ("ì", "i"),
    ("í", "i"),
    ("î", "i"),
    ("ï", "i"),
    ("Ì", "I"),
    ("Í", "I"),
    ("Î", "I"),
    ("Ï", "I"),
    ("ò", "o"),
    ("ó", "o"),
    ("ô", "o"),
    ("õ", "o"),
    ("ø", "o"),
    ("Ò", "O"),
    ("Ó", "O"),
    ("Ô", "O"),
    ("Õ", "O"),
    ("Ø", "O"),
    ("ù", "u"),
    ("ú", "u"),
    ("û", "u"),
    ("Ù", "U"),
    ("Ú", "U"),
    ("Û", "U"),
    ("ç", "c"),
    ("Ç", "C"),
    ("ñ", "n"),
    ("Ñ", "N"),
];

/// Punctuation deleted outright before word breaks are collapsed
static DELETED_PUNCTUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"["()\[\]{}:;,<>?|*&^%$#@!~`]"#)
        .expect("Invalid regex pattern for punctuation removal")
});

/// A single hyphen or underscore with optional surrounding whitespace
static HYPHEN_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*[-_]\s*").expect("Invalid regex pattern for hyphen word breaks")
});

/// Any remaining run of whitespace
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid regex pattern for whitespace runs"));

/// Options controlling slug normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizationOptions {
    /// String placed between words
    pub separator: String,
    /// Case-fold the result
    pub lowercase: bool,
    /// Apply the diacritic transliteration table
    pub transliterate: bool,
    /// Maximum output length in bytes, 0 for unbounded
    pub max_length: usize,
}

impl Default for SanitizationOptions {
    fn default() -> Self {
        Self {
            separator: "-".to_string(),
            lowercase: true,
            transliterate: false,
            max_length: 0,
        }
    }
}

impl SanitizationOptions {
    /// Same options with a different length limit
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// The separator to use, falling back to `-` when none is configured
    fn effective_separator(&self) -> &str {
        if self.separator.is_empty() {
            "-"
        } else {
            &self.separator
        }
    }
}

/// Normalize `text` into a slug.
///
/// Empty input yields an empty slug. Aggressive truncation can also yield an
/// empty slug, which callers should treat as "no usable slug".
pub fn sanitize(text: &str, options: &SanitizationOptions) -> String {
    if text.is_empty() {
        return String::new();
    }

    let separator = options.effective_separator();

    let mut result = text.trim().to_string();

    if options.transliterate {
        result = transliterate(&result);
    }

    result = break_on_slashes(&result);
    result = delete_punctuation(&result);
    result = collapse_hyphen_breaks(&result, separator);
    result = collapse_whitespace(&result, separator);
    result = collapse_repeated_separator(&result, separator);
    result = retain_allowed_chars(&result, separator);
    // Deleted symbols can leave two separators touching
    result = collapse_repeated_separator(&result, separator);

    if options.lowercase {
        result = result.to_lowercase();
    }

    if options.max_length > 0 {
        result = truncate_at_word(&result, options.max_length, separator);
    }

    let result = trim_separator(&result, separator);
    strip_leading_dots(result, separator).to_string()
}

/// Replace every diacritic from the fixed table with its ASCII spelling
pub fn transliterate(text: &str) -> String {
    TRANSLITERATIONS
        .iter()
        .fold(text.to_string(), |acc, &(from, to)| acc.replace(from, to))
}

/// `/` and `\` act as word breaks rather than being dropped
fn break_on_slashes(text: &str) -> String {
    text.replace(['/', '\\'], " ")
}

fn delete_punctuation(text: &str) -> String {
    DELETED_PUNCTUATION.replace_all(text, "").into_owned()
}

/// Turn intentional hyphenation (`a - b`, `a_b`) into a separator
fn collapse_hyphen_breaks(text: &str, separator: &str) -> String {
    HYPHEN_BREAK
        .replace_all(text, NoExpand(separator))
        .into_owned()
}

fn collapse_whitespace(text: &str, separator: &str) -> String {
    WHITESPACE_RUN
        .replace_all(text, NoExpand(separator))
        .into_owned()
}

/// Collapse back-to-back separators into a single one
fn collapse_repeated_separator(text: &str, separator: &str) -> String {
    let doubled = separator.repeat(2);
    let mut result = text.to_string();
    while result.contains(&doubled) {
        result = result.replace(&doubled, separator);
    }
    result
}

/// Drop everything except ASCII letters, digits, dots and separator characters
fn retain_allowed_chars(text: &str, separator: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || separator.contains(*c))
        .collect()
}

/// Hard-truncate to `max_length` bytes, then back off to the last separator
/// when it sits past the midpoint.
fn truncate_at_word(text: &str, max_length: usize, separator: &str) -> String {
    if text.len() <= max_length {
        return text.to_string();
    }

    let truncated = &text[..floor_char_boundary(text, max_length)];
    match truncated.rfind(separator) {
        Some(last_sep) if last_sep > max_length / 2 => truncated[..last_sep].to_string(),
        _ => truncated.to_string(),
    }
}

/// Largest index `<= index` that falls on a char boundary of `text`
pub(crate) fn floor_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    (0..=index)
        .rev()
        .find(|i| text.is_char_boundary(*i))
        .unwrap_or(0)
}

fn trim_separator<'a>(text: &'a str, separator: &str) -> &'a str {
    text.trim_matches(|c: char| separator.contains(c))
}

/// Strip leading dots, along with any separator that becomes leading once
/// the dots are gone.
fn strip_leading_dots<'a>(text: &'a str, separator: &str) -> &'a str {
    if !text.starts_with('.') {
        return text;
    }
    text.trim_start_matches(|c: char| c == '.' || separator.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> SanitizationOptions {
        SanitizationOptions::default()
    }

    #[test]
    fn test_basic_sanitization() {
        assert_eq!(
            sanitize("Add user authentication", &opts()),
            "add-user-authentication"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(sanitize("", &opts()), "");
        assert_eq!(sanitize("   ", &opts()), "");
    }

    #[test]
    fn test_removes_quotes_and_parentheses() {
        assert_eq!(
            sanitize(r#"Fix "login" (issue) with: special chars"#, &opts()),
            "fix-login-issue-with-special-chars"
        );
    }

    #[test]
    fn test_space_hyphen_space_becomes_single_separator() {
        assert_eq!(
            sanitize("Update - user profile - settings", &opts()),
            "update-user-profile-settings"
        );
    }

    #[test]
    fn test_underscore_is_a_word_break() {
        assert_eq!(sanitize("snake_case _ title", &opts()), "snake-case-title");
    }

    #[test]
    fn test_double_hyphens_collapse() {
        assert_eq!(
            sanitize("Fix--multiple--hyphens", &opts()),
            "fix-multiple-hyphens"
        );
    }

    #[test]
    fn test_length_truncation_backs_off_to_word() {
        let options = opts().with_max_length(20);
        assert_eq!(
            sanitize("This is a very long title that should be truncated", &options),
            "this-is-a-very-long"
        );
    }

    #[test]
    fn test_truncation_keeps_hard_cut_when_separator_is_early() {
        // Last separator at index 2, not past the midpoint (5)
        let options = opts().with_max_length(10);
        assert_eq!(sanitize("ab supercalifragilistic", &options), "ab-superca");
    }

    #[test]
    fn test_custom_separator() {
        let options = SanitizationOptions {
            separator: "_".to_string(),
            ..opts()
        };
        assert_eq!(
            sanitize("Use custom separator", &options),
            "use_custom_separator"
        );
    }

    #[test]
    fn test_multi_char_separator() {
        let options = SanitizationOptions {
            separator: "__".to_string(),
            ..opts()
        };
        assert_eq!(sanitize("one  two - three", &options), "one__two__three");
    }

    #[test]
    fn test_empty_separator_falls_back_to_hyphen() {
        let options = SanitizationOptions {
            separator: String::new(),
            ..opts()
        };
        assert_eq!(sanitize("a b", &options), "a-b");
    }

    #[test]
    fn test_transliteration() {
        let options = SanitizationOptions {
            transliterate: true,
            ..opts()
        };
        assert_eq!(
            sanitize("Füge Benutzerverwaltung hinzü ß test", &options),
            "fuege-benutzerverwaltung-hinzue-ss-test"
        );
    }

    #[test]
    fn test_unmapped_non_ascii_is_deleted() {
        // Without transliteration the umlaut is outside the allowed class
        assert_eq!(sanitize("Füge hinzu", &opts()), "fge-hinzu");
        // Outside the table even with transliteration enabled
        let options = SanitizationOptions {
            transliterate: true,
            ..opts()
        };
        assert_eq!(sanitize("Łódź port", &options), "od-port");
    }

    #[test]
    fn test_preserve_case() {
        let options = SanitizationOptions {
            lowercase: false,
            ..opts()
        };
        assert_eq!(sanitize("Keep Original Case", &options), "Keep-Original-Case");
    }

    #[test]
    fn test_comprehensive_special_character_removal() {
        assert_eq!(
            sanitize(
                r"Fix [bug] {urgent} <critical> /path\to\file | pipe & ampersand * wildcard",
                &opts()
            ),
            "fix-bug-urgent-critical-path-to-file-pipe-ampersand-wildcard"
        );
    }

    #[test]
    fn test_version_dots_preserved() {
        assert_eq!(
            sanitize("Update to version 2.1.3 release", &opts()),
            "update-to-version-2.1.3-release"
        );
    }

    #[test]
    fn test_leading_dots_removed() {
        assert_eq!(sanitize("...hidden file update", &opts()), "hidden-file-update");
    }

    #[test]
    fn test_leading_dots_do_not_expose_separator() {
        assert_eq!(sanitize("...-hidden", &opts()), "hidden");
    }

    #[test]
    fn test_leftover_symbols_are_dropped() {
        assert_eq!(sanitize("50+ items = done'", &opts()), "50-items-done");
    }

    #[test]
    fn test_truncation_to_nothing() {
        let options = opts().with_max_length(1);
        assert_eq!(sanitize("- x", &options), "");
        assert_eq!(sanitize("...", &options), "");
    }

    #[test]
    fn test_transliterate_table() {
        assert_eq!(transliterate("äöüß"), "aeoeuess");
        assert_eq!(transliterate("ÄÖÜ"), "AeOeUe");
        assert_eq!(transliterate("Müller Straße"), "Mueller Strasse");
        assert_eq!(transliterate("café résumé naïve"), "cafe resume naive");
        assert_eq!(transliterate("niño piñata"), "nino pinata");
        assert_eq!(transliterate("Æsir façade"), "Aesir facade");
        assert_eq!(transliterate("regular text"), "regular text");
    }

    #[test]
    fn test_individual_passes() {
        assert_eq!(break_on_slashes(r"a/b\c"), "a b c");
        assert_eq!(delete_punctuation("a(b)c!~`"), "abc");
        assert_eq!(collapse_hyphen_breaks("a - b_c", "+"), "a+b+c");
        assert_eq!(collapse_whitespace("a \t b", "-"), "a-b");
        assert_eq!(collapse_repeated_separator("a----b", "-"), "a-b");
        assert_eq!(retain_allowed_chars("a=b-c.d'", "-"), "ab-c.d");
    }

    #[test]
    fn test_separator_is_not_expanded_as_replacement_syntax() {
        let options = SanitizationOptions {
            separator: "$1".to_string(),
            ..opts()
        };
        assert_eq!(sanitize("a b", &options), "a$1b");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "Add user authentication",
            "  Fix [bug] {urgent} /path\\to\\file ",
            "Update to version 2.1.3 release",
            "This is a very long title that should be truncated",
            "Füge Benutzerverwaltung hinzü",
            "...-hidden",
        ];
        let options = SanitizationOptions {
            transliterate: true,
            ..opts().with_max_length(24)
        };

        for input in inputs {
            let once = sanitize(input, &options);
            assert_eq!(sanitize(&once, &options), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_output_character_class_and_length() {
        let inputs = [
            "tab\there and\nnewline",
            "émoji 🚀 launch!!!",
            "  ~~weird^^ :: input??  ",
            "__under__score__",
            "a-b-c-d-e-f-g-h-i-j-k-l-m-n-o-p",
        ];

        for max in [0, 5, 12, 40] {
            let options = opts().with_max_length(max);
            for input in inputs {
                let slug = sanitize(input, &options);
                assert!(
                    slug.chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-'),
                    "unexpected char in {slug:?}"
                );
                assert!(!slug.starts_with('-') && !slug.ends_with('-'), "{slug:?}");
                assert!(!slug.starts_with('.'), "{slug:?}");
                if max > 0 {
                    assert!(slug.len() <= max, "{slug:?} longer than {max}");
                }
            }
        }
    }

    #[test]
    fn test_floor_char_boundary() {
        let text = "aé";
        assert_eq!(floor_char_boundary(text, 2), 1);
        assert_eq!(floor_char_boundary(text, 1), 1);
        assert_eq!(floor_char_boundary(text, 10), 3);
    }
}

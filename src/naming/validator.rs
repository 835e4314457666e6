//! Branch name validation
//!
//! Checks a candidate branch name against a subset of git's ref naming
//! rules. This is a pure predicate: nothing is normalized or repaired.

use thiserror::Error;

/// Characters git reserves for revision syntax
const RESERVED_CHARS: &[char] = &['~', '^', ':', '?', '*', '['];

/// Broad class of rule a rejected name violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCategory {
    Empty,
    Dot,
    Slash,
    Whitespace,
    ControlCharacter,
    ReservedCharacter,
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RuleCategory::Empty => "empty name",
            RuleCategory::Dot => "dot rule",
            RuleCategory::Slash => "slash rule",
            RuleCategory::Whitespace => "whitespace rule",
            RuleCategory::ControlCharacter => "control character rule",
            RuleCategory::ReservedCharacter => "reserved character rule",
        };
        f.write_str(label)
    }
}

/// Reason a branch name was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefRejection {
    #[error("branch name cannot be empty")]
    Empty,

    #[error("branch name cannot start with '.'")]
    LeadingDot,

    #[error("branch name cannot end with '.'")]
    TrailingDot,

    #[error("branch name cannot contain '..'")]
    DoubleDot,

    #[error("branch name cannot start with '/'")]
    LeadingSlash,

    #[error("branch name cannot end with '/'")]
    TrailingSlash,

    #[error("branch name cannot contain '//'")]
    DoubleSlash,

    #[error("branch name cannot contain whitespace ({0:?})")]
    Whitespace(char),

    #[error("branch name cannot contain control character {0:?}")]
    ControlCharacter(char),

    #[error("branch name cannot contain '{0}'")]
    ReservedCharacter(char),
}

impl RefRejection {
    /// The rule category this rejection belongs to
    pub fn category(&self) -> RuleCategory {
        match self {
            RefRejection::Empty => RuleCategory::Empty,
            RefRejection::LeadingDot | RefRejection::TrailingDot | RefRejection::DoubleDot => {
                RuleCategory::Dot
            }
            RefRejection::LeadingSlash
            | RefRejection::TrailingSlash
            | RefRejection::DoubleSlash => RuleCategory::Slash,
            RefRejection::Whitespace(_) => RuleCategory::Whitespace,
            RefRejection::ControlCharacter(_) => RuleCategory::ControlCharacter,
            RefRejection::ReservedCharacter(_) => RuleCategory::ReservedCharacter,
        }
    }
}

/// Validate a branch name.
///
/// Rules are checked in a fixed order and the first violation is reported.
pub fn validate(name: &str) -> Result<(), RefRejection> {
    if name.is_empty() {
        return Err(RefRejection::Empty);
    }

    if name.starts_with('.') {
        return Err(RefRejection::LeadingDot);
    }
    if name.ends_with('.') {
        return Err(RefRejection::TrailingDot);
    }
    if name.contains("..") {
        return Err(RefRejection::DoubleDot);
    }

    if name.starts_with('/') {
        return Err(RefRejection::LeadingSlash);
    }
    if name.ends_with('/') {
        return Err(RefRejection::TrailingSlash);
    }
    if name.contains("//") {
        return Err(RefRejection::DoubleSlash);
    }

    if let Some(c) = name.chars().find(|c| c.is_whitespace()) {
        return Err(RefRejection::Whitespace(c));
    }
    if let Some(c) = name.chars().find(|c| c.is_ascii_control()) {
        return Err(RefRejection::ControlCharacter(c));
    }
    if let Some(c) = name.chars().find(|c| RESERVED_CHARS.contains(c)) {
        return Err(RefRejection::ReservedCharacter(c));
    }

    Ok(())
}

/// Convenience predicate over [`validate`]
pub fn is_valid(name: &str) -> bool {
    validate(name).is_ok()
}

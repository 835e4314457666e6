//! Branch naming
//!
//! Pure, stateless building blocks for turning a ticket into a branch name:
//! - Slug normalization of free-form titles
//! - Assembly of `type/TICKET-slug` names within a length budget
//! - Validation against git ref naming rules

pub mod generator;
pub mod sanitizer;
pub mod validator;

pub use generator::{branch_type, generate_name, IdentifierRequest};
pub use sanitizer::{sanitize, SanitizationOptions};
pub use validator::{validate, RefRejection, RuleCategory};

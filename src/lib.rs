//! weave - git workflow helper
//!
//! This library provides the branch naming engines (sanitizer, ref
//! validator, name generator), the prompt template expander, and the CLI
//! flows that build on them: branch names from issue tracker tickets, and
//! commit messages and PR descriptions from a local Ollama model.

pub mod ai;
pub mod cli;
pub mod core;
pub mod error;
pub mod naming;

pub use error::{Result, WeaveError};

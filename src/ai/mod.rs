//! AI integration module
//!
//! This module provides local Ollama integration for generating:
//! - Commit messages
//! - PR descriptions
//!
//! Prompts are operator-configurable templates expanded by [`template`].

pub mod ollama;
pub mod prompts;
pub mod template;

pub use ollama::OllamaClient;
pub use prompts::{CommitPrompt, PrContext};
pub use template::{expand, TemplateContext};

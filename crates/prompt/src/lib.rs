//! Prompt system for askdocs.
//!
//! This crate provides:
//! - The built-in "answer only from context" prompt
//! - YAML-based prompt overrides per workspace
//! - Handlebars template rendering

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{load_prompt, resolve_prompt};
pub use types::{
    BuiltPrompt, BuiltPromptMetadata, PromptDefinition, DEFAULT_PROMPT_ID, DEFAULT_TEMPLATE,
};

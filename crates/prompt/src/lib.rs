//! Prompt composition for Scout.
//!
//! This crate turns a question and its search results into the text sent to
//! the model:
//! - A built-in answer template (optionally replaced by a YAML file)
//! - Handlebars rendering with HTML escaping disabled
//! - Search-result context and the sources instruction

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{compose, format_context, sources_rule, PromptComposer};
pub use loader::load_template;
pub use types::{PromptContext, PromptTemplate, DEFAULT_TEMPLATE, NOT_FOUND_ANSWER};

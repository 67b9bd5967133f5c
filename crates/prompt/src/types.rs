//! Prompt types.

use serde::{Deserialize, Serialize};

/// Phrase the model is told to use when the results do not answer the question.
///
/// The extractive fallback returns the same phrase verbatim.
pub const NOT_FOUND_ANSWER: &str = "I could not find any information on that.";

/// Built-in answer template.
pub const DEFAULT_TEMPLATE: &str = r#"You are a helpful assistant.
Answer based ONLY on the Search Results.

Rules:
- First line: short direct answer.
- Then: bullet points (max 6) with key facts.
- If Search Results are empty or irrelevant: say "I could not find any information on that."
- {{sources_rule}}

Search Results:
{{context}}

Question:
{{question}}
"#;

/// An answer template, either built in or loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Unique template identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Template string with Handlebars syntax
    ///
    /// Available variables: `question`, `context`, `sources_rule`.
    pub template: String,
}

impl PromptTemplate {
    /// The template shipped with Scout.
    pub fn builtin() -> Self {
        Self {
            id: "scout.answer.default".to_string(),
            title: "Answer from web search results".to_string(),
            api_version: "1.0".to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Values substituted into the template for one turn.
///
/// Built fresh per turn and rendered once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptContext {
    /// The user's question
    pub question: String,

    /// Search snippets joined into one block
    pub context: String,

    /// Instruction about the sources section
    pub sources_rule: String,
}

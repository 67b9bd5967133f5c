//! Prompt builder for rendering the answer template.

use crate::types::{PromptContext, PromptTemplate};
use handlebars::Handlebars;
use scout_core::{AppError, AppResult};
use scout_search::SearchResult;

/// Name the template is registered under.
const TEMPLATE_NAME: &str = "answer";

/// Instruction used when the answer should cite its sources.
const INCLUDE_SOURCES: &str = "Include a 'Sources:' section with URLs if present.";

/// Instruction used when sources are turned off.
const OMIT_SOURCES: &str = "Do not include a Sources section.";

/// Renders prompts from one registered template.
///
/// The template is compiled once, so a broken override template is
/// reported at startup rather than on the first question.
pub struct PromptComposer {
    handlebars: Handlebars<'static>,
    template_id: String,
}

impl PromptComposer {
    /// Compile `template`.
    pub fn new(template: &PromptTemplate) -> AppResult<Self> {
        let mut handlebars = Handlebars::new();

        // Disable HTML escaping for plain text
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars
            .register_template_string(TEMPLATE_NAME, &template.template)
            .map_err(|e| {
                AppError::Prompt(format!(
                    "Failed to register template '{}': {}",
                    template.id, e
                ))
            })?;

        tracing::debug!("Registered prompt template: {}", template.id);

        Ok(Self {
            handlebars,
            template_id: template.id.clone(),
        })
    }

    /// Identifier of the compiled template.
    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    /// Render the prompt for one turn.
    pub fn render(&self, context: &PromptContext) -> AppResult<String> {
        self.handlebars
            .render(TEMPLATE_NAME, context)
            .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
    }
}

impl PromptContext {
    /// Build the context for a question and its search results.
    ///
    /// No results is valid and renders as an empty context block.
    pub fn new(question: &str, results: &[SearchResult], show_sources: bool) -> Self {
        Self {
            question: question.trim().to_string(),
            context: format_context(results),
            sources_rule: sources_rule(show_sources).to_string(),
        }
    }
}

/// Join search results into the context block.
///
/// Each snippet is followed by its URL when it has one; results are
/// separated by a blank line.
pub fn format_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|result| {
            if result.url.is_empty() {
                result.snippet.clone()
            } else {
                format!("{}\nURL: {}", result.snippet, result.url)
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The sources instruction for the given setting.
pub fn sources_rule(show_sources: bool) -> &'static str {
    if show_sources {
        INCLUDE_SOURCES
    } else {
        OMIT_SOURCES
    }
}

/// Compose a prompt with the built-in template.
///
/// # Example
/// ```
/// use scout_prompt::compose;
/// use scout_search::SearchResult;
///
/// let results = vec![SearchResult::new("Paris is the capital of France.", "")];
/// let prompt = compose("What is the capital of France?", &results, false).unwrap();
/// assert!(prompt.contains("Paris is the capital of France."));
/// ```
pub fn compose(question: &str, results: &[SearchResult], show_sources: bool) -> AppResult<String> {
    let composer = PromptComposer::new(&PromptTemplate::builtin())?;
    composer.render(&PromptContext::new(question, results, show_sources))
}

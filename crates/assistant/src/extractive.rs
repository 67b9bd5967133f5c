//! Extractive answers: the first sentence of the top snippet plus sources.

use crate::generator::{AnswerGenerator, GenerationRequest};
use scout_core::AppResult;
use scout_prompt::NOT_FOUND_ANSWER;
use scout_search::SearchResult;

/// Number of top results considered for the sources list.
const MAX_SOURCES: usize = 3;

/// Answers without a language model.
///
/// Used when the configured provider is `extractive` and as the fallback
/// when the model call fails. Ignores the prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractiveGenerator;

#[async_trait::async_trait]
impl AnswerGenerator for ExtractiveGenerator {
    fn name(&self) -> &str {
        "extractive"
    }

    async fn generate(&self, request: &GenerationRequest<'_>) -> AppResult<String> {
        Ok(extractive_answer(request.results))
    }
}

/// Build an extractive answer from search results.
///
/// With no results this is exactly [`NOT_FOUND_ANSWER`]. Otherwise it is the
/// first sentence of the first snippet, followed by a `Sources:` section.
/// The section is always present; the sources setting only shapes prompts
/// sent to a model.
pub fn extractive_answer(results: &[SearchResult]) -> String {
    let Some(top) = results.first() else {
        return NOT_FOUND_ANSWER.to_string();
    };

    let mut answer = first_sentence(&top.snippet).to_string();

    let sources = collect_sources(results);
    if !sources.is_empty() {
        answer.push_str("\n\nSources:\n");
        answer.push_str(
            &sources
                .iter()
                .map(|s| format!("- {}", s))
                .collect::<Vec<_>>()
                .join("\n"),
        );
    }

    answer
}

/// Text up to and including the first `.`, `!` or `?` that is followed by
/// whitespace. The whole trimmed text when there is no such boundary.
pub fn first_sentence(text: &str) -> &str {
    let text = text.trim();
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            if let Some(&(_, next)) = chars.peek() {
                if next.is_whitespace() {
                    return &text[..idx + c.len_utf8()];
                }
            }
        }
    }

    text
}

/// Distinct citations from the top results, in rank order.
fn collect_sources(results: &[SearchResult]) -> Vec<&str> {
    let mut sources: Vec<&str> = Vec::new();
    for result in results.iter().take(MAX_SOURCES) {
        let citation = result.citation();
        if !citation.is_empty() && !sources.contains(&citation) {
            sources.push(citation);
        }
    }
    sources
}

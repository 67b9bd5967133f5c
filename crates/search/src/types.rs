//! Search result types.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Maximum number of results handed to the prompt.
pub const MAX_RESULTS: usize = 6;

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Short text fragment describing the hit
    pub snippet: String,

    /// Source URL; empty when the provider gave none
    #[serde(default)]
    pub url: String,
}

impl SearchResult {
    pub fn new(snippet: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            snippet: snippet.into(),
            url: url.into(),
        }
    }

    /// Placeholder returned when every search path came up empty.
    pub fn stub(query: &str) -> Self {
        Self::new(format!("(stub) Search result for: {}", query), "")
    }

    /// The URL, or the snippet when there is no URL.
    ///
    /// Used when listing sources.
    pub fn citation(&self) -> &str {
        if self.url.is_empty() {
            &self.snippet
        } else {
            &self.url
        }
    }
}

/// Drop empty and repeated snippets and cap the list at [`MAX_RESULTS`].
///
/// Snippets are compared after trimming. The first occurrence wins, so the
/// provider's ranking is preserved.
pub fn dedupe_results<I>(results: I) -> Vec<SearchResult>
where
    I: IntoIterator<Item = SearchResult>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for result in results {
        let snippet = result.snippet.trim();
        if snippet.is_empty() || !seen.insert(snippet.to_string()) {
            continue;
        }

        out.push(SearchResult::new(snippet, result.url.trim()));
        if out.len() >= MAX_RESULTS {
            break;
        }
    }

    out
}

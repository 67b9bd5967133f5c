//! Search provider trait.

use crate::types::SearchResult;
use scout_core::AppResult;

/// Something that can answer a query with ranked snippets.
///
/// Implementations should return at most [`crate::MAX_RESULTS`] entries.
/// Network-backed providers are expected to swallow their own failures and
/// return a stub; the `Result` exists so the pipeline can still handle a
/// provider that does not.
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name for logs (e.g., "duckduckgo").
    fn name(&self) -> &str;

    /// Search for `query`.
    async fn search(&self, query: &str) -> AppResult<Vec<SearchResult>>;
}

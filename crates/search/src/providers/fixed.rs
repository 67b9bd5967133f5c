//! Provider that serves a fixed result list.

use crate::provider::SearchProvider;
use crate::types::{dedupe_results, SearchResult};
use scout_core::AppResult;

/// Returns the same results for every query.
///
/// Backs `--offline` runs and tests. An empty list behaves like a search
/// that found nothing: the stub result for the query.
#[derive(Debug, Clone, Default)]
pub struct StaticSearchProvider {
    results: Vec<SearchResult>,
}

impl StaticSearchProvider {
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self { results }
    }
}

#[async_trait::async_trait]
impl SearchProvider for StaticSearchProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn search(&self, query: &str) -> AppResult<Vec<SearchResult>> {
        let results = dedupe_results(self.results.iter().cloned());
        if results.is_empty() {
            return Ok(vec![SearchResult::stub(query)]);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_configured_results() {
        let provider = StaticSearchProvider::new(vec![SearchResult::new(
            "Paris is the capital of France.",
            "https://example.com/paris",
        )]);

        let results = provider.search("anything").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "https://example.com/paris");
    }

    #[tokio::test]
    async fn test_empty_list_yields_stub() {
        let provider = StaticSearchProvider::default();
        let results = provider.search("rust").await.unwrap();
        assert_eq!(results, vec![SearchResult::stub("rust")]);
    }
}
